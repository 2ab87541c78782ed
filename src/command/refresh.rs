//! Long-lived fork-clone refresh sweep.
//!
//! Keeps the persistent test-suite clones current: fetch upstream, merge
//! its trunk, push back to the fork, and refresh dependency pins where
//! the repository carries a manifest. Every step is lenient — one broken
//! clone must not stop the others from refreshing overnight.
use log::*;
use std::path::Path;

use crate::{
    config::Config,
    error::NightjarError,
    exec::CommandOutput,
    manifest,
    repo::WorkingCopy,
    resolver::GitRefResolver,
    result::Result,
    updater,
};

/// Execute the refresh sweep over every configured clone.
pub fn execute(config: &Config) -> Result<()> {
    for clone in &config.refresh.clones {
        let path = config.refresh.root.join(clone);
        refresh_clone(clone, &path);
    }

    Ok(())
}

/// Refresh one clone; a failing step skips the remaining steps for this
/// clone only.
fn refresh_clone(clone: &str, path: &Path) {
    let copy = WorkingCopy::open(path);

    info!("fetching upstream for {}", path.display());
    if !step_succeeded(clone, "fetching upstream", copy.try_fetch("upstream"))
    {
        return;
    }

    info!("merging trunk into {}", path.display());
    if !step_succeeded(
        clone,
        "merging trunk",
        copy.try_merge_no_edit("upstream/trunk"),
    ) {
        return;
    }

    info!("pushing from {}", path.display());
    if !step_succeeded(clone, "pushing", copy.try_push()) {
        return;
    }

    if clone.contains("lfric_apps") || clone.contains("um") {
        info!("updating dependencies for {}", path.display());
        let manifest_path = path.join(manifest::MANIFEST_FILE);
        if let Err(err) =
            updater::update_dependencies(&manifest_path, &GitRefResolver)
        {
            warn!(
                "error updating dependencies for {}: {err}",
                path.display()
            );
        }
    }
}

fn step_succeeded(
    clone: &str,
    what: &str,
    result: std::result::Result<CommandOutput, NightjarError>,
) -> bool {
    match result {
        Ok(output) if output.success() => true,
        Ok(output) => {
            warn!(
                "failure {what} for {clone}\n{}",
                output.stderr.trim_end()
            );
            false
        }
        Err(err) => {
            warn!("failure {what} for {clone}: {err}");
            false
        }
    }
}
