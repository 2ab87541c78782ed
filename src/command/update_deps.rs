//! Dependency-update command implementation.
use log::*;
use std::path::Path;

use crate::{
    manifest, resolver::GitRefResolver, result::Result, updater,
};

/// Execute a dependency update pass against `<path>/dependencies.yaml`.
pub fn execute(path: &Path) -> Result<()> {
    let manifest_path = path.join(manifest::MANIFEST_FILE);

    let changed =
        updater::update_dependencies(&manifest_path, &GitRefResolver)?;

    if changed {
        info!("dependency refs updated");
    } else {
        info!("dependency refs already up to date");
    }

    Ok(())
}
