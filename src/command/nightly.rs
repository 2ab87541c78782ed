//! Nightly clone, merge, and suite-launch command implementation.
use chrono::Local;
use log::*;
use std::fs;

use crate::{
    config::Config,
    error::NightjarError,
    repo::{self, WorkingCopy},
    result::Result,
    suite,
};

/// Execute the nightly run for a single configured repository: fresh
/// upstream clone, merge of the fork's migration branch, suite-source
/// pin, and workflow launch.
pub fn execute(repo_name: &str, config: &Config) -> Result<()> {
    let target = config.repos.get(repo_name).ok_or_else(|| {
        NightjarError::UnknownRepo(repo_name.to_string())
    })?;

    info!(
        "launching nightly testing for {repo_name} on {}",
        Local::now().format("%Y-%m-%d")
    );

    let work_dir = config.work_dir()?;
    fs::create_dir_all(&work_dir)?;
    let loc = work_dir.join(repo_name);

    repo::delete_clone(&loc)?;

    let copy = WorkingCopy::clone_upstream(&target.upstream, &loc)?;

    let fork_remote = format!("{repo_name}_fork");
    copy.add_remote(&fork_remote, &target.downstream)?;
    copy.fetch(&fork_remote)?;

    copy.merge(&format!("{fork_remote}/{}", target.branch))?;

    suite::pin_source_location(repo_name, copy.path())?;
    suite::launch(repo_name, &target.groups, copy.path())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A repository missing from the registry fails before any clone is
    /// attempted.
    #[test]
    fn unknown_repository_is_rejected() {
        let config = Config::default();
        let result = execute("not-configured", &config);

        let err = result.unwrap_err();
        let unknown = err.downcast_ref::<NightjarError>();
        assert!(matches!(
            unknown,
            Some(NightjarError::UnknownRepo(_))
        ));
    }
}
