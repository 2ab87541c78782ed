//! Working-copy git operations over the command runner.
//!
//! A thin interface over the git command-line tool: nightjar only needs
//! clone, checkout, remote add, fetch, merge, and push, so it shells out
//! to the same binary operators use rather than carrying a full
//! version-control library. Strict methods abort on failure (the nightly
//! run is useless past a failed merge); `try_` variants hand the outcome
//! back for the refresh sweep, which continues past a broken clone.

use std::fs;
use std::path::{Path, PathBuf};

use log::*;

use crate::error::NightjarError;
use crate::exec::{self, CommandOutput};

/// A local clone of a target repository.
pub struct WorkingCopy {
    path: PathBuf,
}

impl WorkingCopy {
    /// Clone `upstream` into `path` and check out its trunk branch.
    pub fn clone_upstream(
        upstream: &str,
        path: &Path,
    ) -> Result<Self, NightjarError> {
        let path_arg = path.display().to_string();
        info!("cloning {upstream}");
        exec::run_checked("git", &["clone", upstream, &path_arg], None)?;

        let copy = Self::open(path);
        copy.git(&["checkout", "trunk"])?;
        Ok(copy)
    }

    /// Wrap an existing clone without touching it.
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn add_remote(
        &self,
        name: &str,
        url: &str,
    ) -> Result<(), NightjarError> {
        self.git(&["remote", "add", name, url])?;
        Ok(())
    }

    pub fn fetch(&self, remote: &str) -> Result<(), NightjarError> {
        self.git(&["fetch", remote])?;
        Ok(())
    }

    pub fn merge(&self, refspec: &str) -> Result<(), NightjarError> {
        self.git(&["merge", refspec])?;
        Ok(())
    }

    /// Lenient fetch for the refresh sweep.
    pub fn try_fetch(
        &self,
        remote: &str,
    ) -> Result<CommandOutput, NightjarError> {
        exec::run("git", &["fetch", remote], Some(&self.path))
    }

    /// Lenient no-edit merge for the refresh sweep.
    pub fn try_merge_no_edit(
        &self,
        refspec: &str,
    ) -> Result<CommandOutput, NightjarError> {
        exec::run(
            "git",
            &["merge", "--no-edit", refspec],
            Some(&self.path),
        )
    }

    /// Lenient push for the refresh sweep.
    pub fn try_push(&self) -> Result<CommandOutput, NightjarError> {
        exec::run("git", &["push"], Some(&self.path))
    }

    fn git(&self, args: &[&str]) -> Result<CommandOutput, NightjarError> {
        exec::run_checked("git", args, Some(&self.path))
    }
}

/// Remove a stale clone directory if present.
pub fn delete_clone(path: &Path) -> Result<(), NightjarError> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
