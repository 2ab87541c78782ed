//! Latest-commit resolution for pinned dependencies.
//!
//! Each resolution fetches the dependency's upstream into a disposable
//! local repository and reads the tip hash of its primary branch. The
//! clone directory is private to the call and removed on every exit path,
//! success or failure; nothing is cached between runs.

use log::*;
use regex::Regex;
use tempfile::TempDir;

use crate::error::NightjarError;
use crate::exec;

/// Dependencies whose upstream has already renamed its primary branch to
/// `main`; everything else in the migration still uses `trunk`. Matched
/// case-insensitively.
const MAIN_BRANCH_DEPENDENCIES: [&str; 7] = [
    "simsys_scripts",
    "mule",
    "shumlib",
    "jules",
    "um_meta",
    "um_aux",
    "ukca",
];

const UPSTREAM_REMOTE: &str = "upstream";

/// Primary integration branch for a dependency, per migration status.
pub fn branch_for(dependency: &str) -> &'static str {
    let lowered = dependency.to_lowercase();
    if MAIN_BRANCH_DEPENDENCIES.contains(&lowered.as_str()) {
        "main"
    } else {
        "trunk"
    }
}

/// Source of latest upstream commit hashes for named dependencies.
#[cfg_attr(test, mockall::automock)]
pub trait RefResolver {
    /// Tip commit hash of the dependency's primary upstream branch.
    fn latest_hash(
        &self,
        dependency: &str,
        source: &str,
    ) -> Result<String, NightjarError>;
}

/// Resolves refs by fetching into a disposable local repository.
pub struct GitRefResolver;

impl RefResolver for GitRefResolver {
    fn latest_hash(
        &self,
        dependency: &str,
        source: &str,
    ) -> Result<String, NightjarError> {
        let branch = branch_for(dependency);
        debug!("resolving {dependency} against {UPSTREAM_REMOTE}/{branch}");

        // Removed on every exit path, including mid-sequence failures.
        let clone_dir = TempDir::new()?;
        let cwd = Some(clone_dir.path());

        exec::run_checked("git", &["init"], cwd)?;
        exec::run_checked(
            "git",
            &["remote", "add", UPSTREAM_REMOTE, source],
            cwd,
        )?;
        exec::run_checked("git", &["fetch", UPSTREAM_REMOTE], cwd)?;

        let upstream_ref = format!("{UPSTREAM_REMOTE}/{branch}");
        let output = exec::run_checked(
            "git",
            &["log", "--pretty=format:'%H'", "-n", "1", &upstream_ref],
            cwd,
        )?;

        validated(dependency, clean_hash(&output.stdout))
    }
}

/// Strip the shell-quoting characters `--pretty=format:'%H'` leaves
/// around the hash when git runs without a shell.
fn clean_hash(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .to_string()
}

fn validated(
    dependency: &str,
    value: String,
) -> Result<String, NightjarError> {
    let hash_re = Regex::new(r"^[0-9a-f]{40}$").unwrap();
    if hash_re.is_match(&value) {
        Ok(value)
    } else {
        Err(NightjarError::InvalidHash {
            dependency: dependency.to_string(),
            value,
        })
    }
}
