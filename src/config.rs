//! Tool configuration: the repository registry and refresh roster.
//!
//! The registry maps each nightly target to its mirrored upstream, the
//! fork carrying the migration branch, and the suite groups to run. It is
//! an explicit immutable structure loaded at startup — built-in defaults,
//! optionally overridden by a `nightjar.toml` next to the invocation.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{WrapErr, eyre};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::result::Result;

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "nightjar.toml";

/// Registry entry for one nightly target repository.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Mirrored upstream clone URL.
    pub upstream: String,
    /// Fork carrying the migration branch.
    pub downstream: String,
    /// Migration branch name on the fork.
    pub branch: String,
    /// Suite groups passed to the workflow launcher.
    pub groups: String,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            upstream: String::new(),
            downstream: String::new(),
            branch: String::new(),
            groups: "developer".to_string(),
        }
    }
}

/// Roster for the long-lived fork-clone refresh sweep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Directory holding the persistent clones.
    pub root: PathBuf,
    /// Clone directory names under `root`, refreshed in order.
    pub clones: Vec<String>,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/var/tmp/persistent/fork_clones/test_suites"),
            clones: vec![
                "um".to_string(),
                "jules".to_string(),
                "lfric_apps".to_string(),
                "lfric_core".to_string(),
                "ukca".to_string(),
            ],
        }
    }
}

/// Root configuration structure for `nightjar.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory that nightly clones are created under. Defaults to
    /// `~/nightjar`.
    pub work_dir: Option<PathBuf>,
    /// Nightly target registry, keyed by repository name.
    #[serde(rename = "repo")]
    pub repos: IndexMap<String, RepoConfig>,
    /// Refresh sweep settings.
    pub refresh: RefreshConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mut repos = IndexMap::new();
        repos.insert(
            "lfric_apps".to_string(),
            RepoConfig {
                upstream: "git@github.com:MetOffice/lfric_apps.git".into(),
                downstream: "git@github.com:james-bruten-mo/lfric_apps.git"
                    .into(),
                branch: "lfric_apps_rose-stem".into(),
                groups: "developer".into(),
            },
        );

        Self {
            work_dir: None,
            repos,
            refresh: RefreshConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, from `nightjar.toml` in the current
    /// directory, or fall back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(default_path);
        }

        Ok(Config::default())
    }

    fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).wrap_err_with(|| {
            format!("failed to read config file {}", path.display())
        })?;

        toml::from_str(&content).wrap_err_with(|| {
            format!("failed to parse config file {}", path.display())
        })
    }

    /// Directory nightly clones live under.
    pub fn work_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.work_dir {
            return Ok(dir.clone());
        }

        dirs::home_dir()
            .map(|home| home.join("nightjar"))
            .ok_or(eyre!("unable to determine home directory"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_defaults() {
        let config = Config::default();
        assert!(config.repos.contains_key("lfric_apps"));
        assert_eq!(config.refresh.clones.len(), 5);
        assert_eq!(config.refresh.clones[0], "um");
    }

    #[test]
    fn default_registry_entry_is_complete() {
        let config = Config::default();
        let repo = &config.repos["lfric_apps"];
        assert!(repo.upstream.ends_with(".git"));
        assert_eq!(repo.branch, "lfric_apps_rose-stem");
        assert_eq!(repo.groups, "developer");
    }

    #[test]
    fn parses_registry_override() {
        let toml_content = r#"
work_dir = "/data/nightly"

[repo.um]
upstream = "git@github.com:MetOffice/um.git"
downstream = "git@github.com:someone/um.git"
branch = "um_rose-stem"
groups = "all"

[refresh]
root = "/data/clones"
clones = ["um"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.work_dir, Some(PathBuf::from("/data/nightly")));
        assert_eq!(config.repos["um"].groups, "all");
        assert_eq!(config.refresh.root, PathBuf::from("/data/clones"));
        assert_eq!(config.refresh.clones, vec!["um".to_string()]);
    }

    #[test]
    fn missing_groups_falls_back_to_developer() {
        let toml_content = r#"
[repo.jules]
upstream = "git@example.com:org/jules.git"
downstream = "git@example.com:fork/jules.git"
branch = "jules_migration"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.repos["jules"].groups, "developer");
    }
}
