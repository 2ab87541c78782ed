//! CLI argument parsing for the nightjar binary.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Global CLI arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a nightjar.toml configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Nightly testing subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone, merge, and launch the nightly suite for a configured
    /// repository.
    Nightly {
        /// Target repository name from the registry.
        repo: String,
    },

    /// Update pinned dependency hashes in a working copy.
    UpdateDeps {
        /// Directory containing dependencies.yaml.
        path: PathBuf,
    },

    /// Fetch, merge, and push the configured long-lived fork clones.
    Refresh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_nightly_subcommand() {
        let args =
            Args::try_parse_from(["nightjar", "nightly", "lfric_apps"])
                .unwrap();
        assert!(matches!(
            args.command,
            Command::Nightly { ref repo } if repo == "lfric_apps"
        ));
        assert!(!args.debug);
    }

    #[test]
    fn parses_global_flags_after_the_subcommand() {
        let args = Args::try_parse_from([
            "nightjar",
            "update-deps",
            "/tmp/um",
            "--debug",
        ])
        .unwrap();
        assert!(args.debug);
        assert!(matches!(args.command, Command::UpdateDeps { .. }));
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(Args::try_parse_from(["nightjar"]).is_err());
    }
}
