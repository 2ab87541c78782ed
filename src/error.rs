//! Typed errors for nightjar operations.

use std::path::Path;

use thiserror::Error;

/// Main error type for nightjar operations.
#[derive(Error, Debug)]
pub enum NightjarError {
    /// An external process exited non-zero under strict execution.
    #[error("[FAIL] issue found running command {command}\n\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    /// An external process exceeded the wall-clock bound and was killed.
    #[error("command exceeded {seconds}s timeout: {command}")]
    CommandTimedOut { command: String, seconds: u64 },

    /// An external process could not be spawned or waited on.
    #[error("i/o failure running command {command}: {source}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The dependency manifest is missing, unreadable, or malformed.
    #[error("dependency manifest {path}: {details}")]
    ManifestParse { path: String, details: String },

    /// A resolved ref failed 40-hex commit hash validation.
    #[error(
        "resolved ref for '{dependency}' is not a full commit hash: {value:?}"
    )]
    InvalidHash { dependency: String, value: String },

    /// The nightly target is not present in the repository registry.
    #[error("unknown repository '{0}': not present in the registry")]
    UnknownRepo(String),

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NightjarError {
    /// Create a manifest error carrying the offending path.
    pub fn manifest(
        path: &Path,
        details: impl std::fmt::Display,
    ) -> Self {
        Self::ManifestParse {
            path: path.display().to_string(),
            details: details.to_string(),
        }
    }
}
