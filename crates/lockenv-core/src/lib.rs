//! Generation pipeline turning a conda lockfile into an ASV environment file.
//!
//! `EnvGenerator` loads the lockfile, selects the packages pinned for one
//! platform/manager pair, assembles an `EnvDocument`, and atomically writes
//! it next to the lockfile. `check` performs the same derivation in memory
//! and reports whether the file on disk is current.

pub mod generator;

pub use generator::{
    CheckStatus, EnvGenerator, GenerateOptions, GenerateReport, DEFAULT_CHANNEL, DEFAULT_ENV_NAME,
    DEFAULT_LOCK_PATH, DEFAULT_OUTPUT_PATH, DEFAULT_REGENERATE_COMMAND,
};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("lockfile not found at {}", path.display())]
    MissingInput { path: PathBuf },
    #[error("no packages found in {} for {platform} platform (manager '{manager}')", path.display())]
    NoPackagesFound {
        path: PathBuf,
        platform: String,
        manager: String,
    },
    #[error(transparent)]
    Lock(#[from] lockenv_schema::LockError),
    #[error(transparent)]
    Env(#[from] lockenv_schema::EnvError),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// True for failures caused by the lockfile itself rather than the
    /// output side.
    pub fn is_lockfile_error(&self) -> bool {
        matches!(
            self,
            CoreError::MissingInput { .. } | CoreError::NoPackagesFound { .. } | CoreError::Lock(_)
        )
    }
}
