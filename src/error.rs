use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for git-ship operations
#[derive(Error, Debug)]
pub enum GitShipError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Build entry point not found: {}", .0.display())]
    EntryPointMissing(PathBuf),

    #[error("Username is required")]
    EmptyUsername,

    #[error("Invalid username '{0}'")]
    InvalidUsername(String),

    #[error("Build failed: {0}")]
    Build(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Could not open '{target}': {reason}")]
    Launch { target: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-ship
pub type Result<T> = std::result::Result<T, GitShipError>;

impl GitShipError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitShipError::Config(msg.into())
    }

    /// Create a build error with context
    pub fn build(msg: impl Into<String>) -> Self {
        GitShipError::Build(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitShipError::Remote(msg.into())
    }

    pub fn launch(target: impl Into<String>, reason: impl Into<String>) -> Self {
        GitShipError::Launch {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// True for failures caused by bad input or a missing precondition,
    /// as opposed to an external tool failing.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GitShipError::EntryPointMissing(_)
                | GitShipError::EmptyUsername
                | GitShipError::InvalidUsername(_)
                | GitShipError::Config(_)
        )
    }
}
