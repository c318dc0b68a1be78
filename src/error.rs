//! Error types for protected-keys

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Main error type for protected-keys
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigValidation(String),

    #[error("Configuration file not found: '{}'", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Not found file: '{}'", .0.display())]
    MissingKeyFile(PathBuf),

    #[error("Unable to determine the home directory")]
    HomeDirNotFound,
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error stems from configuration rather than the filesystem
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::ConfigValidation(_)
                | Error::ConfigNotFound(_)
                | Error::HomeDirNotFound
        )
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
