//! Exit code definitions for protected-keys
//!
//! Provides standardized exit codes for different error conditions.

use crate::error::Error;

/// Exit codes for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Successful execution
    Success = 0,
    /// General/unspecified error
    GeneralError = 1,
    /// Configuration error (missing or invalid protected.json, unknown home)
    ConfigError = 2,
    /// A package's key file is missing from the project
    MissingKeyError = 3,
    /// Reading or writing the SSH directory failed
    IoError = 4,
}

impl ExitCode {
    /// Pick the exit code for an error returned by a command
    pub fn from_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(e) if e.is_config() => ExitCode::ConfigError,
            Some(Error::MissingKeyFile(_)) => ExitCode::MissingKeyError,
            Some(Error::Io { .. }) => ExitCode::IoError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for u8 {
    fn from(code: ExitCode) -> Self {
        code as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_from_error() {
        let err = anyhow::Error::from(Error::ConfigValidation("bad".into()));
        assert_eq!(ExitCode::from_error(&err), ExitCode::ConfigError);

        let err = anyhow::Error::from(Error::MissingKeyFile(PathBuf::from("/k")));
        assert_eq!(ExitCode::from_error(&err), ExitCode::MissingKeyError);

        let err = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::from_error(&err), ExitCode::GeneralError);
    }

    #[test]
    fn test_exit_code_through_context() {
        let result: Result<(), Error> = Err(Error::io(
            "/home/user/.ssh/config",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        ));
        let err = result.context("Failed to add keys").unwrap_err();
        assert_eq!(ExitCode::from_error(&err), ExitCode::IoError);
        assert_eq!(u8::from(ExitCode::from_error(&err)), 4);
    }
}
