//! Logging module for protected-keys
//!
//! Events are emitted with `tracing`; the binary installs a
//! `tracing-subscriber` formatter on stderr. The level follows the
//! verbose/quiet flags unless `RUST_LOG` says otherwise.

use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Logging configuration
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbosity level adjustment: -1 for quiet, 0 for normal, +1 for verbose
    pub verbosity: i8,
}

impl LogConfig {
    /// Create a new log configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode (+1 verbosity)
    pub fn verbose(mut self) -> Self {
        self.verbosity = 1;
        self
    }

    /// Set quiet mode (-1 verbosity)
    pub fn quiet(mut self) -> Self {
        self.verbosity = -1;
        self
    }

    /// Build from the CLI flags; quiet wins if both are set
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            Self::new().quiet()
        } else if verbose {
            Self::new().verbose()
        } else {
            Self::new()
        }
    }

    /// Get the minimum log level based on verbosity
    fn min_level(&self) -> Level {
        match self.verbosity {
            v if v < 0 => Level::WARN, // quiet: only warnings and errors
            0 => Level::INFO,          // normal: info and above
            _ => Level::DEBUG,         // verbose: debug and above
        }
    }
}

/// Initialize the logging subsystem from the CLI flags
pub fn init(verbose: bool, quiet: bool) {
    init_with_config(LogConfig::from_flags(verbose, quiet));
}

/// Initialize logging with full configuration
///
/// Does nothing if a global subscriber is already installed.
pub fn init_with_config(config: LogConfig) {
    // Allow overriding via RUST_LOG environment variable
    let env_filter = EnvFilter::builder()
        .with_default_directive(config.min_level().into())
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init();

    if let Err(e) = result {
        tracing::debug!("Logging already initialized: {}", e);
    }
}
