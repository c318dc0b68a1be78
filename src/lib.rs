//! protected-keys - per-package SSH keys for a project
//!
//! A project keeps private keys for the hosts its packages are fetched from
//! in a local directory and lists them in `protected.json`. This library
//! copies those keys into the user's SSH directory and adds a matching
//! `Host` stanza to the SSH client config for each one, and undoes both.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let registry = protected_keys::init(Path::new("/path/to/project"), None)?;
//! registry.add_keys()?;
//! # Ok::<(), protected_keys::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod keys;
pub mod logging;
pub mod utils;

use std::path::Path;

pub use config::{Config, PackageConfig, ValidatedConfig};
pub use error::{Error, Result};
pub use keys::{PackageKeyManager, PackageStatus, Registry, ResolvedContext};

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Validate `config` (or load `protected.json` from `root`) and build a registry
pub fn init(root: &Path, config: Option<Config>) -> Result<Registry> {
    let config = config::resolve_config(root, config)?;
    Registry::new(config, root)
}
