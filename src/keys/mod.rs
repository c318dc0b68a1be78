//! Installation of project keys into the SSH directory
//!
//! A [`Registry`] resolves where things live for a project and sweeps over
//! its packages; each package is handled by a short-lived
//! [`PackageKeyManager`] that knows how to add or remove exactly one key file
//! and one `Host` stanza.

mod context;
mod package;
mod registry;

pub use context::{DEFAULT_SSH_DIR, ResolvedContext, SSH_CONFIG_FILE_NAME, SSH_LOCATION_FILE};
pub use package::{PackageKeyManager, PackageStatus};
pub use registry::Registry;
