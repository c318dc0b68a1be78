//! Resolution of the directories a sweep works on

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::path::expand_tilde;

/// Optional file at the project root overriding the SSH directory
pub const SSH_LOCATION_FILE: &str = ".sshlocation";

/// SSH directory used when no override is present
pub const DEFAULT_SSH_DIR: &str = "~/.ssh";

/// Name of the SSH client configuration file inside the SSH directory
pub const SSH_CONFIG_FILE_NAME: &str = "config";

/// Absolute locations shared by every package of a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContext {
    project_keys_dir: PathBuf,
    ssh_config_dir: PathBuf,
    ssh_config_path: PathBuf,
}

impl ResolvedContext {
    /// Build a context from already-resolved directories
    pub fn new(project_keys_dir: impl Into<PathBuf>, ssh_config_dir: impl Into<PathBuf>) -> Self {
        let ssh_config_dir = ssh_config_dir.into();
        let ssh_config_path = ssh_config_dir.join(SSH_CONFIG_FILE_NAME);
        Self {
            project_keys_dir: project_keys_dir.into(),
            ssh_config_dir,
            ssh_config_path,
        }
    }

    /// Resolve the context for the project at `root`
    ///
    /// `keys_dir` is taken relative to `root`. The SSH directory comes from
    /// `root/.sshlocation` when present, otherwise `~/.ssh`; a leading `~` is
    /// expanded to `home`. Nothing is created here.
    pub fn resolve(root: &Path, keys_dir: &str, home: Option<&Path>) -> Result<Self> {
        let root = std::path::absolute(root).map_err(|e| Error::io(root, e))?;
        let project_keys_dir = root.join(keys_dir);

        let location = read_ssh_location(&root)?;
        let ssh_config_dir = expand_tilde(location.as_deref().unwrap_or(DEFAULT_SSH_DIR), home)?;
        let ssh_config_dir = if ssh_config_dir.is_absolute() {
            ssh_config_dir
        } else {
            root.join(ssh_config_dir)
        };

        tracing::debug!(
            project_keys_dir = %project_keys_dir.display(),
            ssh_config_dir = %ssh_config_dir.display(),
            "Resolved key locations"
        );

        Ok(Self::new(project_keys_dir, ssh_config_dir))
    }

    /// Directory holding the project's source-of-truth keys
    pub fn project_keys_dir(&self) -> &Path {
        &self.project_keys_dir
    }

    /// Directory receiving installed keys and holding the SSH config
    pub fn ssh_config_dir(&self) -> &Path {
        &self.ssh_config_dir
    }

    /// The SSH client configuration file
    pub fn ssh_config_path(&self) -> &Path {
        &self.ssh_config_path
    }
}

/// Read the trimmed override from `.sshlocation`, if any
fn read_ssh_location(root: &Path) -> Result<Option<String>> {
    let path = root.join(SSH_LOCATION_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::io(&path, e)),
    };

    let location = content.trim();
    if location.is_empty() {
        tracing::warn!(path = %path.display(), "Ignoring empty SSH location file");
        return Ok(None);
    }
    Ok(Some(location.to_string()))
}
