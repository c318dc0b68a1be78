//! Key and config stanza management for a single package

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::ResolvedContext;
use crate::config::PackageConfig;
use crate::error::{Error, Result};
use crate::utils::fs::{append_private_file, remove_file_if_exists, write_private_file};

/// Installs and removes one package's key and `Host` stanza
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageKeyManager {
    name: String,
    host: String,
    project_key_path: PathBuf,
    ssh_config_key_path: PathBuf,
    ssh_config_path: PathBuf,
    /// `ssh_config_key_path` as written on the `IdentityFile` line
    identity_file: String,
}

impl PackageKeyManager {
    /// Create a manager for `name`
    ///
    /// Fails with [`Error::MissingKeyFile`] if the project key does not exist,
    /// and with [`Error::ConfigValidation`] if the installed key path is not
    /// valid UTF-8 and so cannot be written into the SSH config.
    pub fn new(context: &ResolvedContext, name: &str, package: &PackageConfig) -> Result<Self> {
        let project_key_path = context.project_keys_dir().join(&package.key_file);
        if !project_key_path.exists() {
            return Err(Error::MissingKeyFile(project_key_path));
        }

        let ssh_config_key_path = context.ssh_config_dir().join(&package.key_file);
        let identity_file = ssh_config_key_path
            .to_str()
            .ok_or_else(|| {
                Error::ConfigValidation(format!(
                    "SSH key path for {} is not valid UTF-8: '{}'",
                    name,
                    ssh_config_key_path.display()
                ))
            })?
            .to_string();

        Ok(Self {
            name: name.to_string(),
            host: package.host.clone(),
            project_key_path,
            ssh_config_key_path,
            ssh_config_path: context.ssh_config_path().to_path_buf(),
            identity_file,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Source key inside the project
    pub fn project_key_path(&self) -> &Path {
        &self.project_key_path
    }

    /// Installed copy inside the SSH directory
    pub fn ssh_config_key_path(&self) -> &Path {
        &self.ssh_config_key_path
    }

    /// The exact block appended to and removed from the SSH config
    pub fn config_stanza(&self) -> String {
        format!(
            "Host {}\n  IdentityFile {}\n  IdentitiesOnly yes\n  StrictHostKeyChecking no\n",
            self.host, self.identity_file
        )
    }

    /// Whether the SSH config currently contains this package's stanza
    ///
    /// A config file that does not exist contains no stanza. The file is
    /// compared as raw bytes, so it need not be valid UTF-8.
    pub fn has_config_stanza(&self) -> Result<bool> {
        match std::fs::read(&self.ssh_config_path) {
            Ok(data) => Ok(find_bytes(&data, self.config_stanza().as_bytes()).is_some()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::io(&self.ssh_config_path, e)),
        }
    }

    /// Whether the key has been copied into the SSH directory
    pub fn has_key_installed(&self) -> bool {
        self.ssh_config_key_path.exists()
    }

    /// Whether both the installed key and the stanza are present
    pub fn exists(&self) -> Result<bool> {
        Ok(self.has_key_installed() && self.has_config_stanza()?)
    }

    /// Append the stanza to the SSH config and install the key
    ///
    /// The stanza is appended even if already present.
    pub fn add(&self) -> Result<()> {
        append_private_file(&self.ssh_config_path, self.config_stanza().as_bytes())?;

        let key = std::fs::read(&self.project_key_path)
            .map_err(|e| Error::io(&self.project_key_path, e))?;
        write_private_file(&self.ssh_config_key_path, &key)?;

        tracing::info!(
            package = %self.name,
            host = %self.host,
            key = %self.ssh_config_key_path.display(),
            "Added package key"
        );
        Ok(())
    }

    /// Remove the first occurrence of the stanza and delete the installed key
    ///
    /// Unlike [`Self::has_config_stanza`], a missing config file is an error
    /// here: sweeps always create it first, so its absence means the SSH
    /// directory changed underneath us.
    pub fn remove(&self) -> Result<()> {
        let mut data = std::fs::read(&self.ssh_config_path)
            .map_err(|e| Error::io(&self.ssh_config_path, e))?;
        let stanza = self.config_stanza();

        if let Some(start) = find_bytes(&data, stanza.as_bytes()) {
            data.drain(start..start + stanza.len());
            std::fs::write(&self.ssh_config_path, data)
                .map_err(|e| Error::io(&self.ssh_config_path, e))?;
        } else {
            tracing::debug!(package = %self.name, "No config stanza to remove");
        }

        let removed_key = remove_file_if_exists(&self.ssh_config_key_path)?;

        tracing::info!(
            package = %self.name,
            host = %self.host,
            removed_key,
            "Removed package key"
        );
        Ok(())
    }

    /// Snapshot of what is currently installed for this package
    pub fn status(&self) -> Result<PackageStatus> {
        let key_installed = self.has_key_installed();
        let stanza_present = self.has_config_stanza()?;
        Ok(PackageStatus {
            name: self.name.clone(),
            host: self.host.clone(),
            key_path: self.ssh_config_key_path.clone(),
            key_installed,
            stanza_present,
            installed: key_installed && stanza_present,
        })
    }
}

/// Offset of the first occurrence of `needle` in `haystack`
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Installation state of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageStatus {
    pub name: String,
    pub host: String,
    /// Location of the installed key copy
    pub key_path: PathBuf,
    pub key_installed: bool,
    pub stanza_present: bool,
    /// Both the key and the stanza are in place
    pub installed: bool,
}
