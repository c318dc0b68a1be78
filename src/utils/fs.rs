//! Filesystem helpers for files that hold SSH material
//!
//! Directories are created `0700` and files `0600` so that `ssh` accepts
//! them. Modes are only applied to things these helpers create; existing
//! entries keep whatever permissions they already have.

use std::fs::{self, DirBuilder, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};

use crate::error::{Error, Result};

/// Mode for directories holding keys (owner rwx)
pub const PRIVATE_DIR_MODE: u32 = 0o700;

/// Mode for key and config files (owner rw)
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Create `path` (and missing parents) as a private directory unless it exists.
///
/// Returns `true` when the directory was created by this call. A directory
/// that appears between the existence check and creation is not an error.
pub fn ensure_private_dir(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(PRIVATE_DIR_MODE);

    match builder.create(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => return Ok(false),
        Err(e) => return Err(Error::io(path, e)),
    }

    // The builder mode is filtered through the umask.
    set_mode(path, PRIVATE_DIR_MODE)?;
    Ok(true)
}

/// Create an empty private file at `path` unless it exists.
///
/// Returns `true` when the file was created by this call.
pub fn ensure_private_file(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    match private_options().write(true).create_new(true).open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(Error::io(path, e)),
    }

    set_mode(path, PRIVATE_FILE_MODE)?;
    Ok(true)
}

/// Replace the contents of `path`, creating it as a private file if needed.
pub fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let created = !path.exists();

    let mut file = private_options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(contents).map_err(|e| Error::io(path, e))?;

    if created {
        set_mode(path, PRIVATE_FILE_MODE)?;
    }
    Ok(())
}

/// Append `contents` to `path`, creating it as a private file if needed.
pub fn append_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = private_options()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(contents).map_err(|e| Error::io(path, e))
}

/// Remove the file at `path` if present.
///
/// Returns `true` when a file was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io(path, e)),
    }
}

fn private_options() -> OpenOptions {
    #[allow(unused_mut)]
    let mut options = OpenOptions::new();
    #[cfg(unix)]
    options.mode(PRIVATE_FILE_MODE);
    options
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}
