//! Path expansion utilities

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// The current user's home directory, if it can be determined
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expand a leading `~` in `path` to `home`
///
/// Only the tilde is expanded; `$VARS` are left as written. Fails with
/// [`Error::HomeDirNotFound`] when the path needs a home directory and none
/// was given.
pub fn expand_tilde(path: &str, home: Option<&Path>) -> Result<PathBuf> {
    let needs_home = path == "~" || path.starts_with("~/");
    if needs_home && home.is_none() {
        return Err(Error::HomeDirNotFound);
    }

    let expanded = shellexpand::tilde_with_context(path, || {
        home.map(|h| h.to_string_lossy().into_owned())
    });
    Ok(PathBuf::from(expanded.as_ref()))
}
