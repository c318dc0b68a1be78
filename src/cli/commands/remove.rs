//! Remove command - uninstall every package key

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;

/// Execute the remove command
pub fn execute(project: &ProjectArgs) -> Result<()> {
    let registry = project.registry()?;
    let count = registry
        .remove_keys()
        .context("Failed to remove package keys")?;

    println!(
        "Removed {} package key(s) from {}",
        count,
        registry.context().ssh_config_dir().display()
    );
    Ok(())
}
