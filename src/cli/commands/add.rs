//! Add command - install every package key

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;

/// Execute the add command
pub fn execute(project: &ProjectArgs) -> Result<()> {
    let registry = project.registry()?;
    let count = registry.add_keys().context("Failed to add package keys")?;

    println!(
        "Added {} package key(s) to {}",
        count,
        registry.context().ssh_config_dir().display()
    );
    Ok(())
}
