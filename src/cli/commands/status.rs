//! Status command - show which package keys are installed

use anyhow::Result;
use serde::Serialize;

use crate::cli::ProjectArgs;
use crate::cli::args::StatusArgs;
use crate::keys::PackageStatus;

/// Status information
#[derive(Debug, Serialize)]
pub struct StatusInfo {
    /// SSH directory the keys are installed into
    pub ssh_config_dir: String,
    /// SSH client configuration file
    pub ssh_config_path: String,
    /// Per-package state, in configured order
    pub packages: Vec<PackageStatus>,
}

/// Execute the status command
pub fn execute(project: &ProjectArgs, args: StatusArgs) -> Result<()> {
    let registry = project.registry()?;

    let status = StatusInfo {
        ssh_config_dir: registry.context().ssh_config_dir().display().to_string(),
        ssh_config_path: registry.context().ssh_config_path().display().to_string(),
        packages: registry.status()?,
    };

    match args.format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&status)?;
            println!("{}", json);
        }
        _ => {
            print_text_status(&status);
        }
    }

    Ok(())
}

/// Short label for a package's state
fn state_label(package: &PackageStatus) -> &'static str {
    match (package.key_installed, package.stanza_present) {
        (true, true) => "installed",
        (true, false) => "key only (no config stanza)",
        (false, true) => "stanza only (key missing)",
        (false, false) => "not installed",
    }
}

fn print_text_status(status: &StatusInfo) {
    println!("SSH directory: {}", status.ssh_config_dir);
    println!("SSH config:    {}", status.ssh_config_path);

    if status.packages.is_empty() {
        println!("No packages configured");
        return;
    }

    let name_width = status
        .packages
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0);
    let host_width = status
        .packages
        .iter()
        .map(|p| p.host.len())
        .max()
        .unwrap_or(0);

    println!();
    for package in &status.packages {
        println!(
            "  {:<name_width$}  {:<host_width$}  {}",
            package.name,
            package.host,
            state_label(package),
            name_width = name_width,
            host_width = host_width,
        );
    }
}
