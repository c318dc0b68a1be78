//! Config command - show or validate configuration

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use crate::cli::ProjectArgs;
use crate::cli::args::ConfigArgs;
use crate::config::{PackageConfig, project_config_path};

/// Effective configuration with the locations it resolves to
#[derive(Debug, Serialize)]
struct EffectiveConfig<'a> {
    source: String,
    project_keys_dir: String,
    ssh_config_dir: String,
    ssh_config_path: String,
    packages: &'a IndexMap<String, PackageConfig>,
}

/// Execute the config command
pub fn execute(project: &ProjectArgs, args: ConfigArgs) -> Result<()> {
    let source = project
        .config
        .clone()
        .unwrap_or_else(|| project_config_path(&project.root));

    let registry = project
        .registry()
        .with_context(|| format!("Invalid configuration: {}", source.display()))?;

    if args.validate {
        println!(
            "Configuration file is valid: {} ({} package(s))",
            source.display(),
            registry.packages().len()
        );
        return Ok(());
    }

    let context = registry.context();
    let effective = EffectiveConfig {
        source: source.display().to_string(),
        project_keys_dir: context.project_keys_dir().display().to_string(),
        ssh_config_dir: context.ssh_config_dir().display().to_string(),
        ssh_config_path: context.ssh_config_path().display().to_string(),
        packages: registry.packages(),
    };

    match args.format.as_str() {
        "toml" => {
            let toml = toml::to_string_pretty(&effective)
                .context("Failed to render configuration as TOML")?;
            print!("{}", toml);
        }
        _ => {
            let json = serde_json::to_string_pretty(&effective)?;
            println!("{}", json);
        }
    }

    Ok(())
}
