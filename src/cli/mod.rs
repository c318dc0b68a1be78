//! CLI module for protected-keys
//!
//! This module provides the command-line interface using clap derive macros.
//! Commands are thin wrappers over [`crate::Registry`].

pub mod args;
pub mod commands;
pub mod exit_code;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::load_config;
use crate::keys::Registry;

use args::{CompletionArgs, ConfigArgs, StatusArgs};

/// Install per-package SSH keys from a project into ~/.ssh
#[derive(Parser, Debug)]
#[command(name = "protected-keys")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Project root containing protected.json and the keys directory
    ///
    /// Defaults to the current directory
    #[arg(long, global = true, env = "PROTECTED_KEYS_ROOT")]
    pub root: Option<PathBuf>,

    /// Configuration file to use instead of <root>/protected.json
    #[arg(long, global = true, env = "PROTECTED_KEYS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy every package key into the SSH directory and add its Host stanza
    Add,

    /// Remove every package's Host stanza and installed key
    Remove,

    /// Show which package keys are installed
    Status(StatusArgs),

    /// Show or validate the effective configuration
    Config(ConfigArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Where the project lives and which configuration file to read
#[derive(Debug, Clone)]
pub struct ProjectArgs {
    pub root: PathBuf,
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    /// Resolve the global `--root`/`--config` options
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        Ok(Self {
            root,
            config: cli.config.clone(),
        })
    }

    /// Load and validate the configuration, then build the registry
    pub fn registry(&self) -> crate::Result<Registry> {
        let config = self.config.as_deref().map(load_config).transpose()?;
        crate::init(&self.root, config)
    }
}
