//! protected-keys - install per-package SSH keys from a project

use anyhow::Result;
use clap::Parser;

use protected_keys::cli::commands;
use protected_keys::cli::exit_code::ExitCode;
use protected_keys::cli::{Cli, Commands, ProjectArgs};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    protected_keys::logging::init(cli.verbose, cli.quiet);

    match run(cli) {
        Ok(()) => ExitCode::Success.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from_error(&e).into()
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let project = ProjectArgs::from_cli(&cli)?;

    match cli.command {
        Commands::Add => commands::add::execute(&project)?,
        Commands::Remove => commands::remove::execute(&project)?,
        Commands::Status(args) => commands::status::execute(&project, args)?,
        Commands::Config(args) => commands::config::execute(&project, args)?,
        Commands::Version => commands::version::print_version(cli.verbose),
        Commands::Completion(args) => commands::completion::execute(args)?,
    }

    Ok(())
}
