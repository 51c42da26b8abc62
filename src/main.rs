//! tufted - incremental build tool for typst-based static sites.

mod build;
mod cli;
mod compiler;
mod config;
mod deps;
mod generator;
mod logger;
mod serve;
mod utils;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use compiler::{OutputKind, TypstCli};
use config::SiteConfig;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        // Help output failing (closed stdout) is not worth an error code
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    let config = match SiteConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            log!("error"; "{e:#}");
            return ExitCode::FAILURE;
        }
    };

    if run(command, &config) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Dispatch one command. Errors are logged here; the result is the exit status.
fn run(command: &Commands, config: &SiteConfig) -> bool {
    let compiler = TypstCli::new(config);
    let force = command.force();

    let result: Result<()> = match command {
        Commands::Build { .. } => return build::build_site(config, &compiler, force),
        Commands::Html { .. } => build::compile(config, &compiler, OutputKind::Html, force),
        Commands::Pdf { .. } => build::compile(config, &compiler, OutputKind::Pdf, force),
        Commands::Assets => build::copy_all_assets(config, false),
        Commands::Clean => build::clean(config),
        Commands::Preview { .. } => serve::serve_site(config),
    };

    match result {
        Ok(()) => true,
        Err(e) => {
            log!("error"; "{e:#}");
            false
        }
    }
}
