mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use log;
use std::path::Path;
use std::process;

use cli_args::{Cli, CollectArgs, Commands, ProjectConfigOpts, TreeStyleOpts};
use codecollect_core::{AppError, Config, ConnectorMode};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;

    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = match e.downcast_ref::<AppError>() {
                Some(AppError::Config(_)) => 1,
                Some(AppError::TomlParse(_)) => 1,
                Some(AppError::TomlSerialize(_)) => 1,
                Some(AppError::Glob(_)) => 1,
                Some(AppError::Io(_)) => 2,
                Some(AppError::Walk { .. }) => 2,
                Some(AppError::FileRead { .. }) => 2,
                Some(AppError::Decode { .. }) => 2,
                Some(AppError::FileWrite { .. }) => 2,
                Some(_) => 1,
                None => 1,
            };

            // Failures are always reported, even with --quiet.
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    // No subcommand behaves like a plain `collect` in the current directory.
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Collect(CollectArgs::default()));
    match command {
        Commands::Collect(args) => {
            log::debug!("Executing 'collect' command...");
            commands::collect::handle_collect_command(args, quiet)?;
        }
        Commands::Tree(args) => {
            log::debug!("Executing 'tree' command...");
            commands::tree::handle_tree_command(args)?;
        }
        Commands::Config(args) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(args, quiet)?;
        }
    }
    Ok(())
}

fn apply_tree_style(config: &mut Config, tree_style: &TreeStyleOpts) {
    if tree_style.visible_connectors {
        config.tree.connectors = ConnectorMode::Visible;
    }
}

/// Loads the config file selected by the project options (or the defaults).
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
    tree_style: Option<&TreeStyleOpts>,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.config.as_ref(),
        project_opts.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(style) = tree_style {
        apply_tree_style(&mut config, style);
    }

    log::trace!("Effective config: {:?}", config);
    Ok(config)
}
