use crate::cli_args::ConfigArgs;
use crate::load_config_for_command;
use crate::output::{write_to_file, write_to_stdout};
use anyhow::{Context, Result, bail};
use codecollect_core::Config;
use codecollect_core::config::{DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME};
use colored::*;
use log;

pub fn handle_config_command(args: ConfigArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;

    let config = load_config_for_command(&project_root, &args.project_config, None)
        .context("Failed to load configuration for config command")?;
    let text = config
        .to_toml_string()
        .context("Failed to serialize configuration")?;

    if !args.save {
        return write_to_stdout(&text);
    }

    let path = project_root
        .join(DEFAULT_CONFIG_DIR)
        .join(DEFAULT_CONFIG_FILENAME);
    if path.exists() && !args.force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    log::debug!("Saving configuration to {}", path.display());
    write_to_file(&path, &text)?;
    if !quiet {
        println!(
            "{} Config saved to: {}",
            "✅".green(),
            path.display().to_string().blue()
        );
    }
    Ok(())
}
