use crate::cli_args::CollectArgs;
use crate::load_config_for_command;
use crate::output::{print_completion, print_skipped_files};
use anyhow::{Context, Result};
use codecollect_core::{Config, Filters, ReadErrorPolicy, write_artifact};
use log;
use std::env;

pub fn handle_collect_command(args: CollectArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(
        &project_root,
        &args.project_config,
        Some(&args.tree_style),
    )
    .context("Failed to load configuration for collect command")?;

    if let Some(output) = &args.output {
        config.general.output_file = output.clone();
    }
    if args.skip_unreadable {
        config.general.on_read_error = ReadErrorPolicy::Skip;
    }

    let executable = match env::current_exe() {
        Ok(path) => Some(path),
        Err(e) => {
            log::warn!("Could not determine own executable path: {}", e);
            None
        }
    };
    let filters = Filters::for_run(&config, &project_root, executable.as_deref())
        .context("Failed to build filters")?;

    let output_path = config.get_effective_output_path(&project_root);
    let summary = write_artifact(&project_root, &filters, &config, &output_path)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    log::info!(
        "{} files written to {}",
        summary.collected,
        output_path.display()
    );

    if !quiet {
        print_skipped_files(&summary.skipped);
        print_completion(&config.general.output_file);
    }
    Ok(())
}
