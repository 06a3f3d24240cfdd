use crate::cli_args::TreeArgs;
use crate::load_config_for_command;
use crate::output::write_to_stdout;
use anyhow::{Context, Result};
use codecollect_core::{Config, Filters, build_tree, render_tree_section};
use log;
use std::env;

pub fn handle_tree_command(args: TreeArgs) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(
        &project_root,
        &args.project_config,
        Some(&args.tree_style),
    )
    .context("Failed to load configuration for tree command")?;

    let executable = env::current_exe().ok();
    let filters = Filters::for_run(&config, &project_root, executable.as_deref())
        .context("Failed to build filters")?;

    let lines = build_tree(&project_root, &filters, config.tree.connectors)
        .context("Failed to render project tree")?;
    write_to_stdout(&render_tree_section(&lines))
}
