use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Specify the directory to collect (default: current dir).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify the TOML config file (default: .xtools/codecollect/codecollect.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Ignore any config file and use the built-in pattern sets.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TreeStyleOpts {
    #[arg(
        long,
        help = "Close each tree level on its last drawn entry instead of its last listed one.",
        help_heading = "Tree"
    )]
    pub visible_connectors: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Concatenate a project's source files into one text file.",
    long_about = "codecollect walks a directory, renders the filtered structure as a tree and \nappends the text of every included file into a single artifact \n(collected_code.txt by default). Run without arguments to collect the current directory.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  codecollect\n  codecollect collect --project-root ../service -o review.txt\n  codecollect tree --visible-connectors\n  codecollect config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Write the tree and file contents to the output file (default)."
    )]
    Collect(CollectArgs),

    #[command(visible_alias = "t", about = "Print only the project tree.")]
    Tree(TreeArgs),

    #[command(about = "Show or save the effective configuration.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CollectArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub tree_style: TreeStyleOpts,

    #[arg(
        short = 'o',
        long,
        value_name = "PATH",
        help = "Output file, relative to the project root (default: collected_code.txt).",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Leave unreadable or non-UTF-8 files out instead of aborting.",
        help_heading = "Output Control"
    )]
    pub skip_unreadable: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub tree_style: TreeStyleOpts,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        long,
        help = "Save the effective configuration to the default config path."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}
