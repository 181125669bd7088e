use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spreads-processor")]
#[command(about = "Daily spread summaries of partitioned sensor readings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: spreads.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

/// Overrides applied on top of the loaded settings.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    #[arg(long, help = "Root directory of the object store")]
    pub source_root: Option<PathBuf>,

    #[arg(long, help = "Only consider objects under this prefix")]
    pub prefix: Option<String>,

    #[arg(long, help = "Shard file suffix (e.g. '.csv')")]
    pub shard_suffix: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute and store daily spread summaries for every node
    Process {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(short, long, help = "Reference attributes CSV file")]
        references: Option<PathBuf>,

        #[arg(short, long, help = "Output directory for summary documents")]
        storage: Option<PathBuf>,

        #[arg(long)]
        max_workers: Option<usize>,

        #[arg(long, help = "Nodes processed at the same time")]
        node_concurrency: Option<usize>,

        #[arg(long, help = "Record failing nodes and keep going")]
        continue_on_error: bool,

        #[arg(long, help = "Pretty-print the summary documents")]
        pretty: bool,

        #[arg(long, help = "Hide the progress bar")]
        silent: bool,
    },

    /// List the nodes a run would process
    Nodes {
        #[command(flatten)]
        source: SourceArgs,
    },
}
