use clap::Parser;
use spreads_processor::cli::{run, Cli};
use spreads_processor::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
