use anyhow::Result;
use clap::Parser;
use terminal_wordcloud::{cli::Cli, logging::init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    init_tracing(&cli)?;
    terminal_wordcloud::run(cli).await
}
