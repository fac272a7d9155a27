//! feedcast CLI: daily read-it-later podcast digest.
//!
//! Fetches a day of unread articles, composes a multi-host podcast
//! transcript with a generative model, and saves it back to the reader
//! service as a document.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
