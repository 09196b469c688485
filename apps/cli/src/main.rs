//! Course Summary CLI: extract lesson and course pages, then summarize them.
//!
//! Reads saved course pages, builds the summarization prompt, calls Gemini,
//! and renders the answer as display markup.

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
