//! coursegraph CLI: schema.org JSON-LD for course category pages.
//!
//! Reads the eight course catalog tables and writes one structured-data
//! document per category page.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
