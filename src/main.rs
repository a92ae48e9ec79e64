//! # Sheetscrub command-line entry point
//!
//! ```bash
//! sheetscrub clean --file orders.xlsx --output orders_clean.csv --plots-dir plots
//! sheetscrub inspect --file orders.xlsx
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    sheetscrub::logging::init(cli.verbose)?;

    cli::run_command(cli.command)
}
