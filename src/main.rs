//! CLI entry point for clipped fishnet generation

use clap::Parser;
use fishnet::io::cli::{Cli, RegionProcessor};
use fishnet::io::logging;

fn main() -> fishnet::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    let mut processor = RegionProcessor::new(cli);
    processor.process()
}
