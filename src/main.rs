//! CLI entry point for splitting images into tiles and stitching them back

use clap::Parser;
use tilestitch::io::cli::{Cli, Runner};

fn main() -> tilestitch::Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let mut runner = Runner::new(cli);
    runner.run()
}
