use clap::Parser;
use mx_aero_pack::cli::{run, Cli};
use mx_aero_pack::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
