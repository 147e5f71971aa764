mod commands;
mod output;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rcpier",
    version,
    about = "Extract bearing load cases from an RCPier text report into DC/LL/BR/WS/WL tables"
)]
struct Cli {
    /// Path to the RCPier report (.txt)
    input_file: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = commands::extract::run(&cli.input_file) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
