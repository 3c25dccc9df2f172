//! Provinit CLI — run a provisioning tool's init and report the result.

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "provinit",
    version,
    about = "Run a provisioning tool's init step in a project directory and report its output"
)]
struct Cli {
    #[command(subcommand)]
    command: provinit::cli::Commands,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = provinit::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
