//! lanscout CLI - discover media servers and UPnP root devices on the
//! local network.
//!
//! Thin driver around the core discovery engine: argument parsing, result
//! printing, and exit-code mapping live here.

mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use lanscout_core::ProtocolFamily;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

fn main() {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Gdm(args) => {
            commands::run_discover(ProtocolFamily::Gdm, args, cli.json, cli.verbose)
        }
        Commands::Ssdp(args) => {
            commands::run_discover(ProtocolFamily::Ssdp, args, cli.json, cli.verbose)
        }
    }
}
