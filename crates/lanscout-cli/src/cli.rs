//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};

/// lanscout - discover media servers and UPnP root devices on the local network
#[derive(Parser, Debug)]
#[command(name = "lanscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Print every response header for each service
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover GDM media servers
    Gdm(DiscoverArgs),

    /// Discover SSDP/UPnP root devices
    Ssdp(DiscoverArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Interface address to discover from (default: auto-detect)
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Receive window per transport in seconds
    #[arg(short, long, default_value = "1.0", env = "LANSCOUT_TIMEOUT")]
    pub timeout: f64,
}
