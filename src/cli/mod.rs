pub mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::aggregator::DEFAULT_WORKERS;

#[derive(Parser)]
#[command(name = "estuary")]
#[command(about = "Aggregates grouped news feeds into one time-ordered stream", long_about = None)]
pub struct Cli {
    /// Path to the feed configuration file (TOML, or JSON by extension)
    #[arg(short, long, default_value = "feeds.toml", global = true)]
    pub config: PathBuf,

    /// Number of parallel workers for fetching feeds
    #[arg(short, long, default_value_t = DEFAULT_WORKERS, global = true)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Fetch the selected feeds once and print the merged items as JSON
    Items {
        /// Source ids to include (comma separated, repeatable); all when omitted
        #[arg(short, long, value_delimiter = ',')]
        sources: Vec<String>,

        /// Topic ids to include (comma separated, repeatable); all when omitted
        #[arg(short, long, value_delimiter = ',')]
        topics: Vec<String>,
    },
    /// Print the configured sources and topics as JSON
    Meta,
}
