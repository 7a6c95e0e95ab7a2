use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for gar-cli
#[derive(Debug, Parser)]
#[command(
    name = "gar",
    version,
    about = "Resolve GAR registry exports into structured, human-readable addresses"
)]
pub struct CliArgs {
    /// Path to the data directory (shared dictionaries at the top level,
    /// region tables in per-region subdirectories; default: ./data)
    #[arg(short = 'd', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve one region into structured addresses
    Resolve {
        /// Region id (the per-region subdirectory name, e.g. 77)
        region: String,

        /// Write the addresses as a JSON array to this file instead of
        /// printing JSON lines to stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Resolve one region and bulk-upload it into Elasticsearch
    #[cfg(feature = "upload")]
    Upload {
        /// Region id
        region: String,

        /// Elasticsearch base URL
        #[arg(long, default_value = "http://localhost:9200")]
        url: String,

        /// Target index name
        #[arg(long, default_value = gar_core::sink::DEFAULT_INDEX)]
        index: String,
    },

    /// Show catalog / chain / pattern statistics for a region
    Stats {
        /// Region id
        region: String,
    },

    /// Search a region's resolved addresses by substring
    /// (accent- and case-insensitive)
    Find {
        /// Region id
        region: String,

        /// Substring to search for
        query: String,
    },
}
