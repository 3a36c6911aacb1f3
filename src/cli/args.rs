//! CLI argument definitions using clap
//!
//! Commands:
//! - deldocs write --segment <stem> --offsets 10,37,512
//! - deldocs read --segment <stem>
//! - deldocs count --segment <stem>
//! - deldocs inspect --segment <stem>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::segment::SegmentOffset;

/// deldocs - read and write segment deleted-docs files
#[derive(Parser, Debug)]
#[command(name = "deldocs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./deldocs.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a deleted-docs file, replacing any existing one
    Write {
        /// Segment path stem, relative to the data directory
        #[arg(long)]
        segment: String,

        /// Deleted offsets, in order
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        offsets: Vec<SegmentOffset>,
    },

    /// Read and verify a deleted-docs file, printing its offsets
    Read {
        /// Segment path stem, relative to the data directory
        #[arg(long)]
        segment: String,
    },

    /// Verify a deleted-docs file and print how many offsets it holds
    Count {
        /// Segment path stem, relative to the data directory
        #[arg(long)]
        segment: String,
    },

    /// Print the decoded header without verifying the checksum
    Inspect {
        /// Segment path stem, relative to the data directory
        #[arg(long)]
        segment: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
