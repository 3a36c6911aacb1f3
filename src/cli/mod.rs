//! CLI module for deldocs
//!
//! Provides command-line access to the deleted-docs codec:
//! - write: persist a list of offsets for a segment
//! - read: verify and print a segment's offsets
//! - count: verify and print a segment's offset count
//! - inspect: print a segment's decoded header

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{count, execute, inspect, read, run, run_to, write};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error_to, write_response_to};
