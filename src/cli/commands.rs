//! CLI command implementations
//!
//! Every command loads the config, resolves the segment stem against
//! `data_dir`, runs one codec operation, and prints one JSON object.
//! A fatal codec failure is reported together with the shutdown request it
//! raised.

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::codec::DeletedDocsFormat;
use crate::lifecycle::{shutdown_channel, ShutdownListener, ShutdownNotifier};
use crate::observability::Logger;
use crate::segment::{SegmentDeletionLog, SegmentOffset};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{write_error_to, write_response_to};

/// Parse arguments, run the command, print the result
pub fn run() -> CliResult<()> {
    run_to(Cli::parse_args(), &mut io::stdout())
}

/// Run `cli` and print its single JSON result line to `out`.
///
/// Config failures are printed like any other error.
pub fn run_to<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    match load_and_execute(cli) {
        Ok(data) => write_response_to(out, data),
        Err(e) => {
            write_error_to(out, e.code().code(), e.message())?;
            Err(e)
        }
    }
}

fn load_and_execute(cli: Cli) -> CliResult<Value> {
    let config = Config::load(&cli.config)?;
    Logger::set_min_severity(config.min_severity()?);

    let (notifier, listener) = shutdown_channel();
    execute(cli.command, &config, &notifier, &listener)
}

/// Run one command and return its JSON result
pub fn execute(
    command: Command,
    config: &Config,
    notifier: &ShutdownNotifier,
    listener: &ShutdownListener,
) -> CliResult<Value> {
    let result = match command {
        Command::Write { segment, offsets } => write(config, notifier, &segment, &offsets),
        Command::Read { segment } => read(config, &segment),
        Command::Count { segment } => count(config, &segment),
        Command::Inspect { segment } => inspect(config, &segment),
    };

    // A fatal failure outranks the error it came from
    if let Some(request) = listener.drain().into_iter().next() {
        Logger::fatal(
            "SHUTDOWN_REQUESTED",
            &[
                ("origin", request.origin.as_str()),
                ("reason", request.reason.as_str()),
            ],
        );
        return Err(CliError::fatal(format!(
            "{} requested shutdown: {}",
            request.origin, request.reason
        )));
    }

    result
}

/// Write `offsets` as the deleted-docs file of `segment`
pub fn write(
    config: &Config,
    notifier: &ShutdownNotifier,
    segment: &str,
    offsets: &[SegmentOffset],
) -> CliResult<Value> {
    let mut log = SegmentDeletionLog::new(segment, config.fs_handler(), notifier.clone());
    log.mark_deleted(offsets);
    log.persist()?;

    Ok(json!({
        "path": full_path(config, segment),
        "count": log.count(),
    }))
}

/// Read and verify the deleted-docs file of `segment`
pub fn read(config: &Config, segment: &str) -> CliResult<Value> {
    let mut fs = config.fs_handler();
    let docs = DeletedDocsFormat::read(&mut fs, segment)?;

    Ok(json!({
        "path": full_path(config, segment),
        "count": docs.count(),
        "offsets": docs.offsets(),
    }))
}

/// Count the offsets in the deleted-docs file of `segment`
pub fn count(config: &Config, segment: &str) -> CliResult<Value> {
    let mut fs = config.fs_handler();
    let count = DeletedDocsFormat::read_size(&mut fs, segment)?;

    Ok(json!({
        "path": full_path(config, segment),
        "count": count,
    }))
}

/// Decode the header of the deleted-docs file of `segment`
pub fn inspect(config: &Config, segment: &str) -> CliResult<Value> {
    let mut fs = config.fs_handler();
    let header = DeletedDocsFormat::inspect(&mut fs, segment)?;

    Ok(json!({
        "path": full_path(config, segment),
        "header": header,
    }))
}

fn full_path(config: &Config, segment: &str) -> String {
    Path::new(&config.data_dir)
        .join(DeletedDocsFormat::full_path(segment))
        .display()
        .to_string()
}
