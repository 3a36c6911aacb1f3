//! deldocs CLI entry point
//!
//! Parses arguments and dispatches to the CLI module. Exits non-zero on
//! failure; the error has already been printed as JSON on stdout, and is
//! repeated on stderr for humans.

use deldocs::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
