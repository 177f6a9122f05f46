//! Command handlers for the Vireo CLI.
//!
//! Each submodule implements one command (`check`, `parse`, `lex`,
//! `explain`); shared helpers like `read_file` and the frontend flag
//! parser live in the module root.

use vireo_diagnostic::{ColorMode, TerminalEmitter};
use vireo_parse::{ParseError, ParseOptions};

mod check;
mod debug;
mod explain;

pub use check::check_file;
pub use debug::{lex_file, parse_file};
pub use explain::explain_error;

/// Frontend settings shared by `parse` and `check`.
pub struct FrontendFlags {
    pub path: String,
    pub options: ParseOptions,
    /// Dump the node tree after parsing (`parse` only).
    pub dump: bool,
}

impl FrontendFlags {
    /// Parse `<file> [--module] [--strict] [--no-defer] [--threads=N]
    /// [--dump]` from the argument tail. Exits with usage on bad input.
    pub fn parse(args: &[String], usage: &str) -> Self {
        let mut path = None;
        let mut options = ParseOptions::default();
        let mut dump = false;

        for arg in args {
            if arg == "--module" || arg == "-m" {
                options.module = true;
            } else if arg == "--strict" {
                options.strict_mode = true;
            } else if arg == "--no-defer" {
                options.defer_enabled = false;
            } else if let Some(n) = arg.strip_prefix("--threads=") {
                match n.parse::<usize>() {
                    Ok(threads) => options.background_threads = threads,
                    Err(_) => {
                        eprintln!("error: invalid thread count '{n}'");
                        std::process::exit(1);
                    }
                }
            } else if arg == "--dump" {
                dump = true;
            } else if !arg.starts_with('-') && path.is_none() {
                path = Some(arg.clone());
            } else {
                eprintln!("error: unknown option '{arg}'");
                eprintln!("{usage}");
                std::process::exit(1);
            }
        }

        let Some(path) = path else {
            eprintln!("error: missing file path");
            eprintln!("{usage}");
            std::process::exit(1);
        };
        FrontendFlags {
            path,
            options,
            dump,
        }
    }
}

pub(super) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Render one parse error as a terminal diagnostic.
pub(super) fn report_error(err: &ParseError, source: &str, path: &str) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::stderr(ColorMode::Auto, is_tty);
    if let Err(io_err) = emitter.emit(&err.to_diagnostic(), source, path) {
        eprintln!("error: {err} (diagnostic rendering failed: {io_err})");
    }
}
