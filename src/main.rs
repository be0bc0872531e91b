//! TIE - Technical Interview Exercises
//!
//! A command-line tool for practicing coding questions: validates question
//! definitions, runs learner submissions in a sandboxed harness, and renders
//! one piece of targeted feedback per submission.

mod cli;
mod commands;

use std::env;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;

use cli::{Cli, OutputFormat};
use tie_core::error::{ExitCode as TieExitCode, TieError};
use tie_core::logging;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return argument_error(err),
    };

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    match commands::dispatch::run(&cli) {
        Ok(()) => ExitCode::from(TieExitCode::Success as u8),
        Err(e) => {
            if cli.format == OutputFormat::Json {
                eprintln!("{}", e.to_json());
            } else if !cli.quiet {
                eprintln!("error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Argument parsing failed before `Cli.format` existed. Scripts driving
/// `tie --format json` still get a structured error envelope on stderr;
/// everything else gets clap's own rendering.
fn argument_error(err: clap::Error) -> ExitCode {
    let kind = err.kind();
    if kind == ErrorKind::DisplayHelp || kind == ErrorKind::DisplayVersion {
        err.exit();
    }
    if !argv_requests_json() {
        err.exit();
    }

    // A bad subcommand, flag, or value is a usage error; anything else
    // clap reports (io, formatting) is a generic failure.
    let tie_error = match kind {
        ErrorKind::InvalidSubcommand
        | ErrorKind::UnknownArgument
        | ErrorKind::MissingRequiredArgument
        | ErrorKind::InvalidValue
        | ErrorKind::ValueValidation => TieError::UsageError(err.to_string()),
        _ => TieError::Other(err.to_string()),
    };
    eprintln!("{}", tie_error.to_json());
    ExitCode::from(tie_error.exit_code() as u8)
}

/// Whether the raw argv asked for JSON output, checked without clap.
fn argv_requests_json() -> bool {
    let args: Vec<String> = env::args().skip(1).collect();
    args.iter().enumerate().any(|(index, arg)| {
        arg == "--format=json"
            || (arg == "--format" && args.get(index + 1).is_some_and(|v| v == "json"))
    })
}
