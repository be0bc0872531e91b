//! CLI argument parsing for tie
//!
//! Uses clap for argument parsing. Global flags: --format, --quiet,
//! --verbose, --log-level, --log-json.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for a terminal
    Human,
    /// One JSON document on stdout
    Json,
}

/// TIE - Technical Interview Exercises CLI
#[derive(Parser, Debug)]
#[command(name = "tie")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level filter (overrides --verbose), e.g. "debug" or "tie=trace"
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a question definition without running anything
    Validate {
        /// Path to the question YAML file
        question: PathBuf,
    },

    /// Print a summary of a question definition
    Show {
        /// Path to the question YAML file
        question: PathBuf,
    },

    /// Run a solution file against a question and print the feedback
    Submit(SubmitArgs),
}

#[derive(clap::Args, Debug)]
pub struct SubmitArgs {
    /// Path to the question YAML file
    pub question: PathBuf,

    /// Path to the solution source file
    pub solution: PathBuf,

    /// Task the solution is submitted against
    #[arg(long, default_value = "0")]
    pub task: usize,

    /// Wall-clock limit for one harness run, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Python interpreter to run the harness with
    #[arg(long, default_value = "python3", env = "TIE_PYTHON")]
    pub python: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli_help() {
        // Should not panic
        let result = Cli::try_parse_from(["tie", "--help"]);
        assert!(result.is_err()); // --help exits
    }

    #[test]
    fn test_parse_cli_version() {
        // Should not panic
        let result = Cli::try_parse_from(["tie", "--version"]);
        assert!(result.is_err()); // --version exits
    }

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from(["tie", "validate", "q.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Validate { .. }));
    }

    #[test]
    fn test_parse_submit_with_options() {
        let cli = Cli::try_parse_from([
            "tie",
            "submit",
            "q.yaml",
            "sol.py",
            "--task",
            "1",
            "--timeout-secs",
            "5",
            "--python",
            "python3.12",
        ])
        .unwrap();
        if let Commands::Submit(args) = cli.command {
            assert_eq!(args.task, 1);
            assert_eq!(args.timeout_secs, Some(5));
            assert_eq!(args.python, "python3.12");
        } else {
            panic!("Expected Submit command");
        }
    }

    #[test]
    fn test_parse_format() {
        let cli = Cli::try_parse_from(["tie", "--format", "json", "show", "q.yaml"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["tie"]).is_err());
    }
}
