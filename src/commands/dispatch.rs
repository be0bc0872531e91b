//! Command dispatch logic for tie

use tie_core::Result;

use crate::cli::{Cli, Commands};
use crate::commands::{show, submit, validate};

pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Validate { question } => validate::run(cli, question),
        Commands::Show { question } => show::run(cli, question),
        Commands::Submit(args) => submit::run(cli, args),
    }
}
