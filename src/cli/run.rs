use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};

use super::{
    args::{Arguments, Command},
    commands::{CommandResult, add_scans::add_scans, consolidate::consolidate},
};

/// Dispatch to the command handler, wiring stdin and stdout.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    let stdin = io::stdin().lock();
    let mut stdout = BufWriter::new(io::stdout().lock());

    let result = match command {
        Some(Command::Consolidate(args)) => consolidate(&args, stdin, &mut stdout)?,
        Some(Command::AddScans(args)) => add_scans(&args, stdin, &mut stdout)?,
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    };

    stdout.flush().context("Failed to write output")?;
    Ok(result)
}
