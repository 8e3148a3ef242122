use std::process::ExitCode;

use annotool::cli::{Arguments, ExitStatus};
use clap::Parser;
use colored::Colorize;

fn main() -> ExitCode {
    let args = Arguments::parse();

    match annotool::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("{} {:#}", "error:".bold().red(), err);
            ExitStatus::from_error(&err).into()
        }
    }
}
