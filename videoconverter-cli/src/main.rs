// videoconverter-cli/src/main.rs
//
// Entry point for the videoconverter binary: parses the arguments, runs one
// batch and maps its outcome to the process exit code.

use clap::Parser;
use console::style;
use std::process;
use videoconverter_cli::{Cli, exit_code, run_convert};

fn main() {
    let cli = Cli::parse();

    match run_convert(&cli) {
        Ok(report) => process::exit(exit_code(&report)),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            process::exit(1);
        }
    }
}
