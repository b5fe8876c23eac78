//! teamforge CLI
//!
//! Runs the ranking engine one step at a time or end to end.
//!
//! # Commands
//!
//! - `distribute`: write partition descriptors and print the task names
//! - `evaluate <TASK>`: evaluate one partition task
//! - `reduce`: merge partition results into the final rankings
//! - `result <MODEL>`: print a stored ranking
//! - `explain <MODEL> <A> <B> <C>`: print the score breakdown of one team as JSON
//! - `run`: distribute, evaluate and reduce every model
//!
//! Every command takes trailing configuration arguments: file paths (YAML,
//! or TOML by extension) and `dotted.path=value` overrides.

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

mod commands;
mod error;

use error::CliExitCode;

/// Exhaustive team ranking engine
#[derive(Parser)]
#[command(name = "teamforge")]
#[command(version)]
#[command(about = "Partition, evaluate and reduce exhaustive team rankings")]
#[command(propagate_version = true)]
struct Cli {
    /// Show per-partition progress and storage traffic
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Write partition descriptors for every model and print the task names
    Distribute {
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
    /// Evaluate one partition task, named `<model>.<seq>`
    Evaluate {
        task: String,
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
    /// Merge partition results into final rankings
    Reduce {
        /// Reduce only this model
        #[arg(short, long)]
        model: Option<String>,
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
    /// Print the stored ranking of a model
    Result {
        model: String,
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
    /// Print the per-feature score breakdown of one team as JSON
    Explain {
        model: String,
        first: String,
        second: String,
        third: String,
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
    /// Distribute, evaluate and reduce every model
    Run {
        #[arg(value_name = "CONFIG_OR_OVERRIDE")]
        config: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    teamforge_console::init(cli.verbose);

    let mut stdout = io::stdout().lock();
    match commands::execute(cli.command, &mut stdout) {
        Ok(code) => code.into(),
        Err(e) => {
            eprintln!("{} {}", "error:".bright_red().bold(), e);
            CliExitCode::from(&e).into()
        }
    }
}
