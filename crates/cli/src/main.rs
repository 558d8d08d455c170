// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bp`: the command-line entry point for the Blueprint provisioning
//! engine. Argv parsing, environment resolution, and terminal
//! presentation live here; everything else is `bp-engine`/`bp-handlers`.

mod color;
mod commands;
mod env;
mod exit_error;
mod reporter;
mod secret_prompt;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_error::ExitError;

const SUBCOMMAND_NAMES: &[&str] = &["plan", "apply", "encrypt", "status", "history", "help"];

#[derive(Parser)]
#[command(name = "bp", version, styles = color::styles())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dry-run: show what apply would do without doing it.
    Plan {
        blueprint: String,
        #[arg(long)]
        skip_group: Option<String>,
        #[arg(long)]
        skip_id: Option<String>,
    },
    /// Reconcile the blueprint against persisted state and execute the plan.
    Apply {
        blueprint: String,
        #[arg(long)]
        skip_group: Option<String>,
        #[arg(long)]
        skip_id: Option<String>,
    },
    /// Seal a file with a password, writing `<file>.enc`.
    Encrypt {
        file: PathBuf,
        #[arg(long = "password-id")]
        password_id: Option<String>,
    },
    /// Print the state document grouped by resource type.
    Status,
    /// Print captured output for a run, or the latest run if omitted.
    History {
        run: Option<u64>,
        step: Option<usize>,
    },
}

/// A bare positional argument that isn't a recognized subcommand keyword
/// is short for `apply <arg>` (spec.md §6).
fn rewrite_short_form(mut args: Vec<String>) -> Vec<String> {
    if args.len() >= 2 && !SUBCOMMAND_NAMES.contains(&args[1].as_str()) && !args[1].starts_with('-') {
        args.insert(1, "apply".to_string());
    }
    args
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env::tracing_filter()))
        .with_target(false)
        .init();
}

fn run(cli: Cli, home: &std::path::Path) -> Result<(), ExitError> {
    match cli.command {
        Command::Plan { blueprint, skip_group, skip_id } => {
            commands::plan::handle(&blueprint, skip_group.as_deref(), skip_id.as_deref(), home)
        }
        Command::Apply { blueprint, skip_group, skip_id } => {
            commands::apply::handle(&blueprint, skip_group.as_deref(), skip_id.as_deref(), home)
        }
        Command::Encrypt { file, password_id } => commands::encrypt::handle(&file, password_id.as_deref()),
        Command::Status => {
            commands::status::handle(home);
            Ok(())
        }
        Command::History { run, step } => commands::history::handle(home, run, step),
    }
}

fn main() -> ExitCode {
    init_tracing();

    let args = rewrite_short_form(std::env::args().collect());
    let cli = Cli::parse_from(args);

    let home = match env::home_dir() {
        Some(h) => h,
        None => {
            eprintln!("error: could not determine home directory");
            return ExitCode::from(1);
        }
    };

    match run(cli, &home) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.code.clamp(0, 255) as u8)
        }
    }
}
