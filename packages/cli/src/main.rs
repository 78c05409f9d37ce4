mod commands;
mod config;
mod store;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{diff, edit, show, validate, DiffArgs, EditArgs, ShowArgs, ValidateArgs};
use tracing::Level;

/// Catalog CLI - edit catalog documents from JSON files
#[derive(Parser, Debug)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a document summary and its picker options
    Show(ShowArgs),

    /// Check document fields, failing on any issue
    Validate(ValidateArgs),

    /// Apply a mutation script and optionally save the result
    Edit(EditArgs),

    /// Compare two document files
    Diff(DiffArgs),
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| {
            let cwd = cwd.display().to_string();
            match cli.command {
                Command::Show(args) => show(args, &cwd),
                Command::Validate(args) => validate(args, &cwd),
                Command::Edit(args) => edit(args, &cwd),
                Command::Diff(args) => diff(args, &cwd),
            }
        });

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
