//! waymark CLI - Milestone Roadmap Engine
//!
//! Command-line front end: loads a project table from CSV, resolves the
//! milestone columns, and builds or renders the portfolio roadmap.

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "waymark")]
#[command(author, version, about = "Milestone roadmap engine", long_about = None)]
struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a table and report which columns were detected
    Check {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column profile (TOML) overriding the built-in header candidates
        #[arg(long, value_name = "TOML")]
        profile: Option<PathBuf>,
    },

    /// Build the roadmap and render it
    Roadmap {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column profile (TOML) overriding the built-in header candidates
        #[arg(long, value_name = "TOML")]
        profile: Option<PathBuf>,

        /// Reference date for the now line (defaults to today)
        #[arg(long, value_name = "DATE")]
        as_of: Option<NaiveDate>,

        /// Output format: text, json or svg
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Portfolio KPIs: project count, revenue total, top contributors
    Summary {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Column profile (TOML) overriding the built-in header candidates
        #[arg(long, value_name = "TOML")]
        profile: Option<PathBuf>,

        /// Roll revenue up by this group column (e.g. Market)
        #[arg(long, value_name = "COLUMN")]
        group_by: Option<String>,

        /// How many top projects to list (0 hides the section)
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Keep only rows matching COLUMN=V1,V2 (repeatable, all must match)
        #[arg(long = "filter", value_name = "COLUMN=V1,V2")]
        filters: Vec<String>,
    },

    /// Write a filtered copy of the table as CSV
    Export {
        /// Input CSV file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output CSV file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Keep only rows matching COLUMN=V1,V2 (repeatable, all must match)
        #[arg(long = "filter", value_name = "COLUMN=V1,V2")]
        filters: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Check { file, profile }) => commands::run_check(&file, profile.as_deref()),
        Some(Commands::Roadmap {
            file,
            profile,
            as_of,
            format,
            output,
        }) => commands::run_roadmap(&file, profile.as_deref(), as_of, &format, output.as_deref()),
        Some(Commands::Summary {
            file,
            profile,
            group_by,
            top,
            filters,
        }) => commands::run_summary(&file, profile.as_deref(), group_by.as_deref(), top, &filters),
        Some(Commands::Export {
            file,
            output,
            filters,
        }) => commands::run_export(&file, &output, &filters),
        None => {
            println!("waymark - Milestone Roadmap Engine");
            println!();
            println!("Run 'waymark --help' for available commands.");
            Ok(())
        }
    }
}

/// Map -v counts onto a tracing filter. RUST_LOG always wins.
fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
