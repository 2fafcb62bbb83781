//! Command-line front end of the Strata floorplanner.
//!
//! Provides `strata solve` to floorplan one circuit of a JSON design and
//! `strata check` to validate a circuit without invoking the solver.

#![warn(missing_docs)]

mod check;
mod pipeline;
mod solve;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

/// Strata: ILP top-level floorplanning for analog layout.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Strata Floorplanner")]
pub struct Cli {
    /// Print only errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show solver debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// When to color diagnostics.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `strata.toml` file or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Subcommand.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of `strata`.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Floorplan one circuit and write the result.
    Solve(SolveArgs),
    /// Validate one circuit without solving it.
    Check(CheckArgs),
}

/// Selects a circuit of the design, by name or by position.
#[derive(Args, Debug, Clone)]
pub struct CircuitArgs {
    /// Circuit name.
    #[arg(short, long, conflicts_with = "index")]
    pub circuit: Option<String>,

    /// Circuit index (default 0).
    #[arg(long)]
    pub index: Option<usize>,
}

/// Arguments for the `strata solve` subcommand.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    /// JSON design database.
    pub design: PathBuf,

    /// Circuit selection.
    #[command(flatten)]
    pub target: CircuitArgs,

    /// JSON list of mirrored pin pairs.
    #[arg(short, long)]
    pub symmetry: Option<PathBuf>,

    /// Write the result JSON here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the design with the solution applied to this path.
    #[arg(long)]
    pub apply: Option<PathBuf>,
}

/// Arguments for the `strata check` subcommand.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// JSON design database.
    pub design: PathBuf,

    /// Circuit selection.
    #[command(flatten)]
    pub target: CircuitArgs,

    /// JSON list of mirrored pin pairs.
    #[arg(short, long)]
    pub symmetry: Option<PathBuf>,

    /// Diagnostic report format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Color mode for `--color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
    Auto,
    /// Always color.
    Always,
    /// Plain text.
    Never,
}

/// How `check` reports diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Rendered for a terminal.
    Text,
    /// A JSON array of diagnostics on stdout.
    Json,
}

/// Flags shared by every subcommand, resolved for the run.
pub struct GlobalArgs {
    /// `--quiet` was given.
    pub quiet: bool,
    /// `--verbose` was given.
    pub verbose: bool,
    /// Resolved color mode.
    pub color: bool,
    /// `--config` path, if any.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(color)
        .with_max_level(log_level(cli.quiet, cli.verbose))
        .init();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Solve(ref args) => solve::run(args, &global),
        Command::Check(ref args) => check::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(2);
        }
    }
}

/// Log level for the solver's `tracing` output. `--quiet` wins over `--verbose`.
fn log_level(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    }
}
