//! quickeval command-line interface

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use quickeval::QueryEngine;
use quickeval::cli::output::{self, OutputFormat};
use quickeval::cli::{EngineOptions, commands, repl};
use quickeval::types::AngleUnit;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Multi-domain query evaluator
#[derive(Parser)]
#[command(name = "quickeval")]
#[command(author, version, about = "Evaluate arithmetic, logic, unit and date queries", long_about = None)]
struct Cli {
    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Pretty, global = true)]
    format: OutputFormat,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Decimal places for results (0-28)
    #[arg(short, long, global = true)]
    precision: Option<u32>,

    /// Angle unit for trigonometric functions (radians, degrees, gradians)
    #[arg(short, long, global = true)]
    angle: Option<AngleUnit>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one or more queries
    Eval {
        /// Queries to evaluate, each as one argument
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Show the detected domain, tokens and validity of a query
    Parse {
        /// Query words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show the classification and module priority of a query
    Classify {
        /// Query words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Start interactive REPL
    Repl,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let options = EngineOptions {
        config_file: cli.config,
        precision: cli.precision,
        angle_unit: cli.angle,
    };
    let engine = QueryEngine::new(options.resolve()?)?;

    let rendered = match cli.command {
        Commands::Eval { queries } => commands::eval(&engine, &queries, cli.format)?,
        Commands::Parse { query } => commands::parse(&engine, &query.join(" "), cli.format)?,
        Commands::Classify { query } => commands::classify(&engine, &query.join(" "), cli.format)?,
        Commands::Repl => return repl::run(engine),
    };
    println!("{rendered}");
    Ok(())
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();
    output::setup_colors(&cli.color);
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
