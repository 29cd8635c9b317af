//! Conceptmap CLI - inspect, filter and normalize concept map files

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{check, completions, distance, export, view};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "conceptmap")]
#[command(author, version, about = "Parse and explore concept map DSL files")]
pub struct Cli {
    /// Output format: table, json (default from config)
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a DSL file and report warnings
    Check(check::CheckArgs),
    /// Show the nodes and edges visible under a filter
    View(view::ViewArgs),
    /// Distance between two concepts
    Distance(distance::DistanceArgs),
    /// Print the normalized DSL for a file
    Export(export::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Application context shared by commands
pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
}

impl AppContext {
    pub fn new(cli: &Cli) -> Self {
        let config = Config::load();
        let format = OutputFormat::from(cli.format.as_deref().unwrap_or(&config.format));
        Self { config, format }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting conceptmap CLI");

    let ctx = AppContext::new(&cli);

    match &cli.command {
        Commands::Check(args) => check::run(args, &ctx)?,
        Commands::View(args) => view::run(args, &ctx)?,
        Commands::Distance(args) => distance::run(args, &ctx)?,
        Commands::Export(args) => export::run(args)?,
        Commands::Config(args) => commands::config::run(args, &ctx)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
