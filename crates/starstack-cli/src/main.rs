mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starstack", about = "Star-field alignment and stacking tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect stars in an image and print the catalog
    Detect(commands::detect::DetectArgs),
    /// Align one image onto a reference image
    Align(commands::align::AlignArgs),
    /// Align and stack every image in a directory
    Stack(commands::stack::StackArgs),
    /// Run the pipeline from a TOML config file
    Run(commands::run::RunArgs),
    /// Print or save the default pipeline config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Align(args) => commands::align::run(args),
        Commands::Stack(args) => commands::stack::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
