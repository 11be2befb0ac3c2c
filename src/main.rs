use anyhow::Result;
use clap::{Parser, Subcommand};
use costctl::commands::{self, CommandContext, FleetArgs, SingleArgs, WorkloadCommands};
use costctl::config::{self, Config};
use costctl::error::CostctlError;
use costctl::exit_codes::exit_code_for_anyhow;
use costctl::render::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "costctl")]
#[command(
    about = "Find the cheapest cloud configuration for your workload",
    long_about = "costctl describes a workload as apps made of components and asks a cost\noptimization service for the cheapest instances to run it.\n\nSupports:\n  - AWS, Azure, and hybrid (AWS + Azure) catalogs\n  - Spot and on-demand pricing\n  - Multi-app fleet packing and single-instance lookup"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Optimization service base URL
    #[arg(long, global = true, env = "COSTCTL_API_URL")]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find cost-optimal fleet configurations for a workload draft
    Fleet(FleetArgs),
    /// Find the cheapest instances for one vCPU/memory sizing
    Single(SingleArgs),
    /// Create and edit workload drafts
    Workload {
        #[command(subcommand)]
        subcommand: WorkloadCommands,
    },
    /// Initialize configuration
    Init {
        /// Where to write the config file
        #[arg(short, long, default_value = ".costctl.toml")]
        path: PathBuf,
    },
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let ctx = CommandContext {
        api_url: config.api_url(cli.api_url.as_deref()),
        output: cli.output,
        config,
    };

    match cli.command {
        Commands::Fleet(args) => commands::handle_fleet(args, &ctx).await?,
        Commands::Single(args) => commands::handle_single(args, &ctx).await?,
        Commands::Workload { subcommand } => commands::handle_workload(subcommand)?,
        Commands::Init { path } => config::init_config(&path)?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(cli).await {
        // Config errors keep their context chain (file path and tips)
        let message = match err.downcast_ref::<CostctlError>() {
            Some(e) if !matches!(e, CostctlError::Config(_)) => e.user_message(),
            _ => format!("{:#}", err),
        };
        eprintln!("Error: {}", message);
        std::process::exit(exit_code_for_anyhow(&err));
    }
}
