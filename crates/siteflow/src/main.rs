mod commands;
mod program;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "siteflow")]
#[command(about = "Declare static-website infrastructure as a resource graph", long_about = None)]
struct Cli {
    /// Verbose logging (DEBUG level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the declaration graph and show the creation plan
    Preview {
        /// Path to site.kdl (found automatically when omitted)
        #[arg(short = 'c', long, env = "SITEFLOW_CONFIG_PATH")]
        config: Option<PathBuf>,
    },
    /// Emit the declaration set as JSON for a provisioning engine
    Export {
        /// Path to site.kdl (found automatically when omitted)
        #[arg(short = 'c', long, env = "SITEFLOW_CONFIG_PATH")]
        config: Option<PathBuf>,
        /// Write to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Check the configuration and the declaration graph
    Validate {
        /// Path to site.kdl (found automatically when omitted)
        #[arg(short = 'c', long, env = "SITEFLOW_CONFIG_PATH")]
        config: Option<PathBuf>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive(tracing::Level::DEBUG.into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Preview { config } => commands::preview::handle(config).await,
        Commands::Export { config, output } => commands::export::handle(config, output).await,
        Commands::Validate { config } => commands::validate::handle(config).await,
        Commands::Version => {
            println!("siteflow {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
