mod csv_export;
mod harvest;
mod sift_cmd;
mod sink;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "aisle")]
#[command(about = "Catalog harvesting command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Harvest the full catalog of every enabled venue.
    Harvest {
        /// Harvest only the venue with this slug.
        #[arg(long)]
        venue: Option<String>,
        /// Print what would be harvested without issuing any requests.
        #[arg(long)]
        dry_run: bool,
    },
    /// Fetch one venue's category tree and print it flattened.
    Categories {
        /// Venue slug; defaults to the first enabled venue.
        #[arg(long)]
        venue: Option<String>,
    },
    /// Extract product records from a captured response body on disk.
    Sift {
        /// Path to a JSON file holding a captured response body.
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = aisle_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Harvest { venue, dry_run } => {
            harvest::run_harvest(&config, venue.as_deref(), dry_run).await
        }
        Commands::Categories { venue } => harvest::run_categories(&config, venue.as_deref()).await,
        Commands::Sift { file } => sift_cmd::run_sift(&config, &file).await,
    }
}
