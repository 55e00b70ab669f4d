//! Shopfront CLI - Database migrations and demo data.
//!
//! # Usage
//!
//! ```bash
//! # Create or upgrade the schema
//! shop-cli migrate
//!
//! # Insert a demo customer, product and order
//! shop-cli seed
//! ```
//!
//! Both commands read the same environment as the API server
//! (`SHOPFRONT_DATABASE_URL`, falling back to `DATABASE_URL`, and `.env`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Shopfront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo data (one customer, one product, one order)
    Seed {
        /// Email address for the demo customer
        #[arg(short, long, default_value = "ann@example.com")]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { email } => commands::seed::run(&email).await,
    }
}
