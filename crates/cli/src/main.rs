//! Sidra CLI - Dashboard diagnostics and data tools.
//!
//! # Usage
//!
//! ```bash
//! # Probe backend connectivity
//! sidra check
//!
//! # Print the dashboard summary
//! sidra stats
//!
//! # List orders (optionally by status)
//! sidra orders list --status pending --page 1
//! ```
//!
//! # Commands
//!
//! - `check` - Load config, build the client, probe a cheap count
//! - `stats` - Print order/product/user counts and revenue
//! - `orders list` - Paginated order listing

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sidra")]
#[command(author, version, about = "Sidra admin dashboard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe backend connectivity
    Check,
    /// Print the dashboard summary
    Stats,
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders, newest first
    List {
        /// Filter by status (`pending`, `paid`, `shipped`, `delivered`,
        /// `cancelled`)
        #[arg(short, long)]
        status: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Rows per page
        #[arg(short = 'n', long, default_value_t = 10)]
        per_page: u32,

        /// Free-text search over customer name, id, and phone
        #[arg(short, long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; default to info for our crates
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sidra=info,sidra_admin=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Check => commands::check::run().await?,
        Commands::Stats => commands::stats::run().await?,
        Commands::Orders { action } => match action {
            OrdersAction::List {
                status,
                page,
                per_page,
                query,
            } => {
                commands::orders::list(status.as_deref(), page, per_page, query).await?;
            }
        },
    }
    Ok(())
}
