use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod api;
mod error;
mod service;
mod store;

use service::ResourceService;
use store::backend::Store;
use store::query::{execute_query, QueryFormat};
use store::sqlite::SqliteStore;

/// optrack - operational resource tracker
#[derive(Parser)]
#[command(name = "optrack", version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "optrack.db")]
    db_path: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and apply pending schema migrations
    Init,

    /// Run the HTTP API server
    Serve {
        /// Listen address
        #[arg(short, long, default_value = "127.0.0.1:3001")]
        listen: String,
    },

    /// Run a SQL query against the database
    Query {
        /// SQL query to execute (SELECT only)
        sql: String,

        /// Output format: table, json, csv
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Delete structured log entries whose resource no longer exists
    PurgeLogs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => cmd_init(&cli).await,
        Commands::Serve { ref listen } => cmd_serve(&cli, listen).await,
        Commands::Query {
            ref sql,
            ref format,
        } => cmd_query(&cli, sql, format).await,
        Commands::PurgeLogs => cmd_purge_logs(&cli).await,
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn open_store(cli: &Cli) -> Result<Arc<SqliteStore>> {
    let store = Arc::new(SqliteStore::open(&cli.db_path)?);
    store.initialize().await?;
    Ok(store)
}

// ─── Commands ────────────────────────────────────────────────────────────────

async fn cmd_init(cli: &Cli) -> Result<()> {
    open_store(cli).await?;
    println!("{} Database ready at {}", "✓".green().bold(), cli.db_path);
    Ok(())
}

async fn cmd_serve(cli: &Cli, listen: &str) -> Result<()> {
    let store = open_store(cli).await?;
    let service = Arc::new(ResourceService::new(store));
    let app = api::router(service);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!("optrack listening on {}", listen);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn cmd_query(cli: &Cli, sql: &str, format: &str) -> Result<()> {
    let store = open_store(cli).await?;
    let output = execute_query(store.as_ref(), sql, QueryFormat::parse(format)).await?;
    println!("{}", output);
    Ok(())
}

async fn cmd_purge_logs(cli: &Cli) -> Result<()> {
    let store = open_store(cli).await?;
    let service = ResourceService::new(store);
    let purged = service.purge_orphaned_logs().await?;
    if purged == 0 {
        println!("No orphaned log entries.");
    } else {
        println!(
            "{} Purged {} orphaned log entr{}",
            "✓".green().bold(),
            purged,
            if purged == 1 { "y" } else { "ies" }
        );
    }
    Ok(())
}
