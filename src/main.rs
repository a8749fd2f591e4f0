use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use game_rental::config::Args;
use game_rental::console::{LineTerminal, Shell};
use game_rental::schema::create_schema;
use game_rental::PostgresUnitOfWork;

/// Initialize tracing with the GAME_RENTAL_LOG environment variable.
///
/// Logs go to stderr and default to "warn" so they stay out of the menus.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("GAME_RENTAL_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Connecting to database {}...", args.describe());
    // One session for the whole process; units of work never overlap.
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(args.connect_options()?)
        .await
        .with_context(|| format!("Unable to connect to database {}", args.describe()))?;
    println!("Done");

    create_schema(&pool)
        .await
        .context("Unable to prepare database schema")?;

    let uow = PostgresUnitOfWork::new(Arc::new(pool.clone()));
    let mut shell = Shell::new(LineTerminal::stdio(), uow);
    let result = shell.run().await;

    print!("Disconnecting from database...");
    pool.close().await;
    println!("Done\n\nBye !");
    info!("session ended");

    result.context("Console session failed")
}
