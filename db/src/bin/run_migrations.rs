//! Standalone migration runner.
//!
//! Applies every pending migration file and exits 0 on success (including
//! "nothing to do") or 1 on any fatal failure.

use std::process::ExitCode;

use tally_db::{migrate, Database};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    tracing::info!("database migration runner starting");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "migration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> tally_db::Result<()> {
    let db = Database::new();
    let pool = db.initialize().await?;

    let result = match migrate::list_migrations(&migrate::migrations_dir()) {
        Ok(files) => migrate::run(pool, &files).await.map(|_| ()),
        Err(e) => Err(e),
    };

    // The pool is torn down exactly once, on success and failure alike.
    db.close().await;

    result
}
