//! Idempotent schema-migration runner.
//!
//! Migrations are plain SQL files applied in lexicographic filename order.
//! Re-running the sequence against a partially migrated database is safe:
//! failures whose message indicates the schema object already exists are
//! skipped. A gate check lets deployments invoke the runner unconditionally.

mod executor;
mod gate;
mod scanner;

pub use executor::{run, MigrationReport};
pub use gate::{migration_status, MigrationStatus};
pub use scanner::{list_migrations, MigrationFile};

use std::env;
use std::path::PathBuf;

/// Directory scanned when `MIGRATIONS_DIR` is not set.
const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Resolve the migrations directory from the environment.
pub fn migrations_dir() -> PathBuf {
    env::var("MIGRATIONS_DIR")
        .unwrap_or_else(|_| DEFAULT_MIGRATIONS_DIR.into())
        .into()
}
