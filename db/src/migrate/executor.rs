//! Sequential migration execution with already-applied skip handling.

use sqlx::{Connection, PgPool};

use crate::error::{Error, Result};
use crate::migrate::MigrationFile;

/// Advisory lock key guarding migration runs. Two runner processes against
/// the same database serialize on this key.
const MIGRATION_LOCK_KEY: i64 = 0x74616c6c79;

/// Per-run summary of migration outcomes.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

/// Apply `files` in order against the database.
///
/// All statements run on a single connection holding a session advisory
/// lock, so concurrent runner invocations cannot interleave DDL. Files are
/// applied strictly sequentially: later migrations may depend on schema
/// state created by earlier ones.
///
/// A failure whose database message contains `already exists` or
/// `duplicate` is treated as "already applied" and skipped. Any other
/// failure aborts the run with [`Error::MigrationFailed`]; remaining files
/// are not attempted and the failed statement is not rolled back.
///
/// Note: no timeout is applied to an in-flight statement beyond the
/// driver's defaults, so a hung migration blocks the run indefinitely.
pub async fn run(pool: &PgPool, files: &[MigrationFile]) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    if files.is_empty() {
        tracing::info!("no migration files found");
        return Ok(report);
    }

    tracing::info!(count = files.len(), "found migration file(s)");

    let mut conn = pool.acquire().await?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await?;

    let mut failure: Option<Error> = None;

    for file in files {
        tracing::info!(file = %file.name, "running migration");

        match sqlx::raw_sql(&file.sql).execute(&mut *conn).await {
            Ok(_) => {
                tracing::info!(file = %file.name, "applied migration");
                report.applied.push(file.name.clone());
            }
            Err(e) if is_already_applied(&e) => {
                tracing::warn!(file = %file.name, "skipped migration (already applied)");
                report.skipped.push(file.name.clone());
            }
            Err(e) => {
                tracing::error!(file = %file.name, error = %e, "migration failed");
                failure = Some(Error::MigrationFailed {
                    file: file.name.clone(),
                    source: e,
                });
                break;
            }
        }
    }

    // Unlock on both paths. If the unlock itself fails the connection is
    // closed instead of returned to the pool, which drops the session lock.
    let unlock = sqlx::query("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_KEY)
        .execute(&mut *conn)
        .await;
    if unlock.is_err() {
        let _ = conn.detach().close().await;
    }

    match failure {
        Some(err) => Err(err),
        None => {
            tracing::info!(
                applied = report.applied.len(),
                skipped = report.skipped.len(),
                "all migrations completed"
            );
            Ok(report)
        }
    }
}

/// Best-effort idempotence check: a failed DDL statement whose message says
/// the object already exists means the file ran before. This matches on the
/// engine's error text (case-sensitive) rather than keeping a ledger table.
fn is_already_applied(err: &sqlx::Error) -> bool {
    match err.as_database_error() {
        Some(db_err) => is_already_applied_message(db_err.message()),
        None => false,
    }
}

fn is_already_applied_message(message: &str) -> bool {
    message.contains("already exists") || message.contains("duplicate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relation_exists_is_skippable() {
        assert!(is_already_applied_message(
            "relation \"users\" already exists"
        ));
    }

    #[test]
    fn duplicate_key_is_skippable() {
        assert!(is_already_applied_message(
            "duplicate key value violates unique constraint \"counter_pkey\""
        ));
    }

    #[test]
    fn unrelated_errors_are_fatal() {
        assert!(!is_already_applied_message(
            "syntax error at or near \"CRATE\""
        ));
        assert!(!is_already_applied_message(
            "permission denied for schema public"
        ));
    }

    #[test]
    fn classification_is_case_sensitive() {
        // The engine produces lowercase text; anything else is not ours to
        // classify.
        assert!(!is_already_applied_message("relation Already Exists"));
        assert!(!is_already_applied_message("Duplicate object"));
    }

    #[test]
    fn report_starts_empty() {
        let report = MigrationReport::default();
        assert!(report.applied.is_empty());
        assert!(report.skipped.is_empty());
    }
}
