//! Gate check deciding whether migrations need to run at all.

use sqlx::PgPool;

/// Table whose presence means migrations have been applied at least once.
const SENTINEL_TABLE: &str = "users";

/// Outcome of the gate check.
///
/// `Unknown` means the check itself failed (connectivity, permissions); the
/// caller decides whether that should block a deployment. The probe never
/// raises to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationStatus {
    Needed,
    NotNeeded,
    Unknown,
}

impl MigrationStatus {
    /// Whether the runner should be invoked.
    pub fn needs_run(self) -> bool {
        self == MigrationStatus::Needed
    }
}

/// Probe the schema catalog for the sentinel table.
///
/// Migration is needed exactly when the sentinel table is absent. Probe
/// failures are logged and reported as [`MigrationStatus::Unknown`].
pub async fn migration_status(pool: &PgPool) -> MigrationStatus {
    match sentinel_exists(pool).await {
        Ok(true) => MigrationStatus::NotNeeded,
        Ok(false) => MigrationStatus::Needed,
        Err(e) => {
            tracing::warn!(error = %e, "could not determine migration status");
            MigrationStatus::Unknown
        }
    }
}

async fn sentinel_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = $1
        )
        "#,
    )
    .bind(SENTINEL_TABLE)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_needed_triggers_a_run() {
        assert!(MigrationStatus::Needed.needs_run());
        assert!(!MigrationStatus::NotNeeded.needs_run());
        assert!(!MigrationStatus::Unknown.needs_run());
    }
}
