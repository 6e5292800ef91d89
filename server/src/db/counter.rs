//! Database operations for the counter table.

use sqlx::PgPool;

/// Get a user's counter value, if a row exists.
pub async fn get_counter(pool: &PgPool, user_id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(r#"SELECT value FROM counter WHERE user_id = $1"#)
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Create a zero-valued counter row for a user.
pub async fn create_counter(pool: &PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query(r#"INSERT INTO counter (user_id, value, updated_at) VALUES ($1, 0, NOW())"#)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Upsert a user's counter value.
pub async fn upsert_counter(pool: &PgPool, user_id: i64, value: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO counter (user_id, value, updated_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id)
        DO UPDATE SET value = $2, updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}
