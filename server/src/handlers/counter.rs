//! Counter handlers - read and write the caller's personal counter.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::db;
use crate::error::Result;

/// A counter value, used for both requests and responses.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CounterValue {
    pub value: i64,
}

/// Read the caller's counter, creating a zero-valued row on first access.
pub async fn handle_get_counter(pool: &PgPool, user_id: i64) -> Result<CounterValue> {
    match db::get_counter(pool, user_id).await? {
        Some(value) => Ok(CounterValue { value }),
        None => {
            db::create_counter(pool, user_id).await?;
            Ok(CounterValue { value: 0 })
        }
    }
}

/// Upsert the caller's counter and echo the value unchanged.
pub async fn handle_put_counter(
    pool: &PgPool,
    user_id: i64,
    request: CounterValue,
) -> Result<CounterValue> {
    db::upsert_counter(pool, user_id, request.value).await?;
    Ok(request)
}
