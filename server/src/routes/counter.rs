//! Counter endpoint routes.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::{handle_get_counter, handle_put_counter, CounterValue};
use crate::AppState;

/// Create counter routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/counter", get(get_handler).put(put_handler))
}

/// GET /counter - Read the caller's counter.
async fn get_handler(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CounterValue>> {
    let response = handle_get_counter(&state.pool, auth.user_id).await?;
    Ok(Json(response))
}

/// PUT /counter - Write the caller's counter.
async fn put_handler(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CounterValue>,
) -> Result<Json<CounterValue>> {
    let response = handle_put_counter(&state.pool, auth.user_id, request).await?;
    Ok(Json(response))
}
