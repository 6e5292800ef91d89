//! HTTP route definitions.

mod counter;
mod health;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new().merge(health::routes()).merge(counter::routes())
}
