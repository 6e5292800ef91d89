//! Authentication middleware.
//!
//! Requests carry an `Authorization: Bearer <jwt>` header issued by the
//! auth service. The token is verified HS256 against the shared secret and
//! identifies the caller's user id; anything else is rejected with 401
//! before any counter logic runs.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Token claims as issued by the auth service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The authenticated user's id
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Expiry, seconds since the epoch
    pub exp: usize,
}

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Strip the `Bearer ` scheme from an Authorization header value.
pub fn parse_bearer(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ").filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Missing authorization header"))?;

        let token = parse_bearer(header).ok_or((
            StatusCode::UNAUTHORIZED,
            "Invalid authorization header format",
        ))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.auth_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: data.claims.user_id,
        })
    }
}
