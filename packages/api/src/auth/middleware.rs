//! Bearer-token guard for protected routes.
//!
//! [`require_auth`] reads `Authorization: Bearer <token>`, verifies the token and
//! inserts the resolved [`Identity`] into the request extensions. Handlers behind it
//! take `Extension<Identity>`. No storage lookup happens here.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use super::token::Identity;
use crate::error::ApiError;
use crate::state::AppState;

/// Extract the bearer token from the Authorization header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers()).ok_or(ApiError::Unauthorized("Missing token"))?;
    let identity: Identity = state.tokens.verify(token).map_err(|e| {
        debug!("rejected token: {e}");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
