//! Static API-key gate for mutating routes.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::Response,
};

/// Header carrying the pre-shared key.
pub const API_KEY_HEADER: &str = "Authorization";

/// Read requests pass untouched; every other method must present the exact
/// configured key or is rejected before reaching its handler.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method();
    if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if presented != Some(state.api_key.as_ref()) {
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}
