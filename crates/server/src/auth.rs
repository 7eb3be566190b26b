use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::ApiError;
use crate::metrics;
use crate::state::ServerState;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware: require `X-API-Key` to equal the configured secret.
/// Runs before the handler, so a rejected call never reaches the store.
pub async fn require_api_key(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ok = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|k| k == &*state.api_key);

    if !ok {
        metrics::AUTH_REJECTED_TOTAL.inc();
        warn!(method = %req.method(), path = %req.uri().path(), "rejected request with missing or invalid API key");
        return Err(ApiError::forbidden());
    }

    Ok(next.run(req).await)
}
