use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{instrument, warn};

use crate::shared::{AppError, AppState};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// API key middleware - compares the x-api-key header against the
/// configured key and rejects mismatches with 403.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), auth::require_api_key))
///
/// The response body never says which check failed; the logs do.
#[instrument(skip(state, req, next))]
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|header| header.to_str().ok());

    match presented {
        Some(key) if key == state.api_key => Ok(next.run(req).await),
        Some(_) => {
            warn!(uri = %req.uri(), "Rejected request with wrong API key");
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
        None => {
            warn!(uri = %req.uri(), "Rejected request without API key");
            Err(AppError::Unauthorized("Unauthorized".to_string()))
        }
    }
}
