//! Service key authentication for the dashboard CRUD surface.
//!
//! End-user authentication is out of scope; the dashboard frontend talks to
//! this API through its own backend, which holds a single service key.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Header carrying the dashboard service key.
pub const SERVICE_KEY_HEADER: &str = "X-Service-Key";

/// Middleware requiring a valid service key on dashboard routes.
pub async fn require_service_key(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let presented = req
        .headers()
        .get(SERVICE_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if !state.config.security.service_key.is_empty()
            && key == state.config.security.service_key =>
        {
            next.run(req).await
        }
        _ => ApiError::Unauthorized("Invalid or missing service key".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_key_header_name() {
        assert_eq!(SERVICE_KEY_HEADER, "X-Service-Key");
    }
}
