//! Public widget configuration endpoint.

use axum::{extract::State, http::HeaderMap, Json};
use tracing::warn;

use domain::models::PublicWidgetConfig;
use persistence::repositories::WidgetConfigRepository;
use shared::crypto::extract_key_prefix;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::WidgetApiKey;

/// GET /widget-config?api_key=
///
/// Returns the sanitized public subset of a widget configuration. The API
/// key format is enforced by the extractor before this handler (and thus any
/// database access) runs. When the widget carries a domain allow-list, the
/// request's Origin (or Referer) must match one of its entries.
pub async fn get_widget_config(
    State(state): State<AppState>,
    key: WidgetApiKey,
    headers: HeaderMap,
) -> Result<Json<PublicWidgetConfig>, ApiError> {
    let repo = WidgetConfigRepository::new(state.pool.clone());
    let widget = repo
        .find_by_api_key(&key.0)
        .await?
        .ok_or_else(|| ApiError::NotFound("Widget configuration not found".to_string()))?
        .into_model();

    let origin = request_origin(&headers);
    if let Some(domains) = widget.allowed_domains.as_deref() {
        if !domains.is_empty() && !origin.is_empty() && !origin_allowed(&origin, domains) {
            warn!(
                origin = %origin,
                key_prefix = extract_key_prefix(&key.0).unwrap_or("unknown"),
                "Widget config request from disallowed domain"
            );
            return Err(ApiError::Forbidden("Domain not allowed".to_string()));
        }
    }

    Ok(Json(PublicWidgetConfig::from(widget)))
}

/// Origin header, falling back to Referer. Empty when neither is present;
/// script tags and server-side fetches do not always send one, and an empty
/// origin is allowed through.
fn request_origin(headers: &HeaderMap) -> String {
    headers
        .get("origin")
        .or_else(|| headers.get("referer"))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

/// Substring match of the header value against each allowed domain. A
/// non-empty header that matches no entry is rejected; blank entries never
/// match.
fn origin_allowed(origin: &str, allowed_domains: &[String]) -> bool {
    allowed_domains
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .any(|d| origin.contains(d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn domains(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_origin_allowed_exact_domain() {
        assert!(origin_allowed(
            "https://example.com",
            &domains(&["example.com"])
        ));
    }

    #[test]
    fn test_origin_allowed_with_path() {
        assert!(origin_allowed(
            "https://example.com/page",
            &domains(&["example.com"])
        ));
    }

    #[test]
    fn test_origin_rejected_for_other_domain() {
        assert!(!origin_allowed(
            "https://evil.com",
            &domains(&["example.com"])
        ));
    }

    #[test]
    fn test_origin_allowed_any_entry() {
        assert!(origin_allowed(
            "https://shop.example.org",
            &domains(&["example.com", "example.org"])
        ));
    }

    #[test]
    fn test_blank_entries_do_not_match_everything() {
        assert!(!origin_allowed("https://evil.com", &domains(&["", "  "])));
    }

    #[test]
    fn test_request_origin_prefers_origin_header() {
        let mut headers = HeaderMap::new();
        headers.insert("origin", HeaderValue::from_static("https://a.test"));
        headers.insert("referer", HeaderValue::from_static("https://b.test/x"));
        assert_eq!(request_origin(&headers), "https://a.test");
    }

    #[test]
    fn test_request_origin_falls_back_to_referer() {
        let mut headers = HeaderMap::new();
        headers.insert("referer", HeaderValue::from_static("https://b.test/x"));
        assert_eq!(request_origin(&headers), "https://b.test/x");
    }

    #[test]
    fn test_request_origin_empty_when_absent() {
        assert_eq!(request_origin(&HeaderMap::new()), "");
    }
}
