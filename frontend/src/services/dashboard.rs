//! HTTP client for the dashboard endpoint.

use gloo_net::http::Request;

use crate::types::{AppError, AppResult, DashboardResponse};

/// Build the dashboard URL with an optional initial selection.
pub fn dashboard_url(backend_url: &str, regions: &[String]) -> String {
    let base = format!("{}/api/dashboard", backend_url);
    if regions.is_empty() {
        return base;
    }
    let query = regions.join(",");
    format!(
        "{}?regions={}",
        base,
        js_sys::encode_uri_component(&query)
    )
}

/// Fetch the full page payload.
pub async fn fetch_dashboard(backend_url: &str, regions: &[String]) -> AppResult<DashboardResponse> {
    let url = dashboard_url(backend_url, regions);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| AppError::Network(e.to_string()))?;

    if !response.ok() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(AppError::Server {
            status: response.status(),
            message: error_message(&message),
        });
    }

    response
        .json::<DashboardResponse>()
        .await
        .map_err(|e| AppError::Decode(e.to_string()))
}

/// Pull `error` out of the backend's JSON error body, or keep the raw text.
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_url_without_regions() {
        assert_eq!(
            dashboard_url("http://localhost:3000", &[]),
            "http://localhost:3000/api/dashboard"
        );
    }

    #[test]
    fn test_error_message_from_json_body() {
        let body = r#"{"renderId":"x","status":"error","error":"Download failed"}"#;
        assert_eq!(error_message(body), "Download failed");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }
}
