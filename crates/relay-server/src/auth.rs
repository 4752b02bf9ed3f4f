//! Simple API Key Authentication (Bearer Token)
//!
//! Guards persona management and ask routes. Slack cannot send our bearer
//! token, so its webhook relies on request signing instead.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// API Key from secrets
static API_KEY: std::sync::OnceLock<String> = std::sync::OnceLock::new();

/// Initialize the API key
pub fn init_api_key(key: String) {
    let _ = API_KEY.set(key);
}

fn get_api_key() -> Option<&'static str> {
    API_KEY.get().map(|s| s.as_str())
}

/// Check an Authorization header value against the expected key
fn check_bearer(auth_header: Option<&str>, api_key: &str) -> Result<(), StatusCode> {
    match auth_header {
        Some(header) => match header.strip_prefix("Bearer ") {
            Some(token) if token == api_key => Ok(()),
            Some(_) => {
                tracing::warn!("Invalid API key attempted");
                Err(StatusCode::UNAUTHORIZED)
            }
            None => {
                tracing::warn!("Invalid Authorization header format");
                Err(StatusCode::UNAUTHORIZED)
            }
        },
        None => {
            tracing::warn!("Missing Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Authentication middleware
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    require_api_key(get_api_key(), request, next).await
}

/// Bearer check against `api_key`
async fn require_api_key(
    api_key: Option<&str>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let api_key = match api_key {
        Some(key) if !key.is_empty() => key,
        // No API key configured = auth disabled (for development)
        _ => return Ok(next.run(request).await),
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    check_bearer(auth_header, api_key)?;
    Ok(next.run(request).await)
}
