use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::config::AuthConfig;
use crate::error::ApiError;

/// Credential gate: forwards only when the request carries the configured
/// Basic credentials, otherwise answers 401 with a Basic challenge.
pub async fn require_credentials(
    State(expected): State<Arc<AuthConfig>>,
    request: Request,
    next: Next,
) -> Response {
    match basic_credentials(request.headers()) {
        Some((user, pass)) if user == expected.username && pass == expected.password => {
            next.run(request).await
        }
        Some((user, _)) => {
            tracing::warn!("Rejected credentials for user '{}'", user);
            challenge()
        }
        None => {
            tracing::debug!("Request without usable Basic credentials");
            challenge()
        }
    }
}

/// Decode `Authorization: Basic <base64(user:pass)>`
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let auth_str = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = auth_str.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

fn challenge() -> Response {
    let mut response = ApiError::unauthorized("Unauthorized").into_response();
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Basic realm=\"Restricted\""),
    );
    response
}
