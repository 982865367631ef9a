use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::geo::CountryLookup;

/// State for the geo gate
#[derive(Clone)]
pub struct GeoGate {
    pub allowed_country: String,
    pub trust_forwarded_for: bool,
    pub lookup: Arc<dyn CountryLookup>,
}

/// Geo gate: resolves the caller's address to a country and forwards only
/// when it matches the allowed country exactly.
///
/// Absent or malformed address: 400. Lookup failure: 500. Other country: 401.
pub async fn require_country(
    State(gate): State<GeoGate>,
    request: Request,
    next: Next,
) -> Response {
    let ip = match client_ip(&request, gate.trust_forwarded_for) {
        Ok(ip) => ip,
        Err(msg) => {
            tracing::warn!("Geo gate rejected request: {}", msg);
            return ApiError::bad_request(msg).into_response();
        }
    };

    match gate.lookup.country_name(ip).await {
        Ok(country) if country == gate.allowed_country => {
            tracing::debug!("Geo gate accepted {} from {}", ip, country);
            next.run(request).await
        }
        Ok(country) => {
            tracing::warn!("Geo gate rejected {} from {}", ip, country);
            ApiError::unauthorized("Unauthorized").into_response()
        }
        Err(e) => {
            tracing::error!("Country lookup for {} failed: {}", ip, e);
            ApiError::internal_server_error("Country lookup failed").into_response()
        }
    }
}

fn client_ip(request: &Request, trust_forwarded_for: bool) -> Result<IpAddr, String> {
    if trust_forwarded_for {
        if let Some(value) = request.headers().get("x-forwarded-for") {
            let forwarded = value
                .to_str()
                .map_err(|_| "X-Forwarded-For header is not valid text".to_string())?;
            let first = forwarded.split(',').next().unwrap_or_default().trim();
            return first
                .parse::<IpAddr>()
                .map_err(|_| format!("remote address {:?} is not an IP", first));
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .ok_or_else(|| "remote address is unavailable".to_string())
}
