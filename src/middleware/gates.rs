use std::sync::Arc;

use axum::{middleware::from_fn_with_state, routing::MethodRouter};
use thiserror::Error;

use super::basic_auth::require_credentials;
use super::geo_restrict::{require_country, GeoGate};
use crate::config::{AuthConfig, GeoConfig};
use crate::geo::CountryLookup;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("unknown gate option {0:?} (expected 1/geo or 2/basic)")]
    Unknown(String),
}

/// A request gate that can be placed in front of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Client address must resolve to the allowed country
    Geo,
    /// Request must carry the configured Basic credentials
    Credentials,
}

impl Gate {
    pub fn parse(id: &str) -> Result<Self, GateError> {
        match id.trim().to_ascii_lowercase().as_str() {
            "1" | "geo" => Ok(Gate::Geo),
            "2" | "basic" => Ok(Gate::Credentials),
            other => Err(GateError::Unknown(other.to_string())),
        }
    }

    /// Parse a comma separated option list such as `1,2`. Blank entries are skipped.
    pub fn parse_list(options: &str) -> Result<Vec<Self>, GateError> {
        options
            .split(',')
            .map(str::trim)
            .filter(|option| !option.is_empty())
            .map(Gate::parse)
            .collect()
    }
}

/// Everything the gates need, shared by all gated routes
#[derive(Clone)]
pub struct GateChain {
    gates: Vec<Gate>,
    credentials: Arc<AuthConfig>,
    geo: GeoGate,
}

impl GateChain {
    pub fn new(gates: Vec<Gate>, auth: &AuthConfig, geo: &GeoConfig, lookup: Arc<dyn CountryLookup>) -> Self {
        Self {
            gates,
            credentials: Arc::new(auth.clone()),
            geo: GeoGate {
                allowed_country: geo.allowed_country.clone(),
                trust_forwarded_for: geo.trust_forwarded_for,
                lookup,
            },
        }
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Wrap `route` with each configured gate in list order. Every gate wraps
    /// the result of the previous one, so the last gate listed runs first.
    pub fn wrap<S>(&self, route: MethodRouter<S>) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.gates.iter().fold(route, |route, gate| match gate {
            Gate::Credentials => {
                route.route_layer(from_fn_with_state(self.credentials.clone(), require_credentials))
            }
            Gate::Geo => route.route_layer(from_fn_with_state(self.geo.clone(), require_country)),
        })
    }
}
