use std::net::IpAddr;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("GET {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url}: {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url}: empty country name")]
    Empty { url: String },
}

/// Resolves a client address to the name of its country
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn country_name(&self, ip: IpAddr) -> Result<String, GeoError>;
}

/// Client for ipapi-style services that answer `GET {base}/{ip}/country_name`
/// with the bare country name as text.
///
/// No request timeout is set: a stalled lookup holds the request open.
#[derive(Clone)]
pub struct IpApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl IpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/{}/country_name", self.base_url, ip)
    }
}

#[async_trait]
impl CountryLookup for IpApiClient {
    async fn country_name(&self, ip: IpAddr) -> Result<String, GeoError> {
        let url = self.lookup_url(ip);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| GeoError::Request { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeoError::Status { url, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| GeoError::Request { url: url.clone(), source })?;

        let name = body.trim();
        if name.is_empty() {
            return Err(GeoError::Empty { url });
        }
        tracing::debug!("Resolved {} to {}", ip, name);
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_lookup_url_for_both_address_families() {
        let client = IpApiClient::new("https://ipapi.co/");
        assert_eq!(
            client.lookup_url("102.38.233.1".parse().unwrap()),
            "https://ipapi.co/102.38.233.1/country_name"
        );
        assert_eq!(
            client.lookup_url("2001:db8::1".parse().unwrap()),
            "https://ipapi.co/2001:db8::1/country_name"
        );
    }
}
