// # HTTP Address Source
//
// This crate looks up the current public address from a plain-text "what is
// my IP" service. The address becomes the content of proposed A/AAAA records
// when none is configured explicitly.
//
// ## Behavior
//
// - One GET per lookup, no caching and no retries
// - The trimmed response body must parse as an IP address
// - When a family is requested, an address of the other family is an error
//
// Services known to answer in plain text:
// - https://api.ipify.org (IPv4) / https://api6.ipify.org (IPv6)
// - https://ifconfig.me/ip
// - https://icanhazip.com

use async_trait::async_trait;
use std::net::IpAddr;
use tdns_core::traits::{AddressFamily, AddressSource};
use tdns_core::{Error, Result};

/// Default lookup service (answers over IPv4 only)
pub const DEFAULT_LOOKUP_URL: &str = "https://api.ipify.org";

/// Default lookup service for IPv6 addresses
pub const DEFAULT_LOOKUP_URL_V6: &str = "https://api6.ipify.org";

/// Default lookup service for an address family
///
/// `api.ipify.org` never answers with an IPv6 address, so AAAA lookups need
/// the IPv6-only endpoint.
pub fn default_lookup_url(family: Option<AddressFamily>) -> &'static str {
    match family {
        Some(AddressFamily::V6) => DEFAULT_LOOKUP_URL_V6,
        _ => DEFAULT_LOOKUP_URL,
    }
}

/// HTTP-based address source
#[derive(Debug, Clone)]
pub struct HttpAddressSource {
    /// URL to fetch the address from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressSource {
    /// Create a new HTTP address source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the address from (e.g., "https://api.ipify.org")
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current address from the HTTP service
    async fn fetch_address(&self) -> Result<IpAddr> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::address_source(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::address_source(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| Error::address_source(format!("Failed to read response: {}", e)))?;

        let ip_text = ip_text.trim();

        ip_text
            .parse()
            .map_err(|_| Error::address_source(format!("Invalid IP address: {}", ip_text)))
    }
}

impl Default for HttpAddressSource {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

#[async_trait]
impl AddressSource for HttpAddressSource {
    async fn current(&self, family: Option<AddressFamily>) -> Result<IpAddr> {
        let ip = self.fetch_address().await?;

        if let Some(family) = family
            && !family.matches(&ip)
        {
            return Err(Error::address_source(format!(
                "Expected {:?} address from {}, got: {}",
                family, self.url, ip
            )));
        }

        tracing::info!("Current address: {}", ip);
        Ok(ip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn serve(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn test_lookup_trims_body() {
        let server = serve(200, "203.0.113.5\n").await;
        let source = HttpAddressSource::new(server.uri());

        let ip = source.current(Some(AddressFamily::V4)).await.unwrap();
        assert_eq!(ip, "203.0.113.5".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_lookup_any_family() {
        let server = serve(200, "2001:db8::1").await;
        let source = HttpAddressSource::new(server.uri());

        let ip = source.current(None).await.unwrap();
        assert!(ip.is_ipv6());
    }

    #[tokio::test]
    async fn test_family_mismatch() {
        let server = serve(200, "2001:db8::1").await;
        let source = HttpAddressSource::new(server.uri());

        let err = source.current(Some(AddressFamily::V4)).await.unwrap_err();
        assert!(matches!(err, Error::AddressSource(_)));
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let server = serve(200, "<html>rate limited</html>").await;
        let source = HttpAddressSource::new(server.uri());

        assert!(source.current(None).await.is_err());
    }

    #[tokio::test]
    async fn test_http_error() {
        let server = serve(503, "").await;
        let source = HttpAddressSource::new(server.uri());

        let err = source.current(None).await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_default_url() {
        assert_eq!(HttpAddressSource::default().url(), DEFAULT_LOOKUP_URL);
    }

    #[test]
    fn test_default_url_per_family() {
        assert_eq!(default_lookup_url(Some(AddressFamily::V4)), DEFAULT_LOOKUP_URL);
        assert_eq!(default_lookup_url(Some(AddressFamily::V6)), DEFAULT_LOOKUP_URL_V6);
        assert_eq!(default_lookup_url(None), DEFAULT_LOOKUP_URL);
    }
}
