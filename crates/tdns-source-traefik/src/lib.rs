// # Traefik Router Source
//
// This crate fetches the HTTP routers of a Traefik instance through its API.
//
// ## Behavior
//
// - One GET to `<base>/api/http/routers` per call
// - Basic auth when the instance carries both a username and a password
// - Any status other than 200 is an error
// - The body must be a JSON array of routers (or `null`, read as no routers)
// - ❌ NO retries, NO caching, NO timeouts (the caller decides how a failed
//   pass is rerun)
//
// ## Security
//
// Credentials travel only in the Authorization header and never appear in
// logs or error messages.

use async_trait::async_trait;
use reqwest::StatusCode;
use tdns_core::router::TraefikRouter;
use tdns_core::traits::RouterSource;
use tdns_core::{Error, Result, TraefikInstance};
use url::Url;

/// User agent sent with every request
const USER_AGENT: &str = concat!("tdns/", env!("CARGO_PKG_VERSION"));

/// Router source backed by the Traefik HTTP API
#[derive(Debug, Clone)]
pub struct TraefikRouterSource {
    /// HTTP client
    client: reqwest::Client,
}

impl TraefikRouterSource {
    /// Create a new router source
    pub fn new() -> Self {
        Self::with_client(
            reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
        )
    }

    /// Create a router source around an existing HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for TraefikRouterSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouterSource for TraefikRouterSource {
    async fn fetch_routers(
        &self,
        instance: &TraefikInstance,
        endpoint: &Url,
    ) -> Result<Vec<TraefikRouter>> {
        let mut request = self.client.get(endpoint.clone());
        if let Some((username, password)) = instance.credentials() {
            tracing::debug!("Using basic auth for Traefik instance {}", instance.name);
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(|e| {
            Error::transport(format!(
                "Unable to get Traefik ({}) rules: {}",
                instance.name,
                e.without_url()
            ))
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(
                "Traefik instance {} answered with HTTP status {}",
                instance.name,
                status
            );
            return Err(Error::status(&instance.name, status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            Error::decode(format!(
                "Unable to read Traefik ({}) rules: {}",
                instance.name,
                e.without_url()
            ))
        })?;

        // A `null` body is an empty listing
        let routers = serde_json::from_slice::<Option<Vec<TraefikRouter>>>(&body)
            .map_err(|e| {
                Error::decode(format!("Unable to load Traefik ({}) rules: {}", instance.name, e))
            })?
            .unwrap_or_default();

        tracing::debug!(
            "Traefik instance {} returned {} router(s)",
            instance.name,
            routers.len()
        );
        Ok(routers)
    }

    fn source_name(&self) -> &'static str {
        "traefik"
    }
}
