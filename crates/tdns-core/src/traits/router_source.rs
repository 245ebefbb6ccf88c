// # Router Source Trait
//
// Defines the interface for fetching the HTTP routers of a Traefik instance.
//
// ## Implementations
//
// - HTTP API: `tdns-source-traefik` crate
//
// ## Usage
//
// ```rust,ignore
// use tdns_core::RouterSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* RouterSource implementation */;
//     let endpoint = instance.routers_url()?;
//
//     for router in source.fetch_routers(&instance, &endpoint).await? {
//         println!("{}: {}", router.name, router.rule);
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use url::Url;

use crate::config::TraefikInstance;
use crate::router::TraefikRouter;

/// Trait for router source implementations
///
/// A source performs exactly one request per call and reports every failure
/// to the caller. It does not retry, skip, cache or reorder: the reconciler
/// treats any error as fatal to the whole pass, and routers are processed in
/// the order returned.
///
/// # Errors
///
/// Implementations map failures onto the core error classes:
///
/// - request construction or network failure → [`Error::Transport`](crate::Error::Transport)
/// - non-success HTTP status → [`Error::Status`](crate::Error::Status)
/// - unreadable body or invalid JSON → [`Error::Decode`](crate::Error::Decode)
#[async_trait]
pub trait RouterSource: Send + Sync {
    /// Fetch and decode the routers of one instance
    ///
    /// # Parameters
    ///
    /// - `instance`: The instance being polled (name and credentials)
    /// - `endpoint`: The resolved router listing URL for that instance
    async fn fetch_routers(
        &self,
        instance: &TraefikInstance,
        endpoint: &Url,
    ) -> Result<Vec<TraefikRouter>, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
