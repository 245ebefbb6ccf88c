//! Hostname extraction from router rules
//!
//! The reconciler only ever asks "which hostname does this rule declare?".
//! Keeping that question behind a trait lets the matching strategy change
//! without touching the reconciliation pass.

/// Trait for extracting a hostname from a Traefik rule expression
pub trait HostMatcher: Send + Sync {
    /// Extract the hostname declared by a rule
    ///
    /// Returns `None` when the rule declares no recognizable hostname. An
    /// empty rule is not an error. When a rule declares several hostnames
    /// only the first is returned.
    fn extract_host<'a>(&self, rule: &'a str) -> Option<&'a str>;
}
