//! Configuration types for the tdns system
//!
//! All configuration for a reconciliation pass travels in one explicit
//! [`SyncConfig`] value; nothing is read from process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::IpAddr;
use url::Url;

use crate::record::{RecordType, default_ttl};

/// Path of the router listing, relative to an instance's base URL
pub const ROUTERS_PATH: &str = "api/http/routers";

/// Main reconciliation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Traefik instances to poll, in processing order
    pub instances: Vec<TraefikInstance>,

    /// Defaults applied to every proposed record
    #[serde(default)]
    pub defaults: RecordDefaults,

    /// Zone name, used as content for CNAME records
    #[serde(default)]
    pub zone_name: String,

    /// Current public address, used as content for address records
    #[serde(default)]
    pub current_address: Option<IpAddr>,
}

impl SyncConfig {
    /// Create a new configuration with defaults and no instances
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance
    pub fn with_instance(mut self, instance: TraefikInstance) -> Self {
        self.instances.push(instance);
        self
    }

    /// Set the record defaults
    pub fn with_defaults(mut self, defaults: RecordDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the zone name
    pub fn with_zone_name(mut self, zone_name: impl Into<String>) -> Self {
        self.zone_name = zone_name.into();
        self
    }

    /// Set the current address
    pub fn with_current_address(mut self, address: IpAddr) -> Self {
        self.current_address = Some(address);
        self
    }

    /// Validate the configuration
    ///
    /// URLs are only checked for presence here; they are resolved (and
    /// rejected when malformed) as each instance is processed.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.instances.is_empty() {
            return Err(crate::Error::config("No Traefik instances configured"));
        }

        let mut names = HashSet::new();
        for instance in &self.instances {
            instance.validate()?;
            if !names.insert(instance.name.as_str()) {
                return Err(crate::Error::config(format!(
                    "Duplicate Traefik instance name: {}",
                    instance.name
                )));
            }
        }

        self.defaults.validate()?;

        match self.defaults.record_type {
            RecordType::Cname if self.zone_name.is_empty() => Err(crate::Error::config(
                "A zone name is required when the default record type is CNAME",
            )),
            RecordType::A => self.require_address(IpAddr::is_ipv4, "IPv4"),
            RecordType::Aaaa => self.require_address(IpAddr::is_ipv6, "IPv6"),
            _ => Ok(()),
        }
    }

    fn require_address(
        &self,
        matches: fn(&IpAddr) -> bool,
        family: &str,
    ) -> Result<(), crate::Error> {
        match self.current_address {
            Some(ref address) if matches(address) => Ok(()),
            Some(address) => Err(crate::Error::config(format!(
                "Default record type {} needs an {} address, got {}",
                self.defaults.record_type, family, address
            ))),
            None => Err(crate::Error::config(format!(
                "Default record type {} needs a current address",
                self.defaults.record_type
            ))),
        }
    }

    /// Content shared by every record proposed in a pass
    ///
    /// Address records point at the current address and CNAME records at the
    /// zone. Any other type gets empty content.
    pub fn record_content(&self) -> String {
        if self.defaults.record_type.is_address() {
            return self
                .current_address
                .map(|address| address.to_string())
                .unwrap_or_default();
        }

        match self.defaults.record_type {
            RecordType::Cname => self.zone_name.clone(),
            _ => String::new(),
        }
    }
}

/// A Traefik instance to poll
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TraefikInstance {
    /// Display name, used in logs and reports
    pub name: String,

    /// Base URL of the Traefik API (e.g. "http://traefik:8080")
    pub url: String,

    /// Basic auth username
    #[serde(default)]
    pub username: Option<String>,

    /// Basic auth password
    #[serde(default)]
    pub password: Option<String>,

    /// Hostnames containing any of these substrings are never proposed
    #[serde(default)]
    pub ignored_rules: Vec<String>,
}

// Keeps the password out of logs
impl std::fmt::Debug for TraefikInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraefikInstance")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<REDACTED>"))
            .field("ignored_rules", &self.ignored_rules)
            .finish()
    }
}

impl TraefikInstance {
    /// Create a new instance configuration
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set basic auth credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Add an ignore-list entry
    pub fn with_ignored_rule(mut self, rule: impl Into<String>) -> Self {
        self.ignored_rules.push(rule.into());
        self
    }

    /// Validate the instance configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.is_empty() {
            return Err(crate::Error::config("Traefik instance name cannot be empty"));
        }
        if self.url.is_empty() {
            return Err(crate::Error::config(format!(
                "Traefik instance {} has no URL",
                self.name
            )));
        }
        if self.ignored_rules.iter().any(String::is_empty) {
            return Err(crate::Error::config(format!(
                "Traefik instance {} has an empty ignored rule",
                self.name
            )));
        }
        Ok(())
    }

    /// Credentials for basic auth, present only when both parts are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Resolve the router listing endpoint for this instance
    ///
    /// The routers path is joined onto whatever path the base URL already
    /// carries, so an API served under a prefix keeps that prefix.
    pub fn routers_url(&self) -> Result<Url, crate::Error> {
        let mut url = Url::parse(&self.url).map_err(|e| {
            crate::Error::config(format!(
                "Unable to parse Traefik URL {} for instance {}: {}",
                self.url, self.name, e
            ))
        })?;

        if url.cannot_be_a_base() {
            return Err(crate::Error::config(format!(
                "Traefik URL {} for instance {} cannot be a base URL",
                self.url, self.name
            )));
        }

        let path = format!("{}/{}", url.path().trim_end_matches('/'), ROUTERS_PATH);
        url.set_path(&path);
        Ok(url)
    }
}

/// Defaults for proposed records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDefaults {
    /// Record type for every proposed record
    #[serde(default)]
    pub record_type: RecordType,

    /// Whether proposed records are proxied
    #[serde(default)]
    pub proxied: bool,

    /// TTL for proposed records (1 = automatic)
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl RecordDefaults {
    /// Validate the defaults
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.ttl != 1 && !(60..=86400).contains(&self.ttl) {
            return Err(crate::Error::config(format!(
                "TTL must be 1 (automatic) or between 60 and 86400 seconds. Got: {}",
                self.ttl
            )));
        }
        Ok(())
    }
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            record_type: RecordType::default(),
            proxied: false,
            ttl: default_ttl(),
        }
    }
}
