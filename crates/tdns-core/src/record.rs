//! DNS record descriptors
//!
//! A [`DnsRecord`] is both the shape of records the caller already knows
//! about and the shape of records a reconciliation pass proposes. Only the
//! name takes part in duplicate detection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type
///
/// Types other than the ones named here are carried verbatim so that a
/// caller-supplied record set round-trips untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address record
    #[default]
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name record
    Cname,
    /// Any other record type
    Other(String),
}

impl RecordType {
    /// Whether records of this type carry an IP address as content
    pub fn is_address(&self) -> bool {
        matches!(self, RecordType::A | RecordType::Aaaa)
    }

    /// Record type as it appears on the wire
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Other(other) => other,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            _ => RecordType::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A DNS record descriptor: type, name, content, proxy flag and TTL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Record type
    #[serde(rename = "type", default)]
    pub record_type: RecordType,

    /// Fully qualified record name (e.g. "app.example.com")
    pub name: String,

    /// Record content: an IP literal or a target name
    #[serde(default)]
    pub content: String,

    /// Whether traffic is proxied by the DNS provider
    #[serde(default)]
    pub proxied: bool,

    /// Time-to-live in seconds (1 = automatic)
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl DnsRecord {
    /// Create a record with the given name and default type, content and TTL
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            record_type: RecordType::default(),
            name: name.into(),
            content: String::new(),
            proxied: false,
            ttl: default_ttl(),
        }
    }

    /// Set the record type
    pub fn with_type(mut self, record_type: RecordType) -> Self {
        self.record_type = record_type;
        self
    }

    /// Set the record content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the proxied flag
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }
}

pub(crate) fn default_ttl() -> u32 {
    1
}
