// # tdns-core
//
// Core library for reconciling Traefik routers into DNS records.
//
// ## Architecture Overview
//
// This library provides the reconciliation logic; I/O lives in plugin crates:
// - **RouterSource**: Trait for fetching the routers of a Traefik instance
// - **AddressSource**: Trait for looking up the current public address
// - **HostMatcher**: Trait for extracting a hostname from a rule expression
// - **Reconciler**: Single pass over all instances, appending new records
//
// ## Design Principles
//
// 1. **Explicit Configuration**: Every pass runs from a `SyncConfig` value
// 2. **Fail Fast**: The first fetch or decode error ends the pass
// 3. **Append Only**: Existing records are never edited or removed
// 4. **Sequential**: One instance at a time, one router at a time

pub mod config;
pub mod error;
pub mod matcher;
pub mod reconcile;
pub mod record;
pub mod router;
pub mod traits;

// Re-export core types for convenience
pub use traits::{AddressSource, HostMatcher, RouterSource};
pub use reconcile::{InstanceReport, Reconciler, SyncReport};
pub use matcher::RegexHostMatcher;
pub use config::{RecordDefaults, SyncConfig, TraefikInstance};
pub use record::{DnsRecord, RecordType};
pub use router::TraefikRouter;
pub use error::{Error, Result};
