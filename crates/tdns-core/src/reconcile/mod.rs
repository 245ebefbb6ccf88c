//! Router → DNS record reconciliation
//!
//! The Reconciler is responsible for:
//! - Fetching the routers of every configured Traefik instance
//! - Extracting the hostname each router rule declares
//! - Dropping hostnames already present in the record set
//! - Dropping hostnames matched by the instance's ignore list
//! - Appending a record descriptor for every remaining hostname
//!
//! ## Pass Flow
//!
//! ```text
//!  for each instance (in order)
//!  ┌────────────────┐   ┌──────────────┐   ┌─────────────┐
//!  │ routers_url()  │──▶│ RouterSource │──▶│ HostMatcher │
//!  └────────────────┘   └──────────────┘   └─────────────┘
//!                                                 │ hostname
//!                                                 ▼
//!                       ┌──────────────┐   ┌─────────────┐
//!   records.push() ◀────│ is_ignored?  │◀──│ is_duplicate│
//!                       └──────────────┘   └─────────────┘
//! ```
//!
//! ## Failure Semantics
//!
//! A pass is all-or-nothing with respect to fetching: the first malformed
//! URL, transport failure, bad status or undecodable body aborts the pass
//! and is returned to the caller. Later instances are not contacted. Nothing
//! is retried.
//!
//! The record set is append-only. Records appended before a failure stay in
//! the caller's collection; callers wanting a clean slate on error should use
//! [`Reconciler::reconcile`], which only hands the records back on success.

use tracing::{debug, info};

use crate::config::{SyncConfig, TraefikInstance};
use crate::error::Result;
use crate::record::DnsRecord;
use crate::router::TraefikRouter;
use crate::traits::{HostMatcher, RouterSource};

/// Outcome of processing one instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceReport {
    /// Display name of the instance
    pub instance: String,

    /// Number of routers returned by the instance
    pub routers: usize,

    /// Hostnames for which a record was appended, in router order
    pub accepted: Vec<String>,

    /// Hostnames already present in the record set
    pub duplicates: Vec<String>,

    /// Hostnames suppressed by the ignore list
    pub ignored: Vec<String>,

    /// Routers whose rule declares no recognizable hostname
    pub unmatched: usize,
}

/// Outcome of a whole pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// One report per instance, in processing order
    pub instances: Vec<InstanceReport>,
}

impl SyncReport {
    /// Total number of records appended during the pass
    pub fn added(&self) -> usize {
        self.instances.iter().map(|report| report.accepted.len()).sum()
    }

    /// Report for a named instance
    pub fn instance(&self, name: &str) -> Option<&InstanceReport> {
        self.instances.iter().find(|report| report.instance == name)
    }
}

/// Whether a record with exactly this name already exists
///
/// Comparison is case-sensitive with no normalization of trailing dots.
pub fn is_duplicate(name: &str, records: &[DnsRecord]) -> bool {
    records.iter().any(|record| record.name == name)
}

/// Whether a hostname contains any of the ignored substrings
pub fn is_ignored(name: &str, ignored_rules: &[String]) -> bool {
    ignored_rules.iter().any(|rule| name.contains(rule.as_str()))
}

/// Reconciles Traefik routers into DNS record descriptors
///
/// The reconciler holds no state between passes. Running it again over the
/// records returned by a previous pass adds nothing unless the routers
/// changed.
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`] (validates the configuration)
/// 2. Call [`Reconciler::run()`] or [`Reconciler::reconcile()`] once per pass
pub struct Reconciler {
    /// Source of router listings
    source: Box<dyn RouterSource>,

    /// Hostname extractor for rule expressions
    matcher: Box<dyn HostMatcher>,

    /// Pass configuration
    config: SyncConfig,
}

impl Reconciler {
    /// Create a new reconciler
    ///
    /// # Parameters
    ///
    /// - `source`: Router source implementation
    /// - `matcher`: Hostname extractor
    /// - `config`: Pass configuration
    pub fn new(
        source: Box<dyn RouterSource>,
        matcher: Box<dyn HostMatcher>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            matcher,
            config,
        })
    }

    /// The configuration this reconciler runs with
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run one pass, appending new records to `records`
    ///
    /// Instances are processed one at a time in configuration order and
    /// routers in the order their instance returned them.
    ///
    /// # Returns
    ///
    /// - `Ok(SyncReport)`: Per-instance outcome of the pass
    /// - `Err(Error)`: The first fatal error; later instances were not fetched
    pub async fn run(&self, records: &mut Vec<DnsRecord>) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        for instance in &self.config.instances {
            let endpoint = instance.routers_url()?;

            info!("Fetching routers from Traefik instance {}", instance.name);
            debug!(
                "Router endpoint for {}: {} (source: {})",
                instance.name,
                endpoint,
                self.source.source_name()
            );

            let routers = self.source.fetch_routers(instance, &endpoint).await?;
            let content = self.config.record_content();

            let instance_report = self.apply_routers(instance, &routers, &content, records);

            debug!(
                "Found rules in Traefik instance {}: {}",
                instance.name,
                instance_report.accepted.join(", ")
            );
            if !instance_report.ignored.is_empty() {
                debug!(
                    "Ignored rules in Traefik instance {}: {}",
                    instance.name,
                    instance_report.ignored.join(", ")
                );
            }

            report.instances.push(instance_report);
        }

        info!("Reconciliation pass complete: {} new record(s)", report.added());
        Ok(report)
    }

    /// Run one pass over an owned record set
    ///
    /// Returns the original records followed by every appended record. On
    /// error the records are dropped along with the pass.
    pub async fn reconcile(&self, mut records: Vec<DnsRecord>) -> Result<Vec<DnsRecord>> {
        self.run(&mut records).await?;
        Ok(records)
    }

    /// Apply one instance's routers to the record set
    ///
    /// Duplicates are checked against the records as they stand at each
    /// router, so a hostname appended earlier in the pass (by this or an
    /// earlier instance) is a duplicate for every later router. The ignore
    /// list is only consulted for hostnames that are not duplicates.
    pub fn apply_routers(
        &self,
        instance: &TraefikInstance,
        routers: &[TraefikRouter],
        content: &str,
        records: &mut Vec<DnsRecord>,
    ) -> InstanceReport {
        let defaults = &self.config.defaults;
        let mut report = InstanceReport {
            instance: instance.name.clone(),
            routers: routers.len(),
            ..InstanceReport::default()
        };

        for router in routers {
            let Some(host) = self.matcher.extract_host(&router.rule) else {
                report.unmatched += 1;
                continue;
            };

            if is_duplicate(host, records) {
                report.duplicates.push(host.to_string());
                continue;
            }

            if is_ignored(host, &instance.ignored_rules) {
                report.ignored.push(host.to_string());
                continue;
            }

            records.push(
                DnsRecord::new(host)
                    .with_type(defaults.record_type.clone())
                    .with_content(content)
                    .with_proxied(defaults.proxied)
                    .with_ttl(defaults.ttl),
            );
            report.accepted.push(host.to_string());
        }

        report
    }
}
