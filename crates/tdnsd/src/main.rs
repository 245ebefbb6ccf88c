// # tdnsd - Traefik to DNS reconciliation
//
// A thin integration layer: all reconciliation logic lives in tdns-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Loading the records already known to the caller
// 3. Resolving the current public address when address records are proposed
// 4. Running one reconciliation pass
// 5. Writing the resulting record set to stdout as JSON
//
// It runs once and exits. Scheduling and retries belong to whatever invokes
// it (cron, a systemd timer, a CI job).
//
// ## Configuration
//
// ### Traefik instances
// - `TDNS_INSTANCES`: Comma-separated instance names
// - `TDNS_INSTANCE_<NAME>_URL`: Base URL of the instance API (required)
// - `TDNS_INSTANCE_<NAME>_USERNAME` / `_PASSWORD`: Basic auth (optional)
// - `TDNS_INSTANCE_<NAME>_IGNORED_RULES`: Comma-separated substrings
//
// `<NAME>` is the instance name upper-cased with `-` replaced by `_`.
//
// ### Records
// - `TDNS_RECORD_TYPE`: Record type for new records (default: A)
// - `TDNS_PROXIED`: Proxy flag for new records (default: false)
// - `TDNS_TTL`: TTL for new records, 1 = automatic (default: 1)
// - `TDNS_ZONE_NAME`: Zone name, required for CNAME records
// - `TDNS_EXISTING_RECORDS_FILE`: JSON array of already-known records
// - `TDNS_HOST_PATTERN`: Custom hostname regex (capture group 1 = hostname)
//
// ### Address
// - `TDNS_CURRENT_IP`: Address for A/AAAA records (looked up when unset)
// - `TDNS_IP_LOOKUP_URL`: Lookup service (default: https://api.ipify.org for A
//   records, https://api6.ipify.org for AAAA records)
//
// ### Logging
// - `TDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export TDNS_INSTANCES=main,edge
// export TDNS_INSTANCE_MAIN_URL=http://traefik:8080
// export TDNS_INSTANCE_EDGE_URL=https://edge.example.com/traefik
// export TDNS_INSTANCE_EDGE_USERNAME=admin
// export TDNS_INSTANCE_EDGE_PASSWORD=secret
// export TDNS_INSTANCE_EDGE_IGNORED_RULES=internal,staging
// export TDNS_RECORD_TYPE=CNAME
// export TDNS_ZONE_NAME=example.com
//
// tdnsd > records.json
// ```

use anyhow::{Context, Result};
use std::env;
use std::io::Write;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use tdns_core::traits::{AddressFamily, AddressSource};
use tdns_core::{
    DnsRecord, RecordDefaults, RecordType, Reconciler, RegexHostMatcher, SyncConfig,
    TraefikInstance,
};
use tdns_ip_http::{HttpAddressSource, default_lookup_url};
use tdns_source_traefik::TraefikRouterSource;

/// Exit codes for different termination scenarios
///
/// - 0: Pass completed
/// - 1: Configuration error
/// - 2: Runtime error (fetch, decode, address lookup)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TdnsExitCode {
    /// Pass completed
    Success = 0,
    /// Configuration error
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<TdnsExitCode> for ExitCode {
    fn from(code: TdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
#[derive(Debug)]
struct Config {
    instances: Vec<TraefikInstance>,
    record_type: RecordType,
    proxied: bool,
    ttl: u32,
    zone_name: String,
    current_ip: Option<IpAddr>,
    ip_lookup_url: Option<String>,
    existing_records_file: Option<PathBuf>,
    host_pattern: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through a variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let names = split_list(&var("TDNS_INSTANCES").context(
            "TDNS_INSTANCES is required. Set it via: export TDNS_INSTANCES=main",
        )?);

        let mut instances = Vec::with_capacity(names.len());
        for name in names {
            let prefix = format!("TDNS_INSTANCE_{}", env_key(&name));
            let url = var(&format!("{}_URL", prefix))
                .with_context(|| format!("{}_URL is required for instance {}", prefix, name))?;

            instances.push(TraefikInstance {
                name,
                url,
                username: var(&format!("{}_USERNAME", prefix)),
                password: var(&format!("{}_PASSWORD", prefix)),
                ignored_rules: var(&format!("{}_IGNORED_RULES", prefix))
                    .map(|rules| split_list(&rules))
                    .unwrap_or_default(),
            });
        }

        let proxied = match var("TDNS_PROXIED") {
            Some(value) => parse_bool(&value)
                .with_context(|| format!("TDNS_PROXIED must be true or false. Got: {}", value))?,
            None => false,
        };

        let ttl = match var("TDNS_TTL") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("TDNS_TTL must be a number of seconds. Got: {}", value))?,
            None => 1,
        };

        let current_ip = match var("TDNS_CURRENT_IP") {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<IpAddr>()
                    .with_context(|| format!("TDNS_CURRENT_IP is not an IP address: {}", value))?,
            ),
            None => None,
        };

        Ok(Self {
            instances,
            record_type: var("TDNS_RECORD_TYPE")
                .map(RecordType::from)
                .unwrap_or_default(),
            proxied,
            ttl,
            zone_name: var("TDNS_ZONE_NAME").unwrap_or_default(),
            current_ip,
            ip_lookup_url: var("TDNS_IP_LOOKUP_URL"),
            existing_records_file: var("TDNS_EXISTING_RECORDS_FILE").map(PathBuf::from),
            host_pattern: var("TDNS_HOST_PATTERN"),
            log_level: var("TDNS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate what the core configuration does not cover
    fn validate(&self) -> Result<()> {
        if let Some(ref url) = self.ip_lookup_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            anyhow::bail!("TDNS_IP_LOOKUP_URL must use HTTP or HTTPS scheme. Got: {}", url);
        }

        if let Some(ref path) = self.existing_records_file
            && !path.is_file()
        {
            anyhow::bail!(
                "TDNS_EXISTING_RECORDS_FILE does not point at a file: {}",
                path.display()
            );
        }

        parse_level(&self.log_level)?;

        Ok(())
    }

    /// Address lookup service for a family, honoring an explicit override
    fn lookup_url(&self, family: AddressFamily) -> &str {
        self.ip_lookup_url
            .as_deref()
            .unwrap_or_else(|| default_lookup_url(Some(family)))
    }

    /// Core configuration for a pass
    fn sync_config(&self, current_address: Option<IpAddr>) -> SyncConfig {
        SyncConfig {
            instances: self.instances.clone(),
            defaults: RecordDefaults {
                record_type: self.record_type.clone(),
                proxied: self.proxied,
                ttl: self.ttl,
            },
            zone_name: self.zone_name.clone(),
            current_address,
        }
    }
}

/// Instance name as it appears in variable names
fn env_key(name: &str) -> String {
    name.trim().to_ascii_uppercase().replace('-', "_")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "TDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

/// Exit code for a failed pass
///
/// Configuration problems surfacing during the pass (records file, host
/// pattern, core validation) exit like startup configuration errors.
fn exit_code(err: &anyhow::Error) -> TdnsExitCode {
    let is_config = err
        .downcast_ref::<tdns_core::Error>()
        .is_some_and(tdns_core::Error::is_config);
    if is_config {
        TdnsExitCode::ConfigError
    } else {
        TdnsExitCode::RuntimeError
    }
}

/// Load the records the caller already knows about
fn load_records(path: &Path) -> tdns_core::Result<Vec<DnsRecord>> {
    let file = std::fs::File::open(path).map_err(|e| {
        tdns_core::Error::config(format!("Unable to open {}: {}", path.display(), e))
    })?;

    serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
        tdns_core::Error::config(format!(
            "Unable to load records from {}: {}",
            path.display(),
            e
        ))
    })
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return TdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return TdnsExitCode::ConfigError.into();
    }

    // Logs go to stderr; stdout carries the record set
    let log_level = parse_level(&config.log_level).unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return TdnsExitCode::ConfigError.into();
    }

    info!("Starting tdnsd: {} Traefik instance(s)", config.instances.len());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return TdnsExitCode::RuntimeError.into();
        }
    };

    let stdout = std::io::stdout();
    let result = rt.block_on(run(config, &mut stdout.lock()));

    match result {
        Ok(()) => TdnsExitCode::Success.into(),
        Err(e) => {
            error!("Reconciliation failed: {:#}", e);
            exit_code(&e).into()
        }
    }
}

/// Run one reconciliation pass and write the record set to `out`
async fn run(config: Config, out: &mut impl Write) -> Result<()> {
    let mut records = match config.existing_records_file {
        Some(ref path) => load_records(path)?,
        None => Vec::new(),
    };
    info!("Loaded {} existing record(s)", records.len());

    let current_address = match AddressFamily::for_record_type(&config.record_type) {
        Some(_) if config.current_ip.is_some() => config.current_ip,
        Some(family) => {
            let url = config.lookup_url(family);
            info!("Looking up current address via {}", url);
            let source = HttpAddressSource::new(url);
            Some(source.current(Some(family)).await?)
        }
        None => config.current_ip,
    };

    let matcher = match config.host_pattern {
        Some(ref pattern) => RegexHostMatcher::with_pattern(pattern)?,
        None => RegexHostMatcher::new()?,
    };
    debug!("Host pattern: {}", matcher.pattern());

    let reconciler = Reconciler::new(
        Box::new(TraefikRouterSource::new()),
        Box::new(matcher),
        config.sync_config(current_address),
    )?;

    let report = reconciler.run(&mut records).await?;

    for instance in &report.instances {
        info!(
            "Instance {}: {} router(s), {} new, {} duplicate, {} ignored, {} without host",
            instance.instance,
            instance.routers,
            instance.accepted.len(),
            instance.duplicates.len(),
            instance.ignored.len(),
            instance.unmatched
        );
    }

    serde_json::to_writer_pretty(&mut *out, &records).context("Failed to write records")?;
    writeln!(out).context("Failed to write records")?;

    Ok(())
}
