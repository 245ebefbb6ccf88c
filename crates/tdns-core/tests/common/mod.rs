//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides a scripted RouterSource that serves canned router
//! lists per instance and records which endpoints were fetched.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tdns_core::config::{RecordDefaults, SyncConfig, TraefikInstance};
use tdns_core::error::{Error, Result};
use tdns_core::record::RecordType;
use tdns_core::router::TraefikRouter;
use tdns_core::traits::RouterSource;
use tdns_core::{Reconciler, RegexHostMatcher};
use url::Url;

/// Failure a scripted instance should produce
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Transport,
    Status(u16),
    Decode,
}

#[derive(Debug, Clone)]
enum Script {
    Routers(Vec<TraefikRouter>),
    Fail(Failure),
}

/// A RouterSource answering from per-instance scripts
#[derive(Clone, Default)]
pub struct ScriptedRouterSource {
    scripts: HashMap<String, Script>,
    /// Endpoints fetched, in call order
    fetched: Arc<Mutex<Vec<String>>>,
}

impl ScriptedRouterSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve routers with the given rules for an instance
    pub fn with_rules(mut self, instance: &str, rules: &[&str]) -> Self {
        let routers = rules.iter().map(|rule| router(rule)).collect();
        self.scripts.insert(instance.to_string(), Script::Routers(routers));
        self
    }

    /// Make fetching an instance fail
    pub fn with_failure(mut self, instance: &str, failure: Failure) -> Self {
        self.scripts.insert(instance.to_string(), Script::Fail(failure));
        self
    }

    /// Endpoints fetched so far, in call order
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl RouterSource for ScriptedRouterSource {
    async fn fetch_routers(
        &self,
        instance: &TraefikInstance,
        endpoint: &Url,
    ) -> Result<Vec<TraefikRouter>> {
        self.fetched.lock().unwrap().push(endpoint.to_string());

        match self.scripts.get(&instance.name) {
            Some(Script::Routers(routers)) => Ok(routers.clone()),
            Some(Script::Fail(Failure::Transport)) => Err(Error::transport("connection refused")),
            Some(Script::Fail(Failure::Status(status))) => {
                Err(Error::status(&instance.name, *status))
            }
            Some(Script::Fail(Failure::Decode)) => Err(Error::decode("expected a JSON array")),
            None => Ok(Vec::new()),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Build a router with only a rule set
pub fn router(rule: &str) -> TraefikRouter {
    TraefikRouter {
        rule: rule.to_string(),
        name: format!("{}@test", rule.len()),
        provider: "test".to_string(),
        ..TraefikRouter::default()
    }
}

/// Instance pointing at a per-name test host
pub fn instance(name: &str) -> TraefikInstance {
    TraefikInstance::new(name, format!("http://{}.traefik.test:8080", name))
}

/// A-record configuration with the documentation address 203.0.113.5
pub fn a_record_config(instances: Vec<TraefikInstance>) -> SyncConfig {
    let mut config = SyncConfig::new().with_current_address("203.0.113.5".parse().unwrap());
    config.instances = instances;
    config
}

/// CNAME configuration pointing at example.com
pub fn cname_config(instances: Vec<TraefikInstance>) -> SyncConfig {
    let mut config = SyncConfig::new()
        .with_zone_name("example.com")
        .with_defaults(RecordDefaults {
            record_type: RecordType::Cname,
            ..RecordDefaults::default()
        });
    config.instances = instances;
    config
}

/// Build a reconciler around a scripted source, keeping a handle to it
pub fn reconciler(source: &ScriptedRouterSource, config: SyncConfig) -> Reconciler {
    Reconciler::new(
        Box::new(source.clone()),
        Box::new(RegexHostMatcher::new().expect("default pattern compiles")),
        config,
    )
    .expect("reconciler construction succeeds")
}
