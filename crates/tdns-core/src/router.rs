//! Traefik router descriptors
//!
//! Mirrors the objects returned by Traefik's `/api/http/routers` endpoint.
//! Fields missing from a router decode to their defaults and fields this
//! crate does not model are ignored, so newer Traefik releases still decode.
//! An explicit `null` decodes like a missing field.

use serde::{Deserialize, Deserializer, Serialize};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A single HTTP router exposed by a Traefik instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TraefikRouter {
    /// Entry points the router is attached to, in declaration order
    #[serde(deserialize_with = "null_as_default")]
    pub entry_points: Vec<String>,

    /// Middlewares applied to matched requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middlewares: Option<Vec<String>>,

    /// Destination service
    #[serde(deserialize_with = "null_as_default")]
    pub service: String,

    /// Rule expression, e.g. "Host(`app.example.com`) && PathPrefix(`/v1`)"
    #[serde(deserialize_with = "null_as_default")]
    pub rule: String,

    /// TLS configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouterTls>,

    /// Router status ("enabled", "disabled", "warning")
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,

    /// Entry points actually in use
    #[serde(deserialize_with = "null_as_default")]
    pub using: Vec<String>,

    /// Router name, e.g. "app@docker"
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Provider that declared the router
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,

    /// Explicit priority, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
}

/// TLS section of a router
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RouterTls {
    /// Certificate resolver name
    #[serde(deserialize_with = "null_as_default")]
    pub cert_resolver: String,

    /// Domains requested for the certificate
    #[serde(deserialize_with = "null_as_default")]
    pub domains: Vec<TlsDomain>,
}

/// A certificate domain: main name plus subject alternative names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsDomain {
    /// Primary domain
    #[serde(deserialize_with = "null_as_default")]
    pub main: String,

    /// Alternate domains
    #[serde(deserialize_with = "null_as_default")]
    pub sans: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_traefik_router() {
        let json = r#"[
            {
                "entryPoints": ["websecure"],
                "middlewares": ["auth@file"],
                "service": "app",
                "rule": "Host(`app.example.com`)",
                "tls": {
                    "certResolver": "le",
                    "domains": [{"main": "example.com", "sans": ["*.example.com"]}]
                },
                "status": "enabled",
                "using": ["websecure"],
                "name": "app@docker",
                "provider": "docker",
                "priority": 42,
                "observability": {"accessLogs": true}
            }
        ]"#;

        let routers: Vec<TraefikRouter> = serde_json::from_str(json).unwrap();
        assert_eq!(routers.len(), 1);

        let router = &routers[0];
        assert_eq!(router.entry_points, vec!["websecure"]);
        assert_eq!(router.rule, "Host(`app.example.com`)");
        assert_eq!(router.priority, Some(42));

        let tls = router.tls.as_ref().unwrap();
        assert_eq!(tls.cert_resolver, "le");
        assert_eq!(tls.domains[0].sans, vec!["*.example.com"]);
    }

    #[test]
    fn test_decode_minimal_router() {
        let routers: Vec<TraefikRouter> =
            serde_json::from_str(r#"[{"name": "api@internal", "rule": "PathPrefix(`/api`)"}]"#)
                .unwrap();

        assert_eq!(routers[0].middlewares, None);
        assert_eq!(routers[0].tls, None);
        assert_eq!(routers[0].priority, None);
        assert!(routers[0].entry_points.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let json = r#"[{
            "entryPoints": null,
            "middlewares": null,
            "rule": "Host(`app.example.com`)",
            "using": null,
            "tls": {"certResolver": null, "domains": null},
            "priority": null
        }]"#;

        let routers: Vec<TraefikRouter> = serde_json::from_str(json).unwrap();
        let router = &routers[0];
        assert!(router.entry_points.is_empty());
        assert!(router.using.is_empty());
        assert_eq!(router.middlewares, None);
        assert_eq!(router.priority, None);
        assert_eq!(router.rule, "Host(`app.example.com`)");
        assert_eq!(router.tls, Some(RouterTls::default()));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let result: Result<Vec<TraefikRouter>, _> = serde_json::from_str(r#"{"rule": "x"}"#);
        assert!(result.is_err());
    }
}
