// # Regex Host Matcher
//
// Regex-based implementation of HostMatcher.
//
// ## Pattern
//
// The default pattern recognizes a `Host(...)` predicate holding a single
// backtick-quoted hostname:
//
// - one or more labels, each lowercase alphanumerics with internal hyphens,
//   each followed by a dot
// - a final label of at least two lowercase letters
//
// Matching is case-sensitive and multiline-aware. Other predicates in the
// rule (`PathPrefix`, `Headers`, ...) are ignored, and so are `Host` clauses
// listing several hostnames or using uppercase letters.

use regex::Regex;

use crate::error::{Error, Result};
use crate::traits::HostMatcher;

/// Default pattern; capture group 1 is the hostname
pub const DEFAULT_HOST_PATTERN: &str = r"(?m)Host\(`((?:[a-z0-9]+(?:-[a-z0-9]+)*\.)+[a-z]{2,})`\)";

/// Regex-based host matcher
///
/// # Example
///
/// ```rust
/// use tdns_core::matcher::RegexHostMatcher;
/// use tdns_core::traits::HostMatcher;
///
/// let matcher = RegexHostMatcher::new().unwrap();
/// let rule = "Host(`app.example.com`) && PathPrefix(`/v1`)";
/// assert_eq!(matcher.extract_host(rule), Some("app.example.com"));
/// assert_eq!(matcher.extract_host("PathPrefix(`/api`)"), None);
/// ```
#[derive(Debug, Clone)]
pub struct RegexHostMatcher {
    regex: Regex,
}

impl RegexHostMatcher {
    /// Create a matcher using [`DEFAULT_HOST_PATTERN`]
    pub fn new() -> Result<Self> {
        Self::with_pattern(DEFAULT_HOST_PATTERN)
    }

    /// Create a matcher from a custom pattern
    ///
    /// The first capture group of the pattern must hold the hostname.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::config(format!("Invalid host pattern {}: {}", pattern, e)))?;

        if regex.captures_len() < 2 {
            return Err(Error::config(format!(
                "Host pattern {} has no capture group for the hostname",
                pattern
            )));
        }

        Ok(Self { regex })
    }

    /// The pattern in use
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl HostMatcher for RegexHostMatcher {
    fn extract_host<'a>(&self, rule: &'a str) -> Option<&'a str> {
        self.regex
            .captures(rule)
            .and_then(|captures| captures.get(1))
            .map(|host| host.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> RegexHostMatcher {
        RegexHostMatcher::new().unwrap()
    }

    #[test]
    fn test_single_host() {
        assert_eq!(matcher().extract_host("Host(`app.example.com`)"), Some("app.example.com"));
        assert_eq!(
            matcher().extract_host("Host(`internal-tool.corp.example.io`)"),
            Some("internal-tool.corp.example.io")
        );
    }

    #[test]
    fn test_host_among_other_predicates() {
        let rule = "PathPrefix(`/v1`) && Host(`api.example.com`) && Headers(`X-Env`, `prod`)";
        assert_eq!(matcher().extract_host(rule), Some("api.example.com"));
    }

    #[test]
    fn test_first_host_wins() {
        let rule = "Host(`one.example.com`) || Host(`two.example.com`)";
        assert_eq!(matcher().extract_host(rule), Some("one.example.com"));
    }

    #[test]
    fn test_multiline_rule() {
        let rule = "PathPrefix(`/`)\n&& Host(`app.example.com`)";
        assert_eq!(matcher().extract_host(rule), Some("app.example.com"));
    }

    #[test]
    fn test_no_match() {
        for rule in [
            "",
            "PathPrefix(`/api`)",
            "Host(`App.Example.com`)",
            "Host(`localhost`)",
            "Host(`-bad.example.com`)",
            "Host(`app.example.c`)",
            "Host(`app.example.com`, `www.example.com`)",
            "HostRegexp(`{sub:[a-z]+}.example.com`)",
            "host(`app.example.com`)",
        ] {
            assert_eq!(matcher().extract_host(rule), None, "rule {:?}", rule);
        }
    }

    #[test]
    fn test_host_sni_is_not_a_host_predicate() {
        assert_eq!(matcher().extract_host("HostSNI(`db.example.com`)"), None);
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = RegexHostMatcher::with_pattern(r"Host\(`([^`]+)`\)").unwrap();
        assert_eq!(matcher.extract_host("Host(`App.Example.com`)"), Some("App.Example.com"));

        assert!(RegexHostMatcher::with_pattern(r"Host\(").unwrap_err().is_config());
        assert!(RegexHostMatcher::with_pattern(r"Host\(`.+`\)").unwrap_err().is_config());
    }
}
