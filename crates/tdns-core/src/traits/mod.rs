//! Core traits for the tdns system
//!
//! This module defines the seams between the reconciliation core and its
//! collaborators.
//!
//! - [`RouterSource`]: Fetch the router list of a Traefik instance
//! - [`AddressSource`]: Look up the current public address
//! - [`HostMatcher`]: Extract a hostname from a rule expression

pub mod address_source;
pub mod host_matcher;
pub mod router_source;

pub use address_source::{AddressFamily, AddressSource};
pub use host_matcher::HostMatcher;
pub use router_source::RouterSource;
