// # Address Source Trait
//
// Defines the interface for looking up the current public address, used as
// the content of proposed A/AAAA records.
//
// ## Implementations
//
// - HTTP lookup services: `tdns-ip-http` crate

use async_trait::async_trait;
use std::net::IpAddr;

use crate::record::RecordType;

/// Address family an address lookup must return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Family required by a record type, if it is an address record
    pub fn for_record_type(record_type: &RecordType) -> Option<Self> {
        match record_type {
            RecordType::A => Some(AddressFamily::V4),
            RecordType::Aaaa => Some(AddressFamily::V6),
            _ => None,
        }
    }

    /// Whether an address belongs to this family
    pub fn matches(self, address: &IpAddr) -> bool {
        match self {
            AddressFamily::V4 => address.is_ipv4(),
            AddressFamily::V6 => address.is_ipv6(),
        }
    }
}

/// Trait for address source implementations
///
/// One lookup per call, no caching and no retries.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Look up the current address
    ///
    /// # Parameters
    ///
    /// - `family`: Required address family, `None` accepts either
    async fn current(&self, family: Option<AddressFamily>) -> Result<IpAddr, crate::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_for_record_type() {
        assert_eq!(AddressFamily::for_record_type(&RecordType::A), Some(AddressFamily::V4));
        assert_eq!(AddressFamily::for_record_type(&RecordType::Aaaa), Some(AddressFamily::V6));
        assert_eq!(AddressFamily::for_record_type(&RecordType::Cname), None);

        let v4: IpAddr = "203.0.113.5".parse().unwrap();
        assert!(AddressFamily::V4.matches(&v4));
        assert!(!AddressFamily::V6.matches(&v4));
    }
}
