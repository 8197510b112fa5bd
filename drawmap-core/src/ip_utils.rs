//! Address helpers: dotted-quad detection and host ordering
//!
//! Host addresses come straight from scan reports, so they are kept as strings: most are
//! IPv4 dotted quads, but IPv6 addresses and bare hostnames show up too. Sorting therefore
//! works on a textual key instead of [`std::net::IpAddr`].
//!
//! # Example
//!
//! ```
//! use drawmap_core::ip_utils::{sort_hosts, SortOrder};
//! use drawmap_core::types::Host;
//!
//! let mut hosts = vec![Host::new("10.0.0.20"), Host::new("10.0.0.3"), Host::new("fe80::1")];
//! sort_hosts(&mut hosts, SortOrder::Ip);
//!
//! let order: Vec<&str> = hosts.iter().map(|h| h.address.as_str()).collect();
//! assert_eq!(order, vec!["10.0.0.3", "10.0.0.20", "fe80::1"]);
//! ```

use crate::types::Host;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

static DOTTED_QUAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").expect("dotted quad pattern is valid"));

/// Returns true for text shaped like an IPv4 address (`1-3 digits` x4, dot separated)
///
/// Octet ranges are not checked; `999.1.1.1` is accepted.
///
/// ```
/// use drawmap_core::ip_utils::is_dotted_quad;
///
/// assert!(is_dotted_quad("192.168.1.1"));
/// assert!(!is_dotted_quad("gw.lan"));
/// assert!(!is_dotted_quad("10.0.0"));
/// ```
pub fn is_dotted_quad(text: &str) -> bool {
    DOTTED_QUAD_RE.is_match(text)
}

/// Ordering applied to the merged host list before layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep report order
    #[default]
    None,
    /// Numeric address order; dotted addresses first
    Ip,
    /// By hostname, then address; hosts without a name come first
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(SortOrder::None),
            "ip" => Ok(SortOrder::Ip),
            "name" => Ok(SortOrder::Name),
            other => Err(format!(
                "Invalid sort order '{}'. Expected one of: none, ip, name",
                other
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::None => "none",
            SortOrder::Ip => "ip",
            SortOrder::Name => "name",
        };
        f.write_str(name)
    }
}

/// Sort key for an address
///
/// Addresses containing a `.` are split into components, each parsed as an integer
/// (non-numeric components count as 0). Everything else sorts after them, by text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum AddressKey<'a> {
    Numeric(Vec<u64>),
    Text(&'a str),
}

impl<'a> AddressKey<'a> {
    pub fn new(address: &'a str) -> Self {
        if address.contains('.') {
            AddressKey::Numeric(
                address
                    .split('.')
                    .map(|part| {
                        if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                            part.parse().unwrap_or(0)
                        } else {
                            0
                        }
                    })
                    .collect(),
            )
        } else {
            AddressKey::Text(address)
        }
    }
}

/// Compares two addresses the way [`SortOrder::Ip`] orders them
pub fn compare_addresses(a: &str, b: &str) -> Ordering {
    AddressKey::new(a).cmp(&AddressKey::new(b))
}

/// Sorts hosts in place; the sort is stable so equal keys keep report order
pub fn sort_hosts(hosts: &mut [Host], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::Ip => hosts.sort_by(|a, b| compare_addresses(&a.address, &b.address)),
        SortOrder::Name => hosts.sort_by(|a, b| {
            let left = (a.name.as_deref().unwrap_or(""), a.address.as_str());
            let right = (b.name.as_deref().unwrap_or(""), b.address.as_str());
            left.cmp(&right)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(hosts: &[Host]) -> Vec<&str> {
        hosts.iter().map(|h| h.address.as_str()).collect()
    }

    #[test]
    fn test_is_dotted_quad() {
        assert!(is_dotted_quad("10.0.0.1"));
        assert!(is_dotted_quad("255.255.255.255"));
        assert!(!is_dotted_quad("10.0.0.1.5"));
        assert!(!is_dotted_quad("1234.0.0.1"));
        assert!(!is_dotted_quad("::1"));
        assert!(!is_dotted_quad(" 10.0.0.1"));
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("none".parse::<SortOrder>().unwrap(), SortOrder::None);
        assert_eq!("IP".parse::<SortOrder>().unwrap(), SortOrder::Ip);
        assert_eq!("name".parse::<SortOrder>().unwrap(), SortOrder::Name);
        assert!("octets".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_sort_order_display_round_trip() {
        for order in [SortOrder::None, SortOrder::Ip, SortOrder::Name] {
            assert_eq!(order.to_string().parse::<SortOrder>().unwrap(), order);
        }
    }

    #[test]
    fn test_address_key_numeric() {
        assert_eq!(AddressKey::new("10.0.0.2"), AddressKey::Numeric(vec![10, 0, 0, 2]));
        assert_eq!(AddressKey::new("gw.lan"), AddressKey::Numeric(vec![0, 0]));
        assert_eq!(AddressKey::new("fe80::1"), AddressKey::Text("fe80::1"));
    }

    #[test]
    fn test_compare_addresses_numeric_not_lexical() {
        assert_eq!(compare_addresses("10.0.0.9", "10.0.0.10"), Ordering::Less);
        assert_eq!(compare_addresses("192.168.1.1", "10.0.0.1"), Ordering::Greater);
        assert_eq!(compare_addresses("10.0.0.1", "::1"), Ordering::Less);
    }

    #[test]
    fn test_sort_none_keeps_order() {
        let mut hosts = vec![Host::new("10.0.0.3"), Host::new("10.0.0.1")];
        sort_hosts(&mut hosts, SortOrder::None);
        assert_eq!(addresses(&hosts), vec!["10.0.0.3", "10.0.0.1"]);
    }

    #[test]
    fn test_sort_ip() {
        let mut hosts = vec![
            Host::new("fe80::2"),
            Host::new("192.168.1.10"),
            Host::new("192.168.1.9"),
            Host::new("10.0.0.1"),
            Host::new("fe80::1"),
        ];
        sort_hosts(&mut hosts, SortOrder::Ip);
        assert_eq!(
            addresses(&hosts),
            vec!["10.0.0.1", "192.168.1.9", "192.168.1.10", "fe80::1", "fe80::2"]
        );
    }

    #[test]
    fn test_sort_name() {
        let mut hosts = vec![
            Host::new("10.0.0.3").with_name("web.lan"),
            Host::new("10.0.0.2"),
            Host::new("10.0.0.1").with_name("db.lan"),
            Host::new("10.0.0.0"),
        ];
        sort_hosts(&mut hosts, SortOrder::Name);
        assert_eq!(
            addresses(&hosts),
            vec!["10.0.0.0", "10.0.0.2", "10.0.0.1", "10.0.0.3"]
        );
    }
}
