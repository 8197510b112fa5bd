//! JSON host inventory
//!
//! A machine-readable companion to the diagram: every canonical host with its derived
//! device category.

use crate::classify::{classify, DeviceCategory};
use crate::error::Result;
use crate::types::Host;
use serde::Serialize;

/// One inventory entry
#[derive(Debug, Serialize)]
pub struct HostRecord<'a> {
    #[serde(flatten)]
    pub host: &'a Host,
    pub device: DeviceCategory,
}

impl<'a> From<&'a Host> for HostRecord<'a> {
    fn from(host: &'a Host) -> Self {
        Self {
            host,
            device: classify(host),
        }
    }
}

/// Serialises hosts as a pretty-printed JSON array
///
/// # Examples
///
/// ```
/// use drawmap_core::output::json::hosts_to_json;
/// use drawmap_core::types::Host;
///
/// let mut host = Host::new("10.0.0.1");
/// host.add_port("9100/tcp jetdirect");
/// let json = hosts_to_json(&[host]).unwrap();
/// assert!(json.contains(r#""device": "printer""#));
/// ```
pub fn hosts_to_json(hosts: &[Host]) -> Result<String> {
    let records: Vec<HostRecord<'_>> = hosts.iter().map(HostRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}
