//! Drawmap Core Library
//!
//! This library turns Nmap scan reports into draw.io network diagrams. It reads the three
//! formats Nmap writes (XML `-oX`, grepable `-oG` and normal `-oN`), reconciles them into a
//! canonical host list, and lays every host out on a grid around an optional hub node.
//!
//! # Modules
//!
//! - [`args`] - CLI argument parsing and validation
//! - [`input`] - Format detection and the XML, grepable and normal parsers
//! - [`merge`] - Reconciliation of duplicate host records
//! - [`types`] - Core data structures for hosts
//! - [`classify`] - Device category heuristics and shape styles
//! - [`layout`] - Grid geometry and canvas sizing
//! - [`diagram`] - Cell assembly in paint order
//! - [`output`] - Output formatters (draw.io, JSON)
//! - [`ip_utils`] - Address recognition and host ordering
//!
//! # Example
//!
//! ```
//! use drawmap_core::diagram::DiagramOptions;
//! use drawmap_core::ip_utils::SortOrder;
//!
//! let scan = "Host: 10.0.0.1 (gw.lan)\tPorts: 22/open/tcp//ssh///\n";
//! let xml = drawmap_core::scan_to_drawio(scan, &DiagramOptions::default(), SortOrder::Ip)?;
//! assert!(xml.contains("gw.lan"));
//! # Ok::<(), drawmap_core::Error>(())
//! ```

pub mod args;
pub mod classify;
pub mod diagram;
pub mod error;
pub mod input;
pub mod ip_utils;
pub mod layout;
pub mod merge;
pub mod output;
pub mod types;

pub use error::{Error, Result};

use diagram::{build_diagram, DiagramOptions};
use ip_utils::{sort_hosts, SortOrder};
use types::Host;

/// Parses a scan report and returns its canonical hosts in the requested order
///
/// Fails with [`Error::NoHosts`] when the report contains no host at all.
pub fn load_hosts(text: &str, order: SortOrder) -> Result<Vec<Host>> {
    let mut hosts = input::parse_scan(text)?;
    if hosts.is_empty() {
        return Err(Error::NoHosts);
    }
    sort_hosts(&mut hosts, order);
    Ok(hosts)
}

/// Converts a scan report straight into a `.drawio` document
pub fn scan_to_drawio(text: &str, options: &DiagramOptions, order: SortOrder) -> Result<String> {
    let hosts = load_hosts(text, order)?;
    Ok(output::to_xml(&build_diagram(&hosts, options)))
}
