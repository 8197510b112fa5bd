//! Scan report input: format detection and the three grammar parsers
//!
//! - [`xml`] - Nmap XML (`-oX`)
//! - [`grep`] - Nmap grepable (`-oG`)
//! - [`nmap`] - Nmap normal output (`-oN` / terminal)
//!
//! [`parse_scan`] is the usual entry point: it normalises line endings, picks a grammar
//! with [`detect_format`] and returns the merged host list.
//!
//! # Examples
//!
//! ```
//! use drawmap_core::input::{detect_format, parse_scan, ScanFormat};
//!
//! let text = "Host: 10.0.0.5 () Ports: 80/open/tcp//http///,22/open/tcp//ssh///";
//! assert_eq!(detect_format(text), ScanFormat::Grepable);
//!
//! let hosts = parse_scan(text).unwrap();
//! assert_eq!(hosts.len(), 1);
//! ```

pub mod common;
pub mod grep;
pub mod nmap;
pub mod xml;

use crate::error::Result;
use crate::types::Host;
use common::normalize_newlines;
use std::fmt;
use tracing::debug;

/// Textual grammar of a scan report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
    /// Nmap XML (`-oX`)
    Xml,
    /// Nmap grepable (`-oG`)
    Grepable,
    /// Nmap normal output (`-oN`)
    Normal,
}

impl fmt::Display for ScanFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanFormat::Xml => "xml",
            ScanFormat::Grepable => "grepable",
            ScanFormat::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Classifies report text by grammar
///
/// Never fails: text that is neither XML nor grepable is treated as normal output, which
/// simply yields no hosts when nothing matches.
pub fn detect_format(text: &str) -> ScanFormat {
    let trimmed = text.trim_start();
    if trimmed.starts_with("<?xml") || trimmed.starts_with("<nmaprun") {
        return ScanFormat::Xml;
    }

    if text
        .lines()
        .any(|line| grep::HOST_LINE_RE.is_match(line.trim()))
    {
        return ScanFormat::Grepable;
    }

    ScanFormat::Normal
}

/// Detects the grammar of `text` and parses it into canonical hosts
///
/// Grepable-looking input that produces no hosts is re-parsed as normal output.
/// Only malformed XML is an error; empty or unrecognised text gives an empty list.
pub fn parse_scan(text: &str) -> Result<Vec<Host>> {
    let text = normalize_newlines(text);
    let format = detect_format(&text);
    debug!(%format, "detected scan format");

    let hosts = match format {
        ScanFormat::Xml => xml::parse(&text)?,
        ScanFormat::Grepable => {
            let hosts = grep::parse(&text);
            if hosts.is_empty() {
                debug!("grepable parse found no hosts, retrying as normal output");
                nmap::parse(&text)
            } else {
                hosts
            }
        }
        ScanFormat::Normal => nmap::parse(&text),
    };

    Ok(hosts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_detect_xml() {
        assert_eq!(detect_format("<?xml version=\"1.0\"?><nmaprun/>"), ScanFormat::Xml);
        assert_eq!(detect_format("\n\n   <nmaprun></nmaprun>"), ScanFormat::Xml);
    }

    #[test]
    fn test_detect_grepable() {
        let text = "# Nmap 7.94 scan\nHost: 10.0.0.1 (gw.lan)\tPorts: 22/open/tcp//ssh///\n";
        assert_eq!(detect_format(text), ScanFormat::Grepable);
    }

    #[test]
    fn test_detect_status_only_is_normal() {
        // A Status line alone does not have the Ports field
        assert_eq!(detect_format("Host: 10.0.0.1 ()\tStatus: Up\n"), ScanFormat::Normal);
    }

    #[test]
    fn test_detect_normal() {
        assert_eq!(
            detect_format("Nmap scan report for 10.0.0.1\n22/tcp open ssh\n"),
            ScanFormat::Normal
        );
        assert_eq!(detect_format(""), ScanFormat::Normal);
    }

    #[test]
    fn test_parse_scan_empty_text() {
        assert!(parse_scan("").unwrap().is_empty());
        assert!(parse_scan("nothing to see here").unwrap().is_empty());
    }

    #[test]
    fn test_parse_scan_crlf() {
        let text = "Nmap scan report for gw.lan (10.0.0.1)\r\n22/tcp open  ssh\r\n";
        let hosts = parse_scan(text).unwrap();
        assert_eq!(hosts[0].address, "10.0.0.1");
        assert_eq!(hosts[0].ports, vec!["22/tcp ssh"]);
    }

    #[test]
    fn test_parse_scan_grepable_host_without_open_ports() {
        let text = "Host: 10.0.0.1 () Ports: 22/closed/tcp//ssh///\n";
        let hosts = parse_scan(text).unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].address, "10.0.0.1");
        assert!(!hosts[0].has_open_ports());
    }

    #[test]
    fn test_parse_scan_malformed_xml() {
        let err = parse_scan("<nmaprun><host>").unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }
}
