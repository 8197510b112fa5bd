//! Grepable report parser (Nmap `-oG`)

use crate::input::common::first_guess;
use crate::merge::merge_hosts;
use crate::types::Host;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// `Host: <addr> (<name>) Ports: <list>`
pub(crate) static HOST_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Host:\s+(?P<ip>\S+)\s+\((?P<name>.*?)\)\s+Ports:\s+(?P<ports>.*)$")
        .expect("grepable host pattern is valid")
});

static OS_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bOS:\s*([^\t]+)$").expect("grepable OS pattern is valid"));

/// Parses grepable output, one host per `Host: ... Ports: ...` line
///
/// `Status:` lines and comments are ignored. Port entries other than `open` are dropped.
///
/// # Examples
///
/// ```
/// use drawmap_core::input::grep;
///
/// let hosts = grep::parse("Host: 10.0.0.5 () Ports: 80/open/tcp//http///,22/open/tcp//ssh///");
/// assert_eq!(hosts[0].ports, vec!["80/tcp http", "22/tcp ssh"]);
/// ```
pub fn parse(text: &str) -> Vec<Host> {
    let raw: Vec<Host> = text.lines().filter_map(parse_line).collect();
    debug!(hosts = raw.len(), "parsed grepable report");
    merge_hosts(raw)
}

fn parse_line(line: &str) -> Option<Host> {
    let line = line.trim();
    let caps = HOST_LINE_RE.captures(line)?;

    let mut host = Host::new(caps["ip"].trim()).with_name(caps["name"].trim());
    host.ports = caps["ports"]
        .trim()
        .split(',')
        .filter_map(port_descriptor)
        .collect();

    // Tab-separated trailing field, e.g. "...\tOS: Linux 3.X (96%)"
    if let Some(os) = OS_FIELD_RE.captures(line) {
        let (guess, accuracy) = first_guess(os[1].trim());
        host.offer_os_guess(guess, accuracy);
    }

    Some(host)
}

/// `port/state/protocol/owner/service/rpc/version/` → `"port/protocol service"`
fn port_descriptor(chunk: &str) -> Option<String> {
    let chunk = chunk.trim();
    if chunk.is_empty() {
        return None;
    }

    let fields: Vec<&str> = chunk.split('/').collect();
    if fields.len() < 5 {
        return None;
    }

    let (port, state, protocol) = (fields[0], fields[1], fields[2]);
    if state != "open" {
        return None;
    }
    let service = if fields[4].is_empty() {
        "unknown"
    } else {
        fields[4]
    };

    Some(format!("{}/{} {}", port, protocol, service))
}
