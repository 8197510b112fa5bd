//! XML report parser (Nmap `-oX`)

use crate::error::Result;
use crate::merge::merge_hosts;
use crate::types::Host;
use roxmltree::{Document, Node, ParsingOptions};
use tracing::debug;

/// Parses an Nmap XML report into canonical hosts
///
/// Hosts reported as anything other than `up` are skipped, as are hosts without an IPv4
/// or IPv6 address. Malformed XML is an error; the report is never partially recovered.
///
/// # Examples
///
/// ```
/// use drawmap_core::input::xml;
///
/// let report = r#"<nmaprun><host><status state="up"/>
///   <address addr="10.0.0.1" addrtype="ipv4"/></host></nmaprun>"#;
/// let hosts = xml::parse(report).unwrap();
/// assert_eq!(hosts[0].address, "10.0.0.1");
/// ```
pub fn parse(text: &str) -> Result<Vec<Host>> {
    // Nmap writes `<!DOCTYPE nmaprun>`, which roxmltree rejects unless asked not to.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)?;

    let raw: Vec<Host> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("host"))
        .filter_map(host_from_element)
        .collect();

    debug!(hosts = raw.len(), "parsed XML report");
    Ok(merge_hosts(raw))
}

fn host_from_element(node: Node<'_, '_>) -> Option<Host> {
    if let Some(status) = child(node, "status") {
        if status.attribute("state").is_some_and(|state| state != "up") {
            return None;
        }
    }

    let address = node
        .children()
        .filter(|n| n.has_tag_name("address"))
        .find(|n| matches!(n.attribute("addrtype"), Some("ipv4") | Some("ipv6")))
        .and_then(|n| n.attribute("addr"))
        .filter(|addr| !addr.is_empty())?;

    let mut host = Host::new(address);

    host.name = child(node, "hostnames")
        .and_then(|hn| child(hn, "hostname"))
        .and_then(|h| h.attribute("name"))
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    if let Some(ports) = child(node, "ports") {
        host.ports = ports
            .children()
            .filter(|n| n.has_tag_name("port"))
            .filter_map(port_descriptor)
            .collect();
    }

    if let Some((guess, accuracy)) = child(node, "os").and_then(best_os_match) {
        host.offer_os_guess(guess, accuracy);
    }

    Some(host)
}

fn port_descriptor(port: Node<'_, '_>) -> Option<String> {
    let open = child(port, "state").and_then(|s| s.attribute("state")) == Some("open");
    if !open {
        return None;
    }

    let protocol = port.attribute("protocol").unwrap_or("tcp");
    let portid = port.attribute("portid").unwrap_or("?");
    let service = child(port, "service");

    let name = service
        .and_then(|s| s.attribute("name"))
        .filter(|n| !n.is_empty())
        .unwrap_or("unknown");

    let extra: Vec<&str> = service
        .map(|s| {
            ["product", "version", "extrainfo"]
                .iter()
                .filter_map(|key| s.attribute(*key))
                .filter(|v| !v.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let mut descriptor = format!("{}/{} {}", portid, protocol, name);
    if !extra.is_empty() {
        descriptor.push(' ');
        descriptor.push_str(&extra.join(" "));
    }
    Some(descriptor.trim().to_string())
}

/// Picks the `osmatch` with the highest accuracy; the first one wins ties
fn best_os_match(os: Node<'_, '_>) -> Option<(Option<String>, Option<u32>)> {
    let mut best: Option<(Node<'_, '_>, i64)> = None;

    for candidate in os.children().filter(|n| n.has_tag_name("osmatch")) {
        let accuracy = candidate
            .attribute("accuracy")
            .unwrap_or("0")
            .trim()
            .parse::<i64>()
            .unwrap_or(0);
        let best_accuracy = best.map_or(-1, |(_, acc)| acc);
        if accuracy > best_accuracy {
            best = Some((candidate, accuracy));
        }
    }

    best.map(|(node, accuracy)| {
        let guess = node
            .attribute("name")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        (guess, u32::try_from(accuracy).ok())
    })
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(name))
}
