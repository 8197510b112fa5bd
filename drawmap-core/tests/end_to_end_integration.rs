//! End-to-end integration tests
//!
//! These tests run the complete workflow from argument parsing through parsing, sorting
//! and diagram output to ensure all components work together.

use drawmap_core::{
    args::DrawArgs,
    diagram::DiagramOptions,
    ip_utils::SortOrder,
    load_hosts,
    output::hosts_to_json,
    scan_to_drawio, Error,
};

const MIXED_NORMAL: &str = "\
Nmap scan report for printer.office (10.1.0.40)
Host is up.
PORT     STATE SERVICE
631/tcp  open  ipp
9100/tcp open  jetdirect

Nmap scan report for 10.1.0.5
Host is up.
PORT     STATE SERVICE
5060/udp open  sip

Nmap scan report for cam01.office (10.1.0.100)
Host is up.
PORT    STATE SERVICE
554/tcp open  rtsp
";

const XML_TWO_UP_HOSTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE nmaprun>
<nmaprun scanner="nmap" args="nmap -O -oX scan.xml 192.168.1.0/24" version="7.94">
<host>
  <status state="up" reason="arp-response"/>
  <address addr="192.168.1.1" addrtype="ipv4"/>
  <hostnames><hostname name="gateway.home" type="PTR"/></hostnames>
  <ports>
    <port protocol="tcp" portid="22"><state state="open"/><service name="ssh" product="OpenSSH"/></port>
  </ports>
  <os>
    <osmatch name="Linux 4.15 - 5.8" accuracy="88"/>
    <osmatch name="Linux 5.4" accuracy="92"/>
  </os>
</host>
<host>
  <status state="up" reason="arp-response"/>
  <address addr="192.168.1.50" addrtype="ipv4"/>
  <ports>
    <port protocol="tcp" portid="9100"><state state="open"/><service name="jetdirect"/></port>
  </ports>
</host>
<host>
  <status state="down" reason="no-response"/>
  <address addr="192.168.1.99" addrtype="ipv4"/>
</host>
</nmaprun>
"#;

const NORMAL_WINDOWS_SERVER: &str = "\
Nmap scan report for 10.0.0.9
Host is up (0.00031s latency).
PORT     STATE SERVICE       VERSION
3389/tcp open  ms-wbt-server Microsoft Terminal Services
Aggressive OS guesses: Microsoft Windows Server 2019 (90%), Microsoft Windows 10 1809 (87%)
";

fn host_values(xml: &str) -> Vec<String> {
    cell_values(xml)
        .into_iter()
        .filter(|value| value.contains(r#"title="OS:"#))
        .collect()
}

fn cell_values(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name("mxCell") && n.attribute("vertex") == Some("1"))
        .filter_map(|n| n.attribute("value").map(str::to_string))
        .collect()
}

#[test]
fn test_args_to_document() {
    let args = DrawArgs::from_iter_safe([
        "drawmap",
        "--page-name",
        "Office LAN",
        "--sort=ip",
        "scan.nmap",
        "office.drawio",
    ])
    .unwrap();
    args.validate().unwrap();

    let xml = scan_to_drawio(MIXED_NORMAL, &args.diagram_options(), args.sort_order()).unwrap();
    assert!(xml.contains(r#"name="Office LAN""#));

    let values = cell_values(&xml);
    // branding, hub, then hosts in IP order
    assert_eq!(values.len(), 5);
    assert!(values[2].contains("10.1.0.5"));
    assert!(values[3].contains("printer.office<br/>10.1.0.40"));
    assert!(values[4].contains("cam01.office<br/>10.1.0.100"));
}

#[test]
fn test_shapes_follow_device_category() {
    let xml = scan_to_drawio(
        MIXED_NORMAL,
        &DrawArgs::default().diagram_options(),
        SortOrder::None,
    )
    .unwrap();

    assert!(xml.contains("mxgraph.cisco19.printer"));
    assert!(xml.contains("mxgraph.cisco19.ip_phone"));
    assert!(xml.contains("mxgraph.aws4.camera2"));
    assert!(xml.contains("mxgraph.mscae.enterprise.internet"));
}

#[test]
fn test_sort_by_name() {
    let hosts = load_hosts(MIXED_NORMAL, SortOrder::Name).unwrap();
    let addresses: Vec<&str> = hosts.iter().map(|h| h.address.as_str()).collect();
    // unnamed hosts sort first, then by name
    assert_eq!(addresses, vec!["10.1.0.5", "10.1.0.100", "10.1.0.40"]);
}

#[test]
fn test_inventory_matches_diagram_hosts() {
    let hosts = load_hosts(MIXED_NORMAL, SortOrder::None).unwrap();
    let json = hosts_to_json(&hosts).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let devices: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["device"].as_str())
        .collect();
    assert_eq!(devices, vec!["printer", "ip_phone", "camera"]);
}

#[test]
fn test_no_edges_flag() {
    let args =
        DrawArgs::from_iter_safe(["drawmap", "--no-edges", "-", "out.drawio"]).unwrap();
    assert!(args.reads_stdin());

    let xml = scan_to_drawio(MIXED_NORMAL, &args.diagram_options(), SortOrder::None).unwrap();
    assert!(!xml.contains(r#"edge="1""#));
    assert_eq!(cell_values(&xml).len(), 4);
}

#[test]
fn test_empty_input_reports_no_hosts() {
    let err = scan_to_drawio("", &DrawArgs::default().diagram_options(), SortOrder::None)
        .unwrap_err();
    assert!(matches!(err, Error::NoHosts));
}

#[test]
fn test_xml_report_to_document() {
    let xml = scan_to_drawio(XML_TWO_UP_HOSTS, &DiagramOptions::default(), SortOrder::None)
        .unwrap();

    let hosts = host_values(&xml);
    assert_eq!(hosts.len(), 2, "the down host must not be drawn");
    assert!(hosts[0].contains(r#"title="OS: Linux 5.4 (92%)&#10;Open ports:&#10;22/tcp ssh OpenSSH""#));
    assert!(hosts[0].contains("gateway.home<br/>192.168.1.1"));
    assert!(hosts[1].contains(r#"title="OS: Unknown&#10;Open ports:&#10;9100/tcp jetdirect""#));
    assert!(xml.contains("mxgraph.cisco19.printer"));
}

#[test]
fn test_normal_report_to_document() {
    let xml = scan_to_drawio(
        NORMAL_WINDOWS_SERVER,
        &DiagramOptions::default(),
        SortOrder::None,
    )
    .unwrap();

    let hosts = host_values(&xml);
    assert_eq!(hosts.len(), 1);
    assert!(hosts[0].contains(r#"title="OS: Microsoft Windows Server 2019 (90%)&#10;Open ports:"#));
    assert!(hosts[0].contains(">10.0.0.9</span>"));
    assert!(xml.contains("mxgraph.mscae.enterprise.server_generic"));
}
