//! Example: Rendering a scan report
//!
//! Parses a small grepable report, prints each host with its device category, then prints
//! the `.drawio` document and the JSON inventory.
//!
//! ```text
//! cargo run -p drawmap-core --example render_scan > lab.drawio
//! ```

use drawmap_core::classify::classify;
use drawmap_core::diagram::{build_diagram, DiagramOptions};
use drawmap_core::ip_utils::SortOrder;
use drawmap_core::output::{hosts_to_json, to_xml};

const REPORT: &str = "\
# Nmap 7.94 scan initiated as: nmap -O -oG lab.gnmap 192.168.56.0/24
Host: 192.168.56.1 (router.lab)\tPorts: 22/open/tcp//ssh///, 53/open/tcp//domain///\tOS: Cisco IOS 15.X (91%)
Host: 192.168.56.20 (print.lab)\tPorts: 631/open/tcp//ipp///, 9100/open/tcp//jetdirect///
Host: 192.168.56.10 (dc.lab)\tPorts: 88/open/tcp//kerberos-sec///, 445/open/tcp//microsoft-ds///\tOS: Microsoft Windows Server 2022 (95%)
Host: 192.168.56.30 ()\tPorts: 3389/open/tcp//ms-wbt-server///\tOS: Microsoft Windows 11 (89%)
";

fn main() -> drawmap_core::Result<()> {
    let hosts = drawmap_core::load_hosts(REPORT, SortOrder::Ip)?;

    for host in &hosts {
        eprintln!("{:<16} {:<12} {}", host.address, classify(host).as_str(), host.ports.join(", "));
    }

    let options = DiagramOptions {
        page_name: "Lab".to_string(),
        ..DiagramOptions::default()
    };
    println!("{}", to_xml(&build_diagram(&hosts, &options)));
    eprintln!("{}", hosts_to_json(&hosts)?);

    Ok(())
}
