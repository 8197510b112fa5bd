//! Heuristic device classification and node styling
//!
//! Scan reports rarely say what a device *is*. This module guesses a [`DeviceCategory`]
//! from two weak signals, the OS guess and the open ports, and maps each category to a
//! draw.io shape.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! | # | Signal | Category |
//! |---|--------|----------|
//! | 1 | OS mentions `firewall` | Firewall |
//! | 2 | OS mentions `router`, `cisco ios` or `juniper` | Router |
//! | 3 | OS mentions `switch` | Switch |
//! | 4 | OS mentions `wireless` or `access point` | Wireless access point |
//! | 5 | port 9100/631/515, or a printer/IPP service | Printer |
//! | 6 | port 5060/5061, or SIP | IP phone |
//! | 7 | port 554, or RTSP | Camera |
//! | 8 | port 3389, or RDP | Server when the OS says `server`, else Workstation |
//! | 9 | port 445, or SMB | Server (`server` OS), Workstation (`windows` OS), else continue |
//! | 10 | OS mentions `windows` | Workstation |
//! | 11 | OS mentions `linux` or `unix` | Server |
//! | 12 | anything else | Unknown |
//!
//! # Example
//!
//! ```
//! use drawmap_core::classify::{classify, style_for, DeviceCategory};
//! use drawmap_core::types::Host;
//!
//! let mut host = Host::new("10.0.0.50");
//! host.add_port("9100/tcp jetdirect");
//!
//! let category = classify(&host);
//! assert_eq!(category, DeviceCategory::Printer);
//! assert!(style_for(category).starts_with("shape=mxgraph.cisco19.printer;"));
//! ```

use crate::types::Host;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Kind of network device a node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    /// The synthetic "Network" hub node
    NetworkHub,
    Router,
    Switch,
    Firewall,
    WirelessAccessPoint,
    Server,
    Workstation,
    Printer,
    IpPhone,
    Camera,
    Unknown,
}

impl DeviceCategory {
    /// Snake-case name, identical to the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceCategory::NetworkHub => "network_hub",
            DeviceCategory::Router => "router",
            DeviceCategory::Switch => "switch",
            DeviceCategory::Firewall => "firewall",
            DeviceCategory::WirelessAccessPoint => "wireless_access_point",
            DeviceCategory::Server => "server",
            DeviceCategory::Workstation => "workstation",
            DeviceCategory::Printer => "printer",
            DeviceCategory::IpPhone => "ip_phone",
            DeviceCategory::Camera => "camera",
            DeviceCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// draw.io shape library entry per category
const SHAPES: &[(DeviceCategory, &str)] = &[
    (DeviceCategory::NetworkHub, "mxgraph.mscae.enterprise.internet"),
    (DeviceCategory::Router, "mxgraph.mscae.enterprise.router"),
    (DeviceCategory::Switch, "mxgraph.mscae.enterprise.device"),
    (DeviceCategory::Firewall, "mxgraph.cisco_safe.security_icons.firewall"),
    (DeviceCategory::WirelessAccessPoint, "mxgraph.ios7.icons.wifi"),
    (DeviceCategory::Server, "mxgraph.mscae.enterprise.server_generic"),
    (DeviceCategory::Workstation, "mxgraph.mscae.enterprise.workstation_client"),
    (DeviceCategory::Printer, "mxgraph.cisco19.printer"),
    (DeviceCategory::IpPhone, "mxgraph.cisco19.ip_phone"),
    (DeviceCategory::Camera, "mxgraph.aws4.camera2"),
    (DeviceCategory::Unknown, "mxgraph.mscae.enterprise.device"),
];

static SHAPE_TABLE: Lazy<HashMap<DeviceCategory, &'static str>> =
    Lazy::new(|| SHAPES.iter().copied().collect());

static PORT_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)/").expect("port number pattern is valid"));

static PRINTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)printer|ipp").expect("printer pattern is valid"));
static SIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsip\b").expect("SIP pattern is valid"));
static RTSP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\brtsp\b").expect("RTSP pattern is valid"));
static RDP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\brdp\b").expect("RDP pattern is valid"));
static SMB_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsmb\b").expect("SMB pattern is valid"));

/// Signals extracted once per host
struct Signals<'a> {
    os: String,
    ports: &'a [String],
}

impl<'a> Signals<'a> {
    fn new(host: &'a Host) -> Self {
        Self {
            os: host.os_guess.as_deref().unwrap_or("").to_lowercase(),
            ports: &host.ports,
        }
    }

    fn os_has(&self, needle: &str) -> bool {
        self.os.contains(needle)
    }

    fn os_has_any(&self, needles: &[&str]) -> bool {
        needles.iter().any(|n| self.os.contains(n))
    }

    fn has_port(&self, wanted: &[u64]) -> bool {
        self.ports.iter().any(|descriptor| {
            PORT_NUMBER_RE
                .captures(descriptor)
                .and_then(|caps| caps[1].parse::<u64>().ok())
                .is_some_and(|port| wanted.contains(&port))
        })
    }

    fn has_service(&self, pattern: &Regex) -> bool {
        self.ports.iter().any(|descriptor| pattern.is_match(descriptor))
    }
}

/// Guesses the device category of a host
///
/// Total and deterministic: hosts with no usable signal are [`DeviceCategory::Unknown`].
pub fn classify(host: &Host) -> DeviceCategory {
    let category = classify_signals(&Signals::new(host));
    trace!(address = %host.address, %category, "classified host");
    category
}

fn classify_signals(s: &Signals<'_>) -> DeviceCategory {
    if s.os_has("firewall") {
        return DeviceCategory::Firewall;
    }
    if s.os_has_any(&["router", "cisco ios", "juniper"]) {
        return DeviceCategory::Router;
    }
    if s.os_has("switch") {
        return DeviceCategory::Switch;
    }
    if s.os_has_any(&["wireless", "access point"]) {
        return DeviceCategory::WirelessAccessPoint;
    }

    if s.has_port(&[9100, 631, 515]) || s.has_service(&PRINTER_RE) {
        return DeviceCategory::Printer;
    }
    if s.has_port(&[5060, 5061]) || s.has_service(&SIP_RE) {
        return DeviceCategory::IpPhone;
    }
    if s.has_port(&[554]) || s.has_service(&RTSP_RE) {
        return DeviceCategory::Camera;
    }

    if s.has_port(&[3389]) || s.has_service(&RDP_RE) {
        return if s.os_has("server") {
            DeviceCategory::Server
        } else {
            DeviceCategory::Workstation
        };
    }
    if s.has_port(&[445]) || s.has_service(&SMB_RE) {
        if s.os_has("server") {
            return DeviceCategory::Server;
        }
        if s.os_has("windows") {
            return DeviceCategory::Workstation;
        }
    }

    if s.os_has("windows") {
        return DeviceCategory::Workstation;
    }
    if s.os_has_any(&["linux", "unix"]) {
        return DeviceCategory::Server;
    }

    DeviceCategory::Unknown
}

/// Shape name used for a category
pub fn shape_for(category: DeviceCategory) -> &'static str {
    SHAPE_TABLE
        .get(&category)
        .or_else(|| SHAPE_TABLE.get(&DeviceCategory::Unknown))
        .copied()
        .unwrap_or("mxgraph.mscae.enterprise.device")
}

/// Full draw.io style string for a category
///
/// ```
/// use drawmap_core::classify::{style_for, DeviceCategory};
///
/// assert_eq!(
///     style_for(DeviceCategory::Router),
///     "shape=mxgraph.mscae.enterprise.router;html=1;whiteSpace=wrap;align=center;verticalAlign=middle;strokeWidth=1;"
/// );
/// ```
pub fn style_for(category: DeviceCategory) -> String {
    format!(
        "shape={};html=1;whiteSpace=wrap;align=center;verticalAlign=middle;strokeWidth=1;",
        shape_for(category)
    )
}
