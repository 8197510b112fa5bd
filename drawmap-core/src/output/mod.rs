//! Output formats
//!
//! # Formats
//!
//! - **draw.io** - `mxfile` XML for diagrams.net ([`drawio`])
//! - **JSON** - host inventory with device categories ([`json`])
//!
//! # Examples
//!
//! ```
//! use drawmap_core::diagram::{build_diagram, DiagramOptions};
//! use drawmap_core::output::{hosts_to_json, to_xml};
//! use drawmap_core::types::Host;
//!
//! let hosts = vec![Host::new("10.0.0.1")];
//! let xml = to_xml(&build_diagram(&hosts, &DiagramOptions::default()));
//! let json = hosts_to_json(&hosts).unwrap();
//! assert!(xml.contains("mxGraphModel"));
//! assert!(json.starts_with('['));
//! ```

pub mod common;
pub mod drawio;
pub mod json;

pub use drawio::to_xml;
pub use json::hosts_to_json;
