//! Diagram assembly
//!
//! Turns a canonical host list into a [`Diagram`]: an ordered list of cells ready for
//! serialisation. Building happens in two phases:
//!
//! 1. [`CellIds::reserve`] hands out every identifier up front (`0` and `1` are the
//!    structural root cells, then branding, hub, hosts and edges)
//! 2. cells are emitted in paint order, which draw.io treats as back-to-front: edges
//!    first, then branding, then the hub, then hosts. Nodes therefore always sit in front
//!    of the connector lines.
//!
//! # Example
//!
//! ```
//! use drawmap_core::diagram::{build_diagram, DiagramOptions};
//! use drawmap_core::types::Host;
//!
//! let hosts = vec![Host::new("10.0.0.1"), Host::new("10.0.0.2")];
//! let diagram = build_diagram(&hosts, &DiagramOptions::default());
//!
//! // two edges, branding, hub, two hosts
//! assert_eq!(diagram.cells.len(), 6);
//! assert!(diagram.cells[0].is_edge());
//! ```

use crate::classify::{classify, style_for, DeviceCategory};
use crate::layout::{compute_layout, CellRect, LayoutGeometry};
use crate::output::common::escape_html;
use crate::types::Host;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Default text shown next to the branding image
pub const DEFAULT_BRANDING_TEXT: &str =
    "Network Maps: nmap to draw.io by CompSec Direct® CompSecDirect.com";

/// Label of the hub node
pub const HUB_LABEL: &str = "Network";

const EDGE_STYLE: &str =
    "edgeStyle=orthogonalEdgeStyle;rounded=0;orthogonalLoop=1;jettySize=auto;html=1;endArrow=none;";

const BRANDING_GEOMETRY: CellRect = CellRect {
    x: 10,
    y: 10,
    width: 180,
    height: 101,
};

/// Caller-controlled diagram settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOptions {
    /// Name of the draw.io page
    pub page_name: String,
    /// Add the central "Network" node and an edge to every host
    pub hub: bool,
    /// `id` attribute of the `<diagram>` element
    pub diagram_id: String,
    /// `modified` attribute of the `<mxfile>` element
    pub modified: String,
    /// Text of the branding element
    pub branding_text: String,
    /// Pre-encoded image reference (e.g. a `data:` URI) for the branding element
    pub branding_image: Option<String>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            page_name: "Page-1".to_string(),
            hub: true,
            diagram_id: uuid::Uuid::new_v4().to_string(),
            modified: String::new(),
            branding_text: DEFAULT_BRANDING_TEXT.to_string(),
            branding_image: None,
        }
    }
}

impl DiagramOptions {
    /// Stamps `modified` with the given instant in the format draw.io writes itself
    pub fn modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.modified = modified_timestamp(at);
        self
    }
}

/// `2024-01-01T12:00:00.000Z`
pub fn modified_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Identifiers handed out before any cell is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellIds {
    pub branding: String,
    pub hub: Option<String>,
    pub hosts: Vec<String>,
    pub edges: Vec<String>,
}

impl CellIds {
    /// First identifier after the two structural root cells
    pub const FIRST: usize = 2;

    /// Allocates ids for the branding element, the hub, every host and every edge
    ///
    /// ```
    /// use drawmap_core::diagram::CellIds;
    ///
    /// let ids = CellIds::reserve(2, true);
    /// assert_eq!(ids.branding, "2");
    /// assert_eq!(ids.hub.as_deref(), Some("3"));
    /// assert_eq!(ids.hosts, vec!["4", "5"]);
    /// assert_eq!(ids.edges, vec!["6", "7"]);
    /// ```
    pub fn reserve(host_count: usize, hub: bool) -> Self {
        let mut next = Self::FIRST;
        let mut take = || {
            let id = next.to_string();
            next += 1;
            id
        };

        let branding = take();
        let hub_id = hub.then(&mut take);
        let hosts = (0..host_count).map(|_| take()).collect();
        let edges = if hub {
            (0..host_count).map(|_| take()).collect()
        } else {
            Vec::new()
        };

        Self {
            branding,
            hub: hub_id,
            hosts,
            edges,
        }
    }
}

/// What a cell represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// Undirected hub-to-host connector
    Edge { source: String, target: String },
    /// Logo and caption in the top-left corner
    Branding { geometry: CellRect },
    /// The central "Network" node
    Hub { geometry: CellRect },
    /// One scanned host
    Host {
        geometry: CellRect,
        category: DeviceCategory,
        address: String,
    },
}

/// One `mxCell`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub id: String,
    /// Label markup (HTML)
    pub value: String,
    pub style: String,
    pub kind: CellKind,
}

impl Cell {
    pub fn is_edge(&self) -> bool {
        matches!(self.kind, CellKind::Edge { .. })
    }

    /// Geometry of a vertex; edges have none
    pub fn geometry(&self) -> Option<CellRect> {
        match &self.kind {
            CellKind::Edge { .. } => None,
            CellKind::Branding { geometry }
            | CellKind::Hub { geometry }
            | CellKind::Host { geometry, .. } => Some(*geometry),
        }
    }
}

/// A complete single-page diagram
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub id: String,
    pub page_name: String,
    pub modified: String,
    pub page_width: i64,
    pub page_height: i64,
    pub layout: LayoutGeometry,
    /// Cells in paint order (back to front), without the two root cells
    pub cells: Vec<Cell>,
}

impl Diagram {
    /// Number of host nodes
    pub fn host_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c.kind, CellKind::Host { .. }))
            .count()
    }
}

/// Builds the diagram for `hosts`, in list order
pub fn build_diagram(hosts: &[Host], options: &DiagramOptions) -> Diagram {
    let layout = compute_layout(hosts.len(), options.hub);
    let ids = CellIds::reserve(hosts.len(), options.hub);
    let (page_width, page_height) = layout.page_size();

    let mut cells = Vec::with_capacity(hosts.len() * 2 + 2);

    if let Some(hub_id) = &ids.hub {
        for (edge_id, host_id) in ids.edges.iter().zip(&ids.hosts) {
            cells.push(Cell {
                id: edge_id.clone(),
                value: String::new(),
                style: EDGE_STYLE.to_string(),
                kind: CellKind::Edge {
                    source: hub_id.clone(),
                    target: host_id.clone(),
                },
            });
        }
    }

    cells.push(Cell {
        id: ids.branding.clone(),
        value: branding_html(&options.branding_text),
        style: branding_style(options.branding_image.as_deref()),
        kind: CellKind::Branding {
            geometry: BRANDING_GEOMETRY,
        },
    });

    if let Some(hub_id) = &ids.hub {
        cells.push(Cell {
            id: hub_id.clone(),
            value: label_html(HUB_LABEL, &format!("{} host(s)", hosts.len())),
            style: style_for(DeviceCategory::NetworkHub) + "aspect=fixed;",
            kind: CellKind::Hub {
                geometry: layout.hub_position(),
            },
        });
    }

    for (index, (host, id)) in hosts.iter().zip(&ids.hosts).enumerate() {
        let category = classify(host);
        cells.push(Cell {
            id: id.clone(),
            value: label_html(&host.display_label(), &host.tooltip_text()),
            style: style_for(category),
            kind: CellKind::Host {
                geometry: layout.cell_position(index),
                category,
                address: host.address.clone(),
            },
        });
    }

    debug!(
        hosts = hosts.len(),
        cells = cells.len(),
        page_width,
        page_height,
        "built diagram"
    );

    Diagram {
        id: options.diagram_id.clone(),
        page_name: options.page_name.clone(),
        modified: options.modified.clone(),
        page_width,
        page_height,
        layout,
        cells,
    }
}

/// Node label: a dark badge holding `label`, with `tooltip` as its hover title
///
/// Both texts are HTML-escaped; line breaks become `<br/>` in the label and `&#10;` in the
/// title.
pub fn label_html(label: &str, tooltip: &str) -> String {
    let label = escape_html(label).replace('\n', "<br/>");
    let tooltip = escape_html(tooltip).replace('\n', "&#10;");
    format!(
        concat!(
            r#"<div title="{}" style="text-align:center;">"#,
            r#"<span style="display:inline-block;background:#000000;color:#00CC66;"#,
            r#"padding:3px 8px;border-radius:6px;font-size:18px;font-weight:600;line-height:1.2;">"#,
            "{}</span></div>"
        ),
        tooltip, label
    )
}

/// Branding caption markup
pub fn branding_html(text: &str) -> String {
    format!(
        concat!(
            r#"<div style="text-align:left;">"#,
            r#"<span style="display:inline-block;background:#000000;color:#0197FF;"#,
            r#"padding:0px 0px;border-radius:6px;font-size:10px;font-weight:600;line-height:1.2;">"#,
            "{}</span></div>"
        ),
        escape_html(text)
    )
}

/// Branding style: an image with the caption to its right, or a plain text block
pub fn branding_style(image: Option<&str>) -> String {
    match image {
        Some(uri) => format!(
            concat!(
                "shape=image;image={};aspect=fixed;imageAspect=0;html=1;whiteSpace=wrap;",
                "labelPosition=right;verticalLabelPosition=middle;align=left;verticalAlign=middle;",
                "spacingLeft=0;strokeColor=none;fillColor=none;"
            ),
            uri
        ),
        None => "text;html=1;whiteSpace=wrap;align=left;verticalAlign=middle;strokeColor=none;fillColor=none;"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_modified_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(modified_timestamp(at), "2024-03-09T07:05:01.000Z");

        let options = DiagramOptions::default().modified_at(at);
        assert_eq!(options.modified, "2024-03-09T07:05:01.000Z");
        assert_eq!(options.page_name, "Page-1");
    }

    fn options(hub: bool) -> DiagramOptions {
        DiagramOptions {
            hub,
            diagram_id: "test-diagram".to_string(),
            ..DiagramOptions::default()
        }
    }

    fn hosts(n: usize) -> Vec<Host> {
        (1..=n).map(|i| Host::new(format!("10.0.0.{}", i))).collect()
    }

    #[test]
    fn test_reserve_without_hub() {
        let ids = CellIds::reserve(3, false);
        assert_eq!(ids.branding, "2");
        assert!(ids.hub.is_none());
        assert_eq!(ids.hosts, vec!["3", "4", "5"]);
        assert!(ids.edges.is_empty());
    }

    #[test]
    fn test_reserve_empty() {
        let ids = CellIds::reserve(0, true);
        assert_eq!(ids.hub.as_deref(), Some("3"));
        assert!(ids.hosts.is_empty());
        assert!(ids.edges.is_empty());
    }

    #[test]
    fn test_z_order_with_hub() {
        let diagram = build_diagram(&hosts(3), &options(true));
        let order: Vec<&str> = diagram
            .cells
            .iter()
            .map(|c| match c.kind {
                CellKind::Edge { .. } => "edge",
                CellKind::Branding { .. } => "branding",
                CellKind::Hub { .. } => "hub",
                CellKind::Host { .. } => "host",
            })
            .collect();
        assert_eq!(
            order,
            vec!["edge", "edge", "edge", "branding", "hub", "host", "host", "host"]
        );
    }

    #[test]
    fn test_z_order_without_hub() {
        let diagram = build_diagram(&hosts(2), &options(false));
        assert_eq!(diagram.cells.len(), 3);
        assert!(diagram.cells.iter().all(|c| !c.is_edge()));
        assert!(matches!(diagram.cells[0].kind, CellKind::Branding { .. }));
        assert_eq!(diagram.host_count(), 2);
    }

    #[test]
    fn test_edges_reference_hub_and_hosts() {
        let diagram = build_diagram(&hosts(2), &options(true));
        let hub_id = diagram
            .cells
            .iter()
            .find(|c| matches!(c.kind, CellKind::Hub { .. }))
            .map(|c| c.id.clone())
            .unwrap();
        assert_eq!(hub_id, "3");

        let targets: Vec<&str> = diagram
            .cells
            .iter()
            .filter_map(|c| match &c.kind {
                CellKind::Edge { source, target } => {
                    assert_eq!(source, &hub_id);
                    Some(target.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec!["4", "5"]);
        assert_eq!(diagram.cells[0].style, EDGE_STYLE);
        assert!(diagram.cells[0].value.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let diagram = build_diagram(&hosts(12), &options(true));
        let mut ids: Vec<&str> = diagram.cells.iter().map(|c| c.id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_hub_cell() {
        let diagram = build_diagram(&hosts(4), &options(true));
        let hub = diagram
            .cells
            .iter()
            .find(|c| matches!(c.kind, CellKind::Hub { .. }))
            .unwrap();
        assert!(hub.value.contains(">Network</span>"));
        assert!(hub.value.contains(r#"title="4 host(s)""#));
        assert!(hub.style.ends_with("strokeWidth=1;aspect=fixed;"));
        assert_eq!(
            hub.geometry(),
            Some(CellRect { x: 185, y: 50, width: 90, height: 60 })
        );
    }

    #[test]
    fn test_host_cell_label_and_category() {
        let mut host = Host::new("10.0.0.5").with_name("dc01 <corp>");
        host.add_port("3389/tcp ms-wbt-server");
        host.offer_os_guess(Some("Windows Server 2019".to_string()), Some(90));

        let diagram = build_diagram(&[host], &options(true));
        let cell = diagram.cells.last().unwrap();

        match &cell.kind {
            CellKind::Host { category, address, .. } => {
                assert_eq!(*category, DeviceCategory::Server);
                assert_eq!(address, "10.0.0.5");
            }
            other => panic!("expected host cell, got {:?}", other),
        }
        assert!(cell.value.contains(">dc01 &lt;corp&gt;<br/>10.0.0.5</span>"));
        assert!(cell
            .value
            .contains(r#"title="OS: Windows Server 2019 (90%)&#10;Open ports:&#10;3389/tcp ms-wbt-server""#));
        assert!(cell.style.contains("server_generic"));
    }

    #[test]
    fn test_page_size_and_metadata() {
        let diagram = build_diagram(&hosts(2), &options(true));
        assert_eq!((diagram.page_width, diagram.page_height), (850, 1100));
        assert_eq!(diagram.id, "test-diagram");
        assert_eq!(diagram.page_name, "Page-1");
        assert_eq!(diagram.modified, "");
    }

    #[test]
    fn test_empty_host_list() {
        let diagram = build_diagram(&[], &options(true));
        assert_eq!(diagram.cells.len(), 2);
        assert_eq!(diagram.host_count(), 0);
    }

    #[test]
    fn test_branding() {
        let diagram = build_diagram(&hosts(1), &options(false));
        let branding = &diagram.cells[0];
        assert_eq!(branding.id, "2");
        assert_eq!(branding.geometry(), Some(BRANDING_GEOMETRY));
        assert!(branding.value.contains(DEFAULT_BRANDING_TEXT));
        assert!(branding
            .value
            .contains("nmap to draw.io by CompSec Direct® CompSecDirect.com"));
        assert!(branding.style.starts_with("text;"));

        let with_image = DiagramOptions {
            branding_image: Some("data:image/png;base64,AAAA".to_string()),
            ..options(false)
        };
        let diagram = build_diagram(&hosts(1), &with_image);
        assert!(diagram.cells[0]
            .style
            .starts_with("shape=image;image=data:image/png;base64,AAAA;aspect=fixed;"));
    }

    #[test]
    fn test_default_options_have_random_id() {
        let a = DiagramOptions::default();
        let b = DiagramOptions::default();
        assert_ne!(a.diagram_id, b.diagram_id);
        assert!(uuid::Uuid::parse_str(&a.diagram_id).is_ok());
        assert!(a.hub);
    }
}
