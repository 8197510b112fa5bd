//! draw.io (`.drawio`) output format
//!
//! Serialises a [`Diagram`] as an uncompressed `mxfile` document that diagrams.net opens
//! directly (File, Open from Device).

use crate::diagram::{Cell, CellKind, Diagram};
use crate::layout::CellRect;
use crate::output::common::escape_xml_attr;

/// Value of the `agent` attribute
pub const AGENT: &str = concat!("drawmap/", env!("CARGO_PKG_VERSION"));

/// draw.io file format version written to the `version` attribute
pub const DRAWIO_VERSION: &str = "22.0.8";

/// Renders the whole document
///
/// # Examples
///
/// ```
/// use drawmap_core::diagram::{build_diagram, DiagramOptions};
/// use drawmap_core::output::drawio::to_xml;
/// use drawmap_core::types::Host;
///
/// let diagram = build_diagram(&[Host::new("10.0.0.1")], &DiagramOptions::default());
/// let xml = to_xml(&diagram);
/// assert!(xml.starts_with("<?xml"));
/// assert!(xml.contains(r#"<mxCell id="1" parent="0"/>"#));
/// ```
pub fn to_xml(diagram: &Diagram) -> String {
    let mut out = String::with_capacity(1024 + diagram.cells.len() * 512);

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<mxfile host=\"app.diagrams.net\" modified=\"{}\" agent=\"{}\" version=\"{}\" type=\"device\">\n",
        escape_xml_attr(&diagram.modified),
        AGENT,
        DRAWIO_VERSION
    ));
    out.push_str(&format!(
        "<diagram id=\"{}\" name=\"{}\">\n",
        escape_xml_attr(&diagram.id),
        escape_xml_attr(&diagram.page_name)
    ));
    out.push_str(&format!(
        concat!(
            r#"<mxGraphModel dx="1200" dy="800" grid="1" gridSize="10" guides="1" tooltips="1" "#,
            r#"connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="{}" pageHeight="{}" "#,
            "math=\"0\" shadow=\"0\">\n"
        ),
        diagram.page_width, diagram.page_height
    ));
    out.push_str("<root>\n");
    out.push_str("<mxCell id=\"0\"/>\n");
    out.push_str("<mxCell id=\"1\" parent=\"0\"/>\n");

    for cell in &diagram.cells {
        out.push_str(&cell_xml(cell));
    }

    out.push_str("</root>\n</mxGraphModel>\n</diagram>\n</mxfile>\n");
    out
}

fn cell_xml(cell: &Cell) -> String {
    let open = format!(
        r#"<mxCell id="{}" value="{}" style="{}" "#,
        escape_xml_attr(&cell.id),
        escape_xml_attr(&cell.value),
        escape_xml_attr(&cell.style)
    );

    let body = match &cell.kind {
        CellKind::Edge { source, target } => format!(
            "edge=\"1\" parent=\"1\" source=\"{}\" target=\"{}\">\n<mxGeometry relative=\"1\" as=\"geometry\"/>\n",
            escape_xml_attr(source),
            escape_xml_attr(target)
        ),
        CellKind::Branding { geometry }
        | CellKind::Hub { geometry }
        | CellKind::Host { geometry, .. } => {
            format!("vertex=\"1\" parent=\"1\">\n{}", geometry_xml(geometry))
        }
    };

    format!("{}{}</mxCell>\n", open, body)
}

fn geometry_xml(rect: &CellRect) -> String {
    format!(
        "<mxGeometry x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" as=\"geometry\"/>\n",
        rect.x, rect.y, rect.width, rect.height
    )
}
