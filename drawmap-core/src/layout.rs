//! Grid layout for host nodes
//!
//! Hosts are placed on a near-square grid (`ceil(sqrt(n))` columns). Node size and gaps
//! shrink in steps as the host count grows; the canvas grows with the grid.

use tracing::debug;

/// Outer margin around everything, in diagram units
pub const MARGIN: f64 = 50.0;

/// Base node width before scaling
pub const BASE_NODE_WIDTH: f64 = 160.0;
/// Base node height before scaling
pub const BASE_NODE_HEIGHT: f64 = 70.0;
/// Base horizontal and vertical gap before scaling
pub const BASE_GAP: f64 = 40.0;

/// Hub node size
pub const HUB_WIDTH: f64 = 90.0;
pub const HUB_HEIGHT: f64 = 60.0;

/// Vertical room reserved above the grid with and without the hub
const HUB_ROW: f64 = 90.0;
const TOP_EXTRA_WITH_HUB: f64 = 130.0;
const TOP_EXTRA_WITHOUT_HUB: f64 = 40.0;

/// Grid dimensions, node size and canvas size for one diagram
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutGeometry {
    pub columns: usize,
    pub rows: usize,
    pub node_width: f64,
    pub node_height: f64,
    pub h_gap: f64,
    pub v_gap: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Whether room was reserved for the hub row
    pub hub: bool,
}

/// Integer position and size of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Size multiplier for a host count
///
/// ```
/// use drawmap_core::layout::scale_for;
///
/// assert_eq!(scale_for(30), 1.0);
/// assert_eq!(scale_for(31), 0.85);
/// assert_eq!(scale_for(81), 0.7);
/// assert_eq!(scale_for(151), 0.6);
/// ```
pub fn scale_for(host_count: usize) -> f64 {
    match host_count {
        n if n > 150 => 0.6,
        n if n > 80 => 0.7,
        n if n > 30 => 0.85,
        _ => 1.0,
    }
}

/// Computes the grid for `host_count` hosts
///
/// `hub` reserves the extra row at the top used by the "Network" node.
///
/// # Examples
///
/// ```
/// use drawmap_core::layout::compute_layout;
///
/// let geometry = compute_layout(10, true);
/// assert_eq!((geometry.columns, geometry.rows), (4, 3));
/// assert_eq!(geometry.canvas_width, 860.0);
/// ```
pub fn compute_layout(host_count: usize, hub: bool) -> LayoutGeometry {
    let (columns, rows) = grid_shape(host_count);
    let scale = if host_count == 0 { 1.0 } else { scale_for(host_count) };

    let node_width = BASE_NODE_WIDTH * scale;
    let node_height = BASE_NODE_HEIGHT * scale;
    let h_gap = BASE_GAP * scale;
    let v_gap = BASE_GAP * scale;

    let top_extra = if hub {
        TOP_EXTRA_WITH_HUB
    } else {
        TOP_EXTRA_WITHOUT_HUB
    };

    let cols = columns as f64;
    let rows_f = rows as f64;
    let canvas_width = MARGIN * 2.0 + cols * node_width + (cols - 1.0) * h_gap;
    let canvas_height = MARGIN * 2.0 + top_extra + rows_f * node_height + (rows_f - 1.0) * v_gap;

    debug!(
        hosts = host_count,
        columns, rows, scale, canvas_width, canvas_height, "computed layout"
    );

    LayoutGeometry {
        columns,
        rows,
        node_width,
        node_height,
        h_gap,
        v_gap,
        canvas_width,
        canvas_height,
        hub,
    }
}

fn grid_shape(host_count: usize) -> (usize, usize) {
    if host_count == 0 {
        return (1, 1);
    }
    let columns = ((host_count as f64).sqrt().ceil() as usize).max(1);
    let rows = host_count.div_ceil(columns).max(1);
    (columns, rows)
}

impl LayoutGeometry {
    /// Top edge of the first grid row
    pub fn start_y(&self) -> f64 {
        MARGIN + if self.hub { HUB_ROW } else { 0.0 } + 40.0
    }

    /// Position of the host at `index` in list order, truncated to whole units
    pub fn cell_position(&self, index: usize) -> CellRect {
        let row = index / self.columns;
        let col = index % self.columns;

        let x = MARGIN + col as f64 * (self.node_width + self.h_gap);
        let y = self.start_y() + row as f64 * (self.node_height + self.v_gap);

        CellRect {
            x: x as i64,
            y: y as i64,
            width: self.node_width as i64,
            height: self.node_height as i64,
        }
    }

    /// Geometry of the hub node, centred above the grid
    pub fn hub_position(&self) -> CellRect {
        CellRect {
            x: (self.canvas_width / 2.0 - HUB_WIDTH / 2.0) as i64,
            y: MARGIN as i64,
            width: HUB_WIDTH as i64,
            height: HUB_HEIGHT as i64,
        }
    }

    /// Page size: at least 850x1100, otherwise the canvas rounded up
    pub fn page_size(&self) -> (i64, i64) {
        (
            (self.canvas_width.ceil() as i64).max(850),
            (self.canvas_height.ceil() as i64).max(1100),
        )
    }
}
