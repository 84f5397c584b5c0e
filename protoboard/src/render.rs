//! SVG preview of a board with DRC highlights.
//!
//! Pins are colored by looking up their coordinate in the diagnostics'
//! `coord` fields; nothing is parsed back out of message text.

use std::collections::HashSet;
use std::path::Path;

use crate::board::{BoundingBox, Board};
use crate::color::Color;
use crate::core::ProtoboardError;
use crate::drc::{Diagnostic, DiagnosticKind};
use crate::geometry::Coord;

/// Pixel layout and palette for rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Space around the board frame, in pixels.
    pub outer_margin: i32,
    /// Space between the frame and the first hole column/row.
    pub inner_margin: i32,
    /// Pixels per grid cell.
    pub scale: i32,
    pub hole_radius: i32,
    pub pin_radius: i32,
    /// Inset of component boxes from their cell edges.
    pub box_pad: i32,
    pub background: String,
    pub board: String,
    pub hole: String,
    pub pin_ok: String,
    pub pin_error: String,
    pub component_box: String,
    pub text: String,
    pub trace: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            outer_margin: 40,
            inner_margin: 20,
            scale: 20,
            hole_radius: 3,
            pin_radius: 5,
            box_pad: 1,
            background: "#1e1e1e".to_string(),
            board: "#aaaaaa".to_string(),
            hole: "#555".to_string(),
            pin_ok: "#55ff55".to_string(),
            pin_error: "#ff5555".to_string(),
            component_box: "#888888".to_string(),
            text: "#ffffff".to_string(),
            trace: "#c87533".to_string(),
        }
    }
}

impl RenderOptions {
    fn offset(&self) -> i64 {
        i64::from(self.outer_margin) + i64::from(self.inner_margin)
    }

    fn px(&self, cells: i32) -> i64 {
        i64::from(cells) * i64::from(self.scale)
    }

    /// Center of a cell in pixels.
    fn cell_center(&self, c: Coord) -> (i64, i64) {
        let half = i64::from(self.scale / 2);
        let (x, y) = self.cell_top_left(c);
        (x + half, y + half)
    }

    fn cell_top_left(&self, c: Coord) -> (i64, i64) {
        (self.offset() + self.px(c.x), self.offset() + self.px(c.y))
    }

    fn box_rect(&self, b: &BoundingBox) -> (i64, i64, i64, i64) {
        let (x, y) = self.cell_top_left(Coord::new(b.min_x, b.min_y));
        let pad = i64::from(self.box_pad);
        let scale = i64::from(self.scale);
        let w = (i64::from(b.max_x) - i64::from(b.min_x) + 1) * scale - 2 * pad;
        let h = (i64::from(b.max_y) - i64::from(b.min_y) + 1) * scale - 2 * pad;
        (x + pad, y + pad, w, h)
    }
}

/// Pin cells named by placement diagnostics. Trace and jumper findings
/// are drawn by their own shapes and never recolor a pin.
pub fn highlighted_cells(diagnostics: &[Diagnostic]) -> HashSet<Coord> {
    diagnostics
        .iter()
        .filter(|d| matches!(d.kind, DiagnosticKind::PinOutOfBounds | DiagnosticKind::PinConflict))
        .filter_map(|d| d.coord)
        .collect()
}

pub fn render_svg(board: &Board, diagnostics: &[Diagnostic], options: &RenderOptions) -> String {
    let grid = board.grid;
    let width_px = options.px(grid.width) + 2 * options.offset();
    let height_px = options.px(grid.height) + 2 * options.offset();
    let errors = highlighted_cells(diagnostics);

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
        width_px, height_px
    ));
    svg.push_str(&format!(
        "<rect width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
        width_px, height_px, options.background
    ));

    // frame
    svg.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
        options.outer_margin,
        options.outer_margin,
        options.px(grid.width) + 2 * i64::from(options.inner_margin),
        options.px(grid.height) + 2 * i64::from(options.inner_margin),
        options.board
    ));

    for cell in grid.cells() {
        let (cx, cy) = options.cell_center(cell);
        svg.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"/>\n",
            cx, cy, options.hole_radius, options.hole
        ));
    }

    for component in board.components() {
        if let Some(bbox) = component.bounding_box() {
            let (x, y, w, h) = options.box_rect(&bbox);
            svg.push_str(&format!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4,3\"/>\n",
                x, y, w, h, options.component_box
            ));
        }
    }

    for trace in board.traces() {
        if trace.points.len() < 2 {
            continue;
        }
        let points: Vec<String> = trace
            .points
            .iter()
            .map(|&p| {
                let (x, y) = options.cell_center(p);
                format!("{},{}", x, y)
            })
            .collect();
        svg.push_str(&format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"><title>{} ({})</title></polyline>\n",
            points.join(" "),
            options.trace,
            options.pin_radius,
            escape(&trace.id),
            escape(&trace.net)
        ));
    }

    for jumper in board.jumpers() {
        let (x1, y1) = options.cell_center(jumper.a);
        let (x2, y2) = options.cell_center(jumper.b);
        let stroke = jumper
            .color
            .map(|c: Color| c.to_string())
            .unwrap_or_else(|| options.component_box.clone());
        svg.push_str(&format!(
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"3\" stroke-linecap=\"round\"><title>{} ({})</title></line>\n",
            x1, y1, x2, y2, stroke, escape(&jumper.id), escape(&jumper.net)
        ));
    }

    for component in board.components() {
        for pin in component.placed_pins() {
            let (cx, cy) = options.cell_center(pin);
            let fill = if errors.contains(&pin) {
                &options.pin_error
            } else {
                &options.pin_ok
            };
            svg.push_str(&format!(
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" fill-opacity=\"0.8\"/>\n",
                cx, cy, options.pin_radius, fill
            ));
        }
    }

    for component in board.components() {
        let (tx, ty) = options.cell_center(component.origin);
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"10\" text-anchor=\"middle\" font-family=\"monospace\">{}</text>\n",
            tx,
            ty - 6,
            options.text,
            escape(component.reference())
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

pub fn write_svg(
    path: &Path,
    board: &Board,
    diagnostics: &[Diagnostic],
    options: &RenderOptions,
) -> Result<(), ProtoboardError> {
    std::fs::write(path, render_svg(board, diagnostics, options))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
