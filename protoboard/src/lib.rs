//! Protoboard - layout model and design-rule checks for prototyping boards
//!
//! Components are placed on a grid of holes, wired with point-to-point
//! jumpers and orthogonal copper traces, and checked for out-of-grid pins,
//! overlapping pins and malformed or self-crossing traces.
//!
//! # Quick Start
//!
//! ```no_run
//! use protoboard::{ProtoboardCore, ValidationOptions};
//! use std::path::Path;
//!
//! let result = ProtoboardCore::validate_board(
//!     Path::new("board.json"),
//!     Path::new("footprints.json"),
//!     ValidationOptions::default(),
//! ).unwrap();
//!
//! for diagnostic in &result.diagnostics {
//!     println!("{:?}: {}", diagnostic.severity, diagnostic.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Placement**: pins inside the grid, one pin per hole
//! - **Jumpers**: endpoints inside the grid
//! - **Traces**: orthogonal segments, no repeated points, no self-intersection
//! - **Rendering**: SVG preview with offending pins highlighted

pub mod board;
pub mod color;
pub mod core;
pub mod drc;
pub mod footprint;
pub mod geometry;
pub mod grid;
pub mod io;
pub mod render;

// Re-export main types
pub use board::{Board, BoundingBox, ComponentInstance, Endpoint, Jumper, Trace};
pub use color::{Color, ColorSource, RandomColorSource};
pub use crate::core::{
    default_footprints_path, ProtoboardCore, ProtoboardError, ValidationOptions,
    ValidationResult, ValidationStats,
};
pub use drc::{
    check_jumpers, check_placement, check_traces, Diagnostic, DiagnosticKind, DrcCheck,
    DrcEngine, Severity,
};
pub use footprint::{line_pins, Axis, Footprint, FootprintLibrary, Pin, PinLine};
pub use geometry::{Coord, Rotation};
pub use grid::Grid;
pub use io::{load_board, load_footprints, save_board, BoardDocument};
pub use render::{render_svg, write_svg, RenderOptions};

/// Load a footprint library and a board in one call (convenience wrapper).
pub fn open_board(
    board_path: &std::path::Path,
    footprints_path: &std::path::Path,
) -> Result<BoardDocument, ProtoboardError> {
    let library = load_footprints(footprints_path)?;
    load_board(board_path, &library)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Board, Coord, Diagnostic, DiagnosticKind, DrcEngine, ProtoboardCore, ProtoboardError,
        Rotation, Severity, ValidationOptions, ValidationResult, ValidationStats,
    };
}
