//! Example: registering an extra check next to the built-in ones.
//! Run with: cargo run --example custom_checks

use protoboard::{
    Board, ComponentInstance, Coord, Diagnostic, DrcCheck, DrcEngine, Footprint,
    Grid, Pin, ProtoboardError, Severity,
};
use std::sync::Arc;

/// Flags components whose origin sits on the outer ring of holes.
struct EdgeClearance;

impl DrcCheck for EdgeClearance {
    fn id(&self) -> &str {
        "edge_clearance"
    }

    fn name(&self) -> &str {
        "Edge clearance"
    }

    fn description(&self) -> &str {
        "Keeps component origins off the outermost row and column"
    }

    fn check(&self, board: &Board) -> Vec<Diagnostic> {
        let grid = board.grid;
        board
            .components()
            .iter()
            .filter(|c| {
                c.origin.x == 0
                    || c.origin.y == 0
                    || c.origin.x == grid.width - 1
                    || c.origin.y == grid.height - 1
            })
            .map(|c| {
                Diagnostic::custom(
                    c.reference(),
                    Severity::Warning,
                    Some(c.origin),
                    format!("{}: origin on board edge at {}", c.reference(), c.origin),
                )
            })
            .collect()
    }
}

fn main() -> Result<(), ProtoboardError> {
    let fp = Arc::new(Footprint::new("TP", vec![Pin::new("1", Coord::ORIGIN)]));
    let mut board = Board::new(Grid::new(10, 10)?);
    board.add_component(ComponentInstance::new("TP1", Arc::clone(&fp), Coord::new(0, 4)))?;
    board.add_component(ComponentInstance::new("TP2", fp, Coord::new(5, 5)))?;

    let mut engine = DrcEngine::with_default_checks();
    engine.add_check(Arc::new(EdgeClearance));

    for check in engine.checks() {
        println!("{:<16} {}", check.id(), check.name());
    }

    let diagnostics = engine.run(&board);
    println!("\n{} diagnostics", diagnostics.len());
    for d in &diagnostics {
        println!("  [{:?}] {}", d.severity, d);
    }
    Ok(())
}
