use std::collections::HashMap;

use crate::board::ComponentInstance;
use crate::geometry::Coord;
use crate::grid::Grid;

use super::Diagnostic;

/// Report pins outside the grid and pins landing on an already occupied hole.
///
/// Components are scanned in order, pins in footprint order. The first
/// component to claim a hole owns it; every later pin there (including a
/// duplicate pin of the owner itself) is a conflict. An out-of-grid pin is
/// reported once and never claims a hole.
pub fn check_placement(grid: &Grid, components: &[ComponentInstance]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut occupied: HashMap<Coord, &str> = HashMap::new();

    for component in components {
        let reference = component.reference();
        for pin in component.placed_pins() {
            if !grid.contains(pin) {
                diagnostics.push(Diagnostic::pin_out_of_bounds(reference, pin));
                continue;
            }
            match occupied.get(&pin) {
                Some(owner) => diagnostics.push(Diagnostic::pin_conflict(reference, owner, pin)),
                None => {
                    occupied.insert(pin, reference);
                }
            }
        }
    }

    tracing::debug!(
        "placement: {} components, {} holes occupied, {} diagnostics",
        components.len(),
        occupied.len(),
        diagnostics.len()
    );
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::DiagnosticKind;
    use crate::footprint::{line_pins, Axis, Footprint, Pin};
    use crate::geometry::Rotation;
    use std::sync::Arc;

    fn header(n: i32) -> Arc<Footprint> {
        Arc::new(Footprint::new(
            "HDR",
            line_pins(Coord::ORIGIN, Axis::X, n, 1, 1).unwrap(),
        ))
    }

    #[test]
    fn test_clean_placement() {
        let grid = Grid::new(10, 10).unwrap();
        let comps = vec![
            ComponentInstance::new("J1", header(4), Coord::new(0, 0)),
            ComponentInstance::new("J2", header(4), Coord::new(0, 1)),
        ];
        assert!(check_placement(&grid, &comps).is_empty());
    }

    #[test]
    fn test_overlap_reports_single_conflict() {
        let grid = Grid::new(10, 10).unwrap();
        let comps = vec![
            ComponentInstance::new("J1", header(3), Coord::new(0, 0)),
            ComponentInstance::new("J2", header(3), Coord::new(2, 0)),
        ];
        let diags = check_placement(&grid, &comps);
        assert_eq!(diags.len(), 1);
        let d = &diags[0];
        assert_eq!(d.kind, DiagnosticKind::PinConflict);
        assert_eq!(d.coord, Some(Coord::new(2, 0)));
        assert_eq!(d.subject, "J2");
        assert_eq!(d.related.as_deref(), Some("J1"));
        assert_eq!(d.message, "conflict at (2, 0): J2 overlaps J1");
    }

    #[test]
    fn test_out_of_bounds_not_also_conflict() {
        let grid = Grid::new(3, 3).unwrap();
        let comps = vec![
            ComponentInstance::new("A", header(5), Coord::new(0, 0)),
            ComponentInstance::new("B", header(5), Coord::new(0, 0)),
        ];
        let diags = check_placement(&grid, &comps);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "A: pin outside grid at (3, 0)",
                "A: pin outside grid at (4, 0)",
                "conflict at (0, 0): B overlaps A",
                "conflict at (1, 0): B overlaps A",
                "conflict at (2, 0): B overlaps A",
                "B: pin outside grid at (3, 0)",
                "B: pin outside grid at (4, 0)",
            ]
        );
    }

    #[test]
    fn test_self_overlap_reported() {
        let grid = Grid::new(5, 5).unwrap();
        let stacked = Arc::new(Footprint::new(
            "STACK",
            line_pins(Coord::ORIGIN, Axis::Y, 2, 0, 1).unwrap(),
        ));
        let comps = vec![ComponentInstance::new("X1", stacked, Coord::new(1, 1))];
        let diags = check_placement(&grid, &comps);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "conflict at (1, 1): X1 overlaps X1");
    }

    #[test]
    fn test_rotation_moves_pins_off_grid() {
        let grid = Grid::new(5, 5).unwrap();
        let fp = Arc::new(Footprint::new(
            "R",
            vec![Pin::new("1", Coord::new(0, 0)), Pin::new("2", Coord::new(2, 0))],
        ));
        let comps =
            vec![ComponentInstance::new("R1", fp, Coord::new(1, 1)).with_rotation(Rotation::Deg180)];
        let diags = check_placement(&grid, &comps);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::PinOutOfBounds);
        assert_eq!(diags[0].coord, Some(Coord::new(-1, 1)));
    }
}
