use std::collections::HashSet;

use crate::board::Trace;
use crate::geometry::Coord;
use crate::grid::Grid;

use super::Diagnostic;

/// Validate every trace independently and return all findings in trace order.
pub fn check_traces(grid: &Grid, traces: &[Trace]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for trace in traces {
        check_trace(grid, trace, &mut diagnostics);
    }
    tracing::debug!(
        "traces: {} checked, {} diagnostics",
        traces.len(),
        diagnostics.len()
    );
    diagnostics
}

/// Walk one trace point by point.
///
/// The visited set covers the whole trace, so touching a cell that any
/// earlier segment already covered counts as a self-intersection, and every
/// repeat visit is reported, not just the first. The first point seeds the
/// visited set even when it lies off the grid. Duplicate and diagonal
/// segments are reported and skipped without rasterizing.
fn check_trace(grid: &Grid, trace: &Trace, diagnostics: &mut Vec<Diagnostic>) {
    let tid = trace.id.as_str();
    let (first, rest) = match trace.points.split_first() {
        Some((first, rest)) if !rest.is_empty() => (*first, rest),
        _ => {
            diagnostics.push(Diagnostic::trace_too_short(tid));
            return;
        }
    };

    let mut visited: HashSet<Coord> = HashSet::new();
    visited.insert(first);
    if !grid.contains(first) {
        diagnostics.push(Diagnostic::trace_out_of_bounds(tid, first));
    }

    let mut prev = first;
    for &next in rest {
        if !grid.contains(next) {
            diagnostics.push(Diagnostic::trace_out_of_bounds(tid, next));
        }

        let (dx, dy) = prev.offset_to(next);
        if dx == 0 && dy == 0 {
            diagnostics.push(Diagnostic::duplicate_point(tid, next));
            prev = next;
            continue;
        }
        if dx != 0 && dy != 0 {
            diagnostics.push(Diagnostic::non_orthogonal_segment(tid, prev, next));
            prev = next;
            continue;
        }

        // Every stepped cell lies between `prev` and `next`, so the add stays in range.
        let step = Coord::new(dx.signum() as i32, dy.signum() as i32);
        let mut cell = prev;
        for _ in 0..dx.abs() + dy.abs() {
            cell = cell + step;
            if !visited.insert(cell) {
                diagnostics.push(Diagnostic::self_intersection(tid, cell));
            }
        }
        prev = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drc::DiagnosticKind;

    fn trace(points: &[(i32, i32)]) -> Trace {
        Trace::new("T1", "SIG", points.iter().copied().map(Coord::from).collect())
    }

    fn kinds(diags: &[Diagnostic]) -> Vec<DiagnosticKind> {
        diags.iter().map(|d| d.kind).collect()
    }

    #[test]
    fn test_l_shape_is_clean() {
        let grid = Grid::new(10, 10).unwrap();
        assert!(check_traces(&grid, &[trace(&[(0, 0), (3, 0), (3, 3)])]).is_empty());
    }

    #[test]
    fn test_closed_loop_flags_start_once() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(&grid, &[trace(&[(0, 0), (3, 0), (3, 3), (0, 3), (0, 0)])]);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::SelfIntersection);
        assert_eq!(diags[0].coord, Some(Coord::new(0, 0)));
        assert_eq!(diags[0].message, "trace T1: self-intersection at (0, 0)");
    }

    #[test]
    fn test_too_short() {
        let grid = Grid::new(10, 10).unwrap();
        for pts in [&[][..], &[(1, 1)][..]] {
            let diags = check_traces(&grid, &[trace(pts)]);
            assert_eq!(kinds(&diags), vec![DiagnosticKind::TraceTooShort]);
            assert_eq!(diags[0].message, "trace T1: must have at least 2 points");
        }
    }

    #[test]
    fn test_diagonal_not_rasterized() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(&grid, &[trace(&[(0, 0), (1, 1)])]);
        assert_eq!(kinds(&diags), vec![DiagnosticKind::NonOrthogonalSegment]);
        assert_eq!(diags[0].message, "trace T1: non-orthogonal segment (0, 0) -> (1, 1)");
    }

    #[test]
    fn test_diagonal_skips_cells_it_would_cross() {
        // (1,1) lies on the diagonal but is never marked visited.
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(&grid, &[trace(&[(0, 0), (2, 2), (1, 2), (1, 0)])]);
        assert_eq!(kinds(&diags), vec![DiagnosticKind::NonOrthogonalSegment]);
    }

    #[test]
    fn test_duplicate_point() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(&grid, &[trace(&[(1, 1), (1, 1)])]);
        assert_eq!(kinds(&diags), vec![DiagnosticKind::DuplicatePoint]);
    }

    #[test]
    fn test_backtrack_reports_every_revisit() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(&grid, &[trace(&[(0, 0), (3, 0), (1, 0)])]);
        let coords: Vec<Coord> = diags.iter().filter_map(|d| d.coord).collect();
        assert_eq!(coords, vec![Coord::new(2, 0), Coord::new(1, 0)]);

        // Third pass over the same cells reports them again.
        let diags = check_traces(&grid, &[trace(&[(0, 0), (2, 0), (0, 0), (2, 0)])]);
        assert_eq!(diags.len(), 4);
        assert!(diags.iter().all(|d| d.kind == DiagnosticKind::SelfIntersection));
    }

    #[test]
    fn test_intersection_across_distant_segments() {
        let grid = Grid::new(10, 10).unwrap();
        // A plus-shaped crossing: the fourth segment crosses the first.
        let diags = check_traces(
            &grid,
            &[trace(&[(0, 2), (4, 2), (4, 4), (2, 4), (2, 0)])],
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].coord, Some(Coord::new(2, 2)));
    }

    #[test]
    fn test_out_of_bounds_points() {
        let grid = Grid::new(3, 3).unwrap();
        let diags = check_traces(&grid, &[trace(&[(-1, 0), (2, 0), (2, 5)])]);
        let messages: Vec<&str> = diags.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "trace T1: point outside grid at (-1, 0)",
                "trace T1: point outside grid at (2, 5)",
            ]
        );
    }

    #[test]
    fn test_off_grid_start_still_seeds_visited() {
        let grid = Grid::new(5, 5).unwrap();
        let diags = check_traces(&grid, &[trace(&[(-1, 0), (1, 0), (-1, 0)])]);
        assert_eq!(
            kinds(&diags),
            vec![
                DiagnosticKind::TraceOutOfBounds,
                DiagnosticKind::TraceOutOfBounds,
                DiagnosticKind::SelfIntersection,
                DiagnosticKind::SelfIntersection,
            ]
        );
        assert_eq!(diags[3].coord, Some(Coord::new(-1, 0)));
    }

    #[test]
    fn test_far_apart_points_are_reported_not_overflowed() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(
            &grid,
            &[trace(&[(-2_000_000_000, 0), (2_000_000_000, 5)])],
        );
        assert_eq!(
            kinds(&diags),
            vec![
                DiagnosticKind::TraceOutOfBounds,
                DiagnosticKind::TraceOutOfBounds,
                DiagnosticKind::NonOrthogonalSegment,
            ]
        );

        let diags = check_traces(&grid, &[trace(&[(i32::MIN, i32::MIN), (i32::MAX, i32::MAX)])]);
        assert_eq!(diags.len(), 3);
        assert_eq!(diags[2].kind, DiagnosticKind::NonOrthogonalSegment);
    }

    #[test]
    fn test_walk_up_to_i32_max() {
        let grid = Grid::new(10, 10).unwrap();
        let diags = check_traces(
            &grid,
            &[trace(&[(i32::MAX - 3, 0), (i32::MAX, 0), (i32::MAX - 2, 0)])],
        );
        let intersections: Vec<Option<Coord>> = diags
            .iter()
            .filter(|d| d.kind == DiagnosticKind::SelfIntersection)
            .map(|d| d.coord)
            .collect();
        assert_eq!(
            intersections,
            vec![
                Some(Coord::new(i32::MAX - 1, 0)),
                Some(Coord::new(i32::MAX - 2, 0)),
            ]
        );
    }

    #[test]
    fn test_traces_reported_in_input_order() {
        let grid = Grid::new(5, 5).unwrap();
        let mut second = trace(&[(0, 0)]);
        second.id = "T2".to_string();
        let diags = check_traces(&grid, &[trace(&[(0, 0), (1, 1)]), second]);
        let subjects: Vec<&str> = diags.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, vec!["T1", "T2"]);
    }
}
