use crate::board::Jumper;
use crate::grid::Grid;

use super::Diagnostic;

/// Bounds-only check; jumpers may overlap anything.
pub fn check_jumpers(grid: &Grid, jumpers: &[Jumper]) -> Vec<Diagnostic> {
    let diagnostics: Vec<Diagnostic> = jumpers
        .iter()
        .flat_map(|jumper| {
            jumper
                .endpoints()
                .into_iter()
                .filter(move |(_, at)| !grid.contains(*at))
                .map(move |(endpoint, at)| Diagnostic::jumper_out_of_bounds(&jumper.id, endpoint, at))
        })
        .collect();

    tracing::debug!(
        "jumpers: {} checked, {} diagnostics",
        jumpers.len(),
        diagnostics.len()
    );
    diagnostics
}
