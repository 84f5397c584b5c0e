//! Design-rule checks over a board snapshot.
//!
//! Each check is a pure scan that reports violations as [`Diagnostic`]
//! values and never fails on them; a board is allowed to be in a broken
//! state while it is being edited. Structural problems (bad rotations,
//! unknown check ids) are reported through `Err` instead.
//!
//! ```text
//! Board ──▶ placement ──┐
//!       ──▶ jumpers   ──┼──▶ Vec<Diagnostic>
//!       ──▶ traces    ──┘
//! ```

mod jumpers;
mod placement;
mod traces;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Endpoint};
use crate::core::ProtoboardError;
use crate::geometry::Coord;

pub use jumpers::check_jumpers;
pub use placement::check_placement;
pub use traces::check_traces;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    PinOutOfBounds,
    PinConflict,
    JumperOutOfBounds,
    TraceTooShort,
    TraceOutOfBounds,
    DuplicatePoint,
    NonOrthogonalSegment,
    SelfIntersection,
    /// Raised by checks registered through [`DrcEngine::add_check`].
    Custom,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::DuplicatePoint => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// One rule violation.
///
/// `subject` is the component ref, jumper id or trace id the violation
/// belongs to. `coord` is the offending cell, when there is one, so callers
/// never need to parse it back out of `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub subject: String,
    pub coord: Option<Coord>,
    /// Owner ref of a conflicting pin, or the endpoint label of a jumper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn new(
        kind: DiagnosticKind,
        subject: &str,
        coord: Option<Coord>,
        related: Option<String>,
        message: String,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            subject: subject.to_string(),
            coord,
            related,
            message,
        }
    }

    pub fn pin_out_of_bounds(reference: &str, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::PinOutOfBounds,
            reference,
            Some(at),
            None,
            format!("{}: pin outside grid at {}", reference, at),
        )
    }

    pub fn pin_conflict(reference: &str, owner: &str, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::PinConflict,
            reference,
            Some(at),
            Some(owner.to_string()),
            format!("conflict at {}: {} overlaps {}", at, reference, owner),
        )
    }

    pub fn jumper_out_of_bounds(jumper: &str, endpoint: Endpoint, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::JumperOutOfBounds,
            jumper,
            Some(at),
            Some(endpoint.to_string()),
            format!(
                "jumper {}: endpoint {} outside grid at {}",
                jumper, endpoint, at
            ),
        )
    }

    pub fn trace_too_short(trace: &str) -> Self {
        Self::new(
            DiagnosticKind::TraceTooShort,
            trace,
            None,
            None,
            format!("trace {}: must have at least 2 points", trace),
        )
    }

    pub fn trace_out_of_bounds(trace: &str, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::TraceOutOfBounds,
            trace,
            Some(at),
            None,
            format!("trace {}: point outside grid at {}", trace, at),
        )
    }

    pub fn duplicate_point(trace: &str, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::DuplicatePoint,
            trace,
            Some(at),
            None,
            format!("trace {}: duplicate consecutive point at {}", trace, at),
        )
    }

    pub fn non_orthogonal_segment(trace: &str, from: Coord, to: Coord) -> Self {
        Self::new(
            DiagnosticKind::NonOrthogonalSegment,
            trace,
            Some(to),
            None,
            format!("trace {}: non-orthogonal segment {} -> {}", trace, from, to),
        )
    }

    /// Finding from a user-defined check, with the severity it chooses.
    pub fn custom(
        subject: &str,
        severity: Severity,
        coord: Option<Coord>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            ..Self::new(DiagnosticKind::Custom, subject, coord, None, message.into())
        }
    }

    pub fn self_intersection(trace: &str, at: Coord) -> Self {
        Self::new(
            DiagnosticKind::SelfIntersection,
            trace,
            Some(at),
            None,
            format!("trace {}: self-intersection at {}", trace, at),
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub trait DrcCheck: Send + Sync {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn check(&self, board: &Board) -> Vec<Diagnostic>;
}

pub struct PlacementCheck;

impl DrcCheck for PlacementCheck {
    fn id(&self) -> &str {
        "placement"
    }

    fn name(&self) -> &str {
        "Component placement"
    }

    fn description(&self) -> &str {
        "Pins must lie inside the grid and no two pins may share a hole"
    }

    fn check(&self, board: &Board) -> Vec<Diagnostic> {
        check_placement(&board.grid, board.components())
    }
}

pub struct JumperCheck;

impl DrcCheck for JumperCheck {
    fn id(&self) -> &str {
        "jumpers"
    }

    fn name(&self) -> &str {
        "Jumper bounds"
    }

    fn description(&self) -> &str {
        "Both jumper endpoints must lie inside the grid"
    }

    fn check(&self, board: &Board) -> Vec<Diagnostic> {
        check_jumpers(&board.grid, board.jumpers())
    }
}

pub struct TraceCheck;

impl DrcCheck for TraceCheck {
    fn id(&self) -> &str {
        "traces"
    }

    fn name(&self) -> &str {
        "Trace geometry"
    }

    fn description(&self) -> &str {
        "Traces need 2+ points, orthogonal non-empty segments, stay on the grid and never cross themselves"
    }

    fn check(&self, board: &Board) -> Vec<Diagnostic> {
        check_traces(&board.grid, board.traces())
    }
}

pub struct DrcEngine {
    checks: Vec<Arc<dyn DrcCheck>>,
}

impl DrcEngine {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with_default_checks() -> Self {
        let mut engine = Self::new();
        engine.add_check(Arc::new(PlacementCheck));
        engine.add_check(Arc::new(JumperCheck));
        engine.add_check(Arc::new(TraceCheck));
        engine
    }

    pub fn add_check(&mut self, check: Arc<dyn DrcCheck>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Arc<dyn DrcCheck>] {
        &self.checks
    }

    pub fn run(&self, board: &Board) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for check in &self.checks {
            let found = check.check(board);
            tracing::debug!("check '{}' reported {} diagnostics", check.id(), found.len());
            diagnostics.extend(found);
        }
        diagnostics
    }

    /// Run only the named checks, in registration order. An empty selection runs all.
    pub fn run_selected(
        &self,
        board: &Board,
        selected: &[String],
    ) -> Result<Vec<Diagnostic>, ProtoboardError> {
        if selected.is_empty() {
            return Ok(self.run(board));
        }
        if let Some(unknown) = selected
            .iter()
            .find(|id| !self.checks.iter().any(|c| c.id() == id.as_str()))
        {
            return Err(ProtoboardError::InvalidArgument(format!(
                "unknown check '{}'",
                unknown
            )));
        }

        let mut diagnostics = Vec::new();
        for check in &self.checks {
            if selected.iter().any(|id| id == check.id()) {
                diagnostics.extend(check.check(board));
            }
        }
        Ok(diagnostics)
    }
}

impl Default for DrcEngine {
    fn default() -> Self {
        Self::with_default_checks()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{ComponentInstance, Jumper, Trace};
    use crate::footprint::{Footprint, Pin};
    use crate::grid::Grid;

    fn messy_board() -> Board {
        let fp = Arc::new(Footprint::new("P", vec![Pin::new("1", Coord::ORIGIN)]));
        let mut board = Board::new(Grid::new(4, 4).unwrap());
        board
            .add_component(ComponentInstance::new("U1", Arc::clone(&fp), Coord::new(9, 9)))
            .unwrap();
        board
            .add_jumper(Jumper::new("J1", "N", Coord::new(0, 0), Coord::new(-1, 0)).unwrap())
            .unwrap();
        board
            .add_trace(Trace::new("T1", "N", vec![Coord::new(0, 0)]))
            .unwrap();
        board
    }

    #[test]
    fn test_engine_runs_checks_in_order() {
        let diags = DrcEngine::with_default_checks().run(&messy_board());
        let kinds: Vec<DiagnosticKind> = diags.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::PinOutOfBounds,
                DiagnosticKind::JumperOutOfBounds,
                DiagnosticKind::TraceTooShort,
            ]
        );
    }

    #[test]
    fn test_run_selected() {
        let engine = DrcEngine::default();
        let board = messy_board();
        let diags = engine
            .run_selected(&board, &["traces".to_string()])
            .unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].kind, DiagnosticKind::TraceTooShort);

        assert_eq!(engine.run_selected(&board, &[]).unwrap().len(), 3);
        assert!(engine
            .run_selected(&board, &["nets".to_string()])
            .is_err());
    }

    #[test]
    fn test_rerun_is_identical() {
        let engine = DrcEngine::default();
        let board = messy_board();
        assert_eq!(engine.run(&board), engine.run(&board));
    }

    #[test]
    fn test_severity_mapping() {
        assert_eq!(DiagnosticKind::DuplicatePoint.severity(), Severity::Warning);
        assert_eq!(DiagnosticKind::SelfIntersection.severity(), Severity::Error);
        let d = Diagnostic::duplicate_point("T1", Coord::new(1, 1));
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.to_string(), "trace T1: duplicate consecutive point at (1, 1)");
    }

    #[test]
    fn test_diagnostic_serializes_kind_and_coord() {
        let d = Diagnostic::pin_conflict("R2", "R1", Coord::new(3, 4));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "pin_conflict");
        assert_eq!(json["coord"], serde_json::json!([3, 4]));
        assert_eq!(json["related"], "R1");
        assert_eq!(json["message"], "conflict at (3, 4): R2 overlaps R1");
    }

    #[test]
    fn test_custom_diagnostic_keeps_its_own_kind() {
        let d = Diagnostic::custom("TP1", Severity::Warning, Some(Coord::new(0, 4)), "too close");
        assert_eq!(d.kind, DiagnosticKind::Custom);
        assert_eq!(d.severity, Severity::Warning);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "custom");
        assert!(crate::render::highlighted_cells(&[d]).is_empty());
    }
}
