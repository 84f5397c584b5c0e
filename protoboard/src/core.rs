//! Core validation entry points shared by the CLI and library users.
//! No terminal or rendering dependencies.

use std::path::{Path, PathBuf};

use crate::drc::{Diagnostic, DrcEngine, Severity};
use crate::io::{load_board, load_footprints};

#[derive(Debug, thiserror::Error)]
pub enum ProtoboardError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },
    #[error("Unknown footprint '{0}'")]
    UnknownFootprint(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options for validation runs.
#[derive(Clone, Debug, Default)]
pub struct ValidationOptions {
    /// Check ids to run; empty runs every check.
    pub checks: Vec<String>,
}

/// Per-board validation result with diagnostics and counts.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: ValidationStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationStats {
    pub errors: usize,
    pub warnings: usize,
}

impl ValidationStats {
    pub fn from_diagnostics(diagnostics: &[Diagnostic]) -> Self {
        let mut stats = Self::default();
        for d in diagnostics {
            match d.severity {
                Severity::Error => stats.errors += 1,
                Severity::Warning => stats.warnings += 1,
            }
        }
        stats
    }
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.stats.errors > 0
    }

    pub fn has_warnings_or_errors(&self) -> bool {
        self.stats.errors > 0 || self.stats.warnings > 0
    }

    pub fn total_diagnostics(&self) -> usize {
        self.stats.errors + self.stats.warnings
    }
}

/// `footprints.json` next to the board file.
pub fn default_footprints_path(board_path: &Path) -> PathBuf {
    board_path.with_file_name("footprints.json")
}

pub struct ProtoboardCore;

impl ProtoboardCore {
    /// Load a board and its footprint library, then run the selected checks.
    pub fn validate_board(
        board_path: &Path,
        footprints_path: &Path,
        options: ValidationOptions,
    ) -> Result<ValidationResult, ProtoboardError> {
        let library = load_footprints(footprints_path)?;
        let document = load_board(board_path, &library)?;

        let engine = DrcEngine::with_default_checks();
        let diagnostics = engine.run_selected(&document.board, &options.checks)?;
        let stats = ValidationStats::from_diagnostics(&diagnostics);
        tracing::info!(
            "{}: {} errors, {} warnings",
            board_path.display(),
            stats.errors,
            stats.warnings
        );

        Ok(ValidationResult {
            file: board_path.to_path_buf(),
            diagnostics,
            stats,
        })
    }
}
