//! Simple validation example: check a board file and print results.
//! Run with: cargo run --example simple_validation [board.json] [footprints.json]

use protoboard::prelude::*;
use std::path::{Path, PathBuf};

fn main() -> Result<(), ProtoboardError> {
    let board = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/conflict_board.json".to_string());
    let board = Path::new(&board);
    let footprints = std::env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| protoboard::default_footprints_path(board));

    if !board.exists() {
        eprintln!("File not found: {}", board.display());
        eprintln!("Usage: cargo run --example simple_validation [board.json] [footprints.json]");
        std::process::exit(1);
    }

    let result = ProtoboardCore::validate_board(board, &footprints, ValidationOptions::default())?;

    println!("Validation results for: {}", result.file.display());
    println!("Total diagnostics: {}", result.total_diagnostics());
    println!();

    for diagnostic in &result.diagnostics {
        println!("  [{:?}] {}", diagnostic.severity, diagnostic.message);
    }

    if result.has_errors() {
        println!("\nValidation failed.");
        std::process::exit(1);
    }

    println!("\nValidation passed.");
    Ok(())
}
