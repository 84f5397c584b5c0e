//! Tests for board and footprint file loading

use protoboard::{load_board, load_footprints, open_board, BoundingBox, Color, Coord, Rotation};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_load_footprints() {
    let library = load_footprints(&fixture_path("footprints.json")).expect("Should parse");
    assert_eq!(library.len(), 4);

    let names: Vec<&str> = library.names().collect();
    assert!(names.contains(&"DIP8"));
    assert!(names.contains(&"HEADER_1X4"));

    let dip = library.get("DIP8").unwrap();
    let pin_names: Vec<&str> = dip.pins().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(pin_names, vec!["1", "2", "3", "4", "5", "6", "7", "8"]);
    assert_eq!(dip.pins()[7].offset, Coord::new(0, 3));
}

#[test]
fn test_load_footprints_nonexistent() {
    let result = load_footprints(&PathBuf::from("not_a_real_file.json"));
    assert!(result.is_err(), "Should fail on nonexistent file");
}

#[test]
fn test_load_valid_board() {
    let library = load_footprints(&fixture_path("footprints.json")).unwrap();
    let document = load_board(&fixture_path("valid_board.json"), &library).expect("Should parse");
    let board = &document.board;

    assert_eq!(board.grid.width, 20);
    assert_eq!(board.grid.height, 12);
    assert_eq!(board.components().len(), 4);
    assert_eq!(board.jumpers().len(), 2);
    assert_eq!(board.traces().len(), 1);

    let u1 = board.component("U1").unwrap();
    assert_eq!(u1.bbox, Some(BoundingBox::new(-1, -1, 4, 4)));
    assert_eq!(u1.bounding_box(), Some(BoundingBox::new(1, 1, 6, 6)));

    let led = board.component("LED1").unwrap();
    assert_eq!(led.rotation, Rotation::Deg90);
    assert_eq!(led.placed_pins(), vec![Coord::new(14, 4), Coord::new(14, 5)]);

    assert_eq!(board.jumpers()[0].color, Some(Color::rgb(0xff, 0x80, 0x40)));
    assert_eq!(board.jumpers()[1].color, None);
}

#[test]
fn test_components_share_footprints() {
    let document = open_board(
        &fixture_path("conflict_board.json"),
        &fixture_path("footprints.json"),
    )
    .unwrap();
    let r1 = document.board.component("R1").unwrap();
    let r2 = document.board.component("R2").unwrap();
    assert!(std::sync::Arc::ptr_eq(r1.footprint(), r2.footprint()));
}

#[test]
fn test_load_board_missing_grid() {
    let library = load_footprints(&fixture_path("footprints.json")).unwrap();
    let result = load_board(&fixture_path("missing_grid_board.json"), &library);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("grid"));
}
