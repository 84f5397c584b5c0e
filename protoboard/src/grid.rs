//! The hole grid a board is laid out on.

use serde::{Deserialize, Serialize};

use crate::core::ProtoboardError;
use crate::geometry::Coord;

/// Bounded rectangle of board holes, `width` columns by `height` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Result<Self, ProtoboardError> {
        if width <= 0 || height <= 0 {
            return Err(ProtoboardError::InvalidArgument(format!(
                "grid dimensions must be positive (got {}x{})",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn contains(&self, coord: Coord) -> bool {
        (0..self.width).contains(&coord.x) && (0..self.height).contains(&coord.y)
    }

    /// Every hole, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_edges() {
        let grid = Grid::new(10, 5).unwrap();
        assert!(grid.contains(Coord::new(0, 0)));
        assert!(grid.contains(Coord::new(9, 4)));
        assert!(!grid.contains(Coord::new(10, 0)));
        assert!(!grid.contains(Coord::new(0, 5)));
        assert!(!grid.contains(Coord::new(-1, 0)));
        assert!(!grid.contains(Coord::new(0, -1)));
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(Grid::new(0, 4).is_err());
        assert!(Grid::new(4, -1).is_err());
    }

    #[test]
    fn test_cells_row_major() {
        let grid = Grid::new(2, 2).unwrap();
        let cells: Vec<Coord> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(0, 1), Coord::new(1, 1)]
        );
    }
}
