//! Display coordinates for flat board indices.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 1-indexed (row, column) pair for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    /// Row, starting at 1.
    pub row: usize,
    /// Column, starting at 1.
    pub col: usize,
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Maps a flat cell index on a board of width `width` to its display coordinate.
///
/// Row-major: `p = 5, w = 4` is `(2, 2)`.
pub fn position_name(position: usize, width: usize) -> CellCoord {
    let width = width.max(1);
    CellCoord {
        row: position / width + 1,
        col: position % width + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_name_row_major() {
        assert_eq!(position_name(5, 4), CellCoord { row: 2, col: 2 });
        assert_eq!(position_name(0, 3), CellCoord { row: 1, col: 1 });
        assert_eq!(position_name(8, 3), CellCoord { row: 3, col: 3 });
        assert_eq!(position_name(9, 10), CellCoord { row: 1, col: 10 });
    }

    #[test]
    fn test_coord_display() {
        assert_eq!(position_name(5, 4).to_string(), "(2, 2)");
    }
}
