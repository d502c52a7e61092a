//! Board coordinates and the eight winning lines.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A validated `(row, col)` pair on the 3x3 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    row: u8,
    col: u8,
}

/// Three coordinates forming a row, column or diagonal.
pub type Line = [Coord; 3];

impl Coord {
    /// Centre of the board.
    pub const CENTER: Coord = Coord { row: 1, col: 1 };

    /// All nine coordinates in row-major order.
    pub const ALL: [Coord; 9] = [
        Coord { row: 0, col: 0 },
        Coord { row: 0, col: 1 },
        Coord { row: 0, col: 2 },
        Coord { row: 1, col: 0 },
        Coord { row: 1, col: 1 },
        Coord { row: 1, col: 2 },
        Coord { row: 2, col: 0 },
        Coord { row: 2, col: 1 },
        Coord { row: 2, col: 2 },
    ];

    /// Winning lines in check order: rows 0-2, columns 0-2, main diagonal,
    /// anti-diagonal.
    pub const LINES: [Line; 8] = [
        [Self::ALL[0], Self::ALL[1], Self::ALL[2]],
        [Self::ALL[3], Self::ALL[4], Self::ALL[5]],
        [Self::ALL[6], Self::ALL[7], Self::ALL[8]],
        [Self::ALL[0], Self::ALL[3], Self::ALL[6]],
        [Self::ALL[1], Self::ALL[4], Self::ALL[7]],
        [Self::ALL[2], Self::ALL[5], Self::ALL[8]],
        [Self::ALL[0], Self::ALL[4], Self::ALL[8]],
        [Self::ALL[2], Self::ALL[4], Self::ALL[6]],
    ];

    /// Returns the coordinate, or `None` when either part is outside `0..3`.
    #[instrument]
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < 3 && col < 3).then(|| Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Row index (0-2).
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Column index (0-2).
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Row-major board index (0-8).
    pub fn index(self) -> usize {
        self.row() * 3 + self.col()
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
