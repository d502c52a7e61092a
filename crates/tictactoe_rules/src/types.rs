//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};

use crate::position::Coord;

/// Mark placed by a player.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum Mark {
    /// Player 1's mark (moves first).
    X,
    /// Player 2's mark.
    O,
}

impl Mark {
    /// Returns the other mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    /// Mark for the placement with the given 0-based index.
    pub fn for_placement(index: usize) -> Self {
        if index % 2 == 0 { Mark::X } else { Mark::O }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nothing placed, or cleared.
    #[default]
    Empty,
    /// Cell holds a mark.
    Occupied(Mark),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(mark) => Some(mark),
        }
    }

    /// Symbol used when rendering: `"X"`, `"O"` or `""`.
    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Occupied(mark) => mark.into(),
        }
    }
}

/// 3x3 board plus the set of positions cleared in Endless mode.
///
/// A cleared position reads as [`Cell::Empty`] and is ignored by the win
/// rules until a mark is placed there again.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order.
    cells: [Cell; 9],
    /// Bit `i` set when cell `i` was cleared.
    cleared: u16,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell at `coord`, treating cleared positions as empty.
    pub fn get(&self, coord: Coord) -> Cell {
        if self.is_cleared(coord) {
            Cell::Empty
        } else {
            self.cells[coord.index()]
        }
    }

    /// Whether `coord` holds no mark.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord) == Cell::Empty
    }

    /// Whether `coord` is in the cleared-position set.
    pub fn is_cleared(&self, coord: Coord) -> bool {
        self.cleared & (1 << coord.index()) != 0
    }

    /// Places `mark` at `coord`. Re-occupying a cleared position removes it
    /// from the cleared set.
    pub(crate) fn place(&mut self, coord: Coord, mark: Mark) {
        self.cells[coord.index()] = Cell::Occupied(mark);
        self.cleared &= !(1 << coord.index());
    }

    /// Empties `coord` and records it as cleared.
    pub(crate) fn clear(&mut self, coord: Coord) {
        self.cells[coord.index()] = Cell::Empty;
        self.cleared |= 1 << coord.index();
    }

    /// Coordinates that currently hold a mark.
    pub fn occupied(&self) -> Vec<Coord> {
        Coord::ALL
            .into_iter()
            .filter(|coord| !self.is_empty(*coord))
            .collect()
    }

    /// Formats the board as a human-readable grid, numbering empty cells.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let coord = Coord::ALL[row * 3 + col];
                match self.get(coord) {
                    Cell::Empty => result.push_str(&(coord.index() + 1).to_string()),
                    Cell::Occupied(mark) => result.push_str(<&str>::from(mark)),
                }
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
