//! Move log and its `row,col,SYMBOL;...` text encoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{Coord, Mark, MoveLogError};

const CLEAR_TOKEN: &str = "CLEAR";

/// One entry in the move log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRecord {
    /// A mark was placed.
    Place {
        /// Target cell.
        coord: Coord,
        /// Mark placed.
        mark: Mark,
    },
    /// A cell was cleared (Endless mode).
    Clear {
        /// Cleared cell.
        coord: Coord,
    },
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveRecord::Place { coord, mark } => {
                write!(f, "{},{},{}", coord.row(), coord.col(), mark)
            }
            MoveRecord::Clear { coord } => {
                write!(f, "{},{},{}", coord.row(), coord.col(), CLEAR_TOKEN)
            }
        }
    }
}

impl FromStr for MoveRecord {
    type Err = MoveLogError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');
        let (Some(row), Some(col), Some(kind), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MoveLogError::new(format!(
                "Expected 'row,col,SYMBOL' but got '{}'",
                s
            )));
        };

        let row: usize = row
            .parse()
            .map_err(|_| MoveLogError::new(format!("Invalid row '{}' in '{}'", row, s)))?;
        let col: usize = col
            .parse()
            .map_err(|_| MoveLogError::new(format!("Invalid column '{}' in '{}'", col, s)))?;
        let coord = Coord::new(row, col)
            .ok_or_else(|| MoveLogError::new(format!("Coordinate out of range in '{}'", s)))?;

        if kind == CLEAR_TOKEN {
            return Ok(MoveRecord::Clear { coord });
        }

        let mark = Mark::from_str(kind)
            .map_err(|_| MoveLogError::new(format!("Invalid symbol '{}' in '{}'", kind, s)))?;
        Ok(MoveRecord::Place { coord, mark })
    }
}

/// Ordered placements and clears for one game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveLog {
    records: Vec<MoveRecord>,
}

impl MoveLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Records in order.
    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of records, placements and clears together.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of placement records.
    pub fn placements(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, MoveRecord::Place { .. }))
            .count()
    }
}

impl fmt::Display for MoveLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", record)?;
        }
        Ok(())
    }
}

impl FromStr for MoveLog {
    type Err = MoveLogError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::new());
        }
        let records = s
            .split(';')
            .map(MoveRecord::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { records })
    }
}

impl From<Vec<MoveRecord>> for MoveLog {
    fn from(records: Vec<MoveRecord>) -> Self {
        Self { records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, col: usize) -> Coord {
        Coord::new(row, col).unwrap()
    }

    #[test]
    fn test_encoding_matches_stored_format() {
        let log = MoveLog::from(vec![
            MoveRecord::Place { coord: at(0, 0), mark: Mark::X },
            MoveRecord::Place { coord: at(1, 1), mark: Mark::O },
            MoveRecord::Clear { coord: at(0, 0) },
        ]);
        assert_eq!(log.to_string(), "0,0,X;1,1,O;0,0,CLEAR");
    }

    #[test]
    fn test_parse_preserves_order_and_kinds() {
        let text = "2,2,X;0,1,O;2,2,CLEAR;2,2,X";
        let log: MoveLog = text.parse().unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(log.placements(), 3);
        assert_eq!(log.records()[2], MoveRecord::Clear { coord: at(2, 2) });
        assert_eq!(log.to_string(), text);
    }

    #[test]
    fn test_empty_string_is_empty_log() {
        let log: MoveLog = "".parse().unwrap();
        assert!(log.is_empty());
        assert_eq!(log.to_string(), "");
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert!("0,0".parse::<MoveLog>().is_err());
        assert!("0,0,X,1".parse::<MoveLog>().is_err());
        assert!("3,0,X".parse::<MoveLog>().is_err());
        assert!("0,0,Z".parse::<MoveLog>().is_err());
        assert!("a,0,X".parse::<MoveLog>().is_err());
        assert!("0,0,X;".parse::<MoveLog>().is_err());
    }
}
