use std::fmt::Display;

use crate::grid::Point;

/// Why a coordinate was rejected as a source, target or path cell
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InvalidReason {
    OutOfBounds,
    Blocked,
}

impl Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                InvalidReason::OutOfBounds => "out of bounds",
                InvalidReason::Blocked => "blocked",
            }
        )
    }
}

/// Failures of a solve. Not finding a path is not one of them, see
/// [`crate::Solution::Unreachable`].
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The caller passed a coordinate that cannot take part in a path.
    #[error("invalid input: cell {point} is {reason}")]
    InvalidInput { point: Point, reason: InvalidReason },

    /// The visit records do not lead back to the source. This is a bug in the
    /// expansion or backtrace, never a property of the grid.
    #[error("path reconstruction failed at {at} after {steps} steps")]
    PathReconstruction { at: Point, steps: usize },
}

/// Failures while building a grid from raw cells or text.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid is empty")]
    Empty,

    #[error("expected {expected} cells for the grid size but got {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}
