//! Shortest paths on occupancy grids with Lee's wave expansion.
//!
//! A [`PathFinder`] floods the grid breadth first from the source, recording
//! for every reached cell its distance and the cell it was reached from. The
//! [`backtrace`] module turns those records into a path and [`PathSolver`]
//! ties both together and marks the path on the grid.
//!
//! ```
//! use leepath::{solve, GridMap, Point};
//!
//! let mut grid: GridMap = "
//!     ...
//!     .#.
//!     ...
//! "
//! .parse()
//! .unwrap();
//!
//! let solution = solve(&mut grid, Point::new(0, 0), Point::new(2, 2)).unwrap();
//! assert_eq!(solution.distance(), 4);
//! assert_eq!(grid.to_string(), "ooo\n.#o\n..o\n");
//! ```

pub mod backtrace;
pub mod config;
pub mod error;
pub mod find;
pub mod grid;
pub mod solve;
pub mod util;

pub use backtrace::{mark_path, Strategy};
pub use error::{GridError, InvalidReason, SolveError};
pub use find::{
    shortest_distance, Expansion, MapTrait, PathFinder, SearchState, Visited, VisitedItem,
    UNREACHABLE,
};
pub use grid::{Cell, CellStorage, Direction, GridMap, Point};
pub use solve::{solve, PathResult, PathSolver, Solution};
pub use util::parse_img;
