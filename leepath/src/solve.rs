use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    backtrace::{mark_path, trace, Strategy},
    error::SolveError,
    find::{MapTrait, PathFinder, SearchState, UNREACHABLE},
    grid::{GridMap, Point},
};

#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Every cell from start to goal, both included
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    /// Number of steps, one less than the number of cells in `path`
    pub total_cost: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Solution {
    Found(PathResult),
    /// Start and goal lie in disconnected regions
    Unreachable,
}

impl Solution {
    /// Path length in steps, [`UNREACHABLE`] if there is none
    pub fn distance(&self) -> usize {
        match self {
            Solution::Found(result) => result.total_cost,
            Solution::Unreachable => UNREACHABLE,
        }
    }

    pub fn path(&self) -> Option<&[Point]> {
        match self {
            Solution::Found(result) => Some(&result.path),
            Solution::Unreachable => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Solution::Found(_))
    }
}

/// Runs the wave expansion and backtrace for one start/goal pair
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSolver {
    strategy: Strategy,
}

impl PathSolver {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Find a shortest path and mark it on `grid`. The grid is left untouched
    /// unless a path is found.
    pub fn solve(
        &self,
        grid: &mut GridMap,
        start: Point,
        goal: Point,
    ) -> Result<Solution, SolveError> {
        let result = self.find(&*grid, start, goal)?;

        if let Solution::Found(result) = &result {
            let marked = mark_path(grid, &result.path)?;
            debug!("marked {} new path cells", marked);
        }

        Ok(result)
    }

    /// Like [`PathSolver::solve`] but without touching the grid
    pub fn find<M: MapTrait>(
        &self,
        map: &M,
        start: Point,
        goal: Point,
    ) -> Result<Solution, SolveError> {
        map.check_open(start)?;
        map.check_open(goal)?;

        // the monotone walk needs every distance around the goal, so let the wave run out
        let target = match self.strategy {
            Strategy::Predecessor => Some(goal),
            Strategy::Monotone => None,
        };

        let expansion = PathFinder::new(map, start, target)?.finish();

        let Some(total_cost) = expansion.distance_to(goal) else {
            info!("no path from {} to {} ({:?})", start, goal, expansion.state());
            return Ok(Solution::Unreachable);
        };
        if let SearchState::Reached(cost) = expansion.state() {
            debug_assert_eq!(cost, total_cost);
        }

        let path = trace(map, &expansion, goal, self.strategy)?;
        if path.len() != total_cost + 1 {
            return Err(SolveError::PathReconstruction {
                at: goal,
                steps: path.len().saturating_sub(1),
            });
        }

        info!("path from {} to {} is {} steps long", start, goal, total_cost);
        Ok(Solution::Found(PathResult {
            path,
            start,
            goal,
            total_cost,
        }))
    }
}

/// Solve with the default predecessor backtrace
pub fn solve(grid: &mut GridMap, start: Point, goal: Point) -> Result<Solution, SolveError> {
    PathSolver::default().solve(grid, start, goal)
}
