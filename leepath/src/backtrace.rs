use std::{fmt::Display, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::SolveError,
    find::{Expansion, MapTrait},
    grid::{Direction, GridMap, Point},
};

/// How the path is recovered from the visit records
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Follow the `from` links from the goal back to the source
    #[default]
    Predecessor,
    /// Walk from the goal to any neighbor exactly one step closer to the
    /// source. Needs the distance map of a full expansion.
    Monotone,
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Strategy::Predecessor => "predecessor",
                Strategy::Monotone => "monotone",
            }
        )
    }
}

impl FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predecessor" => Ok(Strategy::Predecessor),
            "monotone" => Ok(Strategy::Monotone),
            _ => Err(anyhow::anyhow!("Invalid backtrace strategy: {}", s)),
        }
    }
}

/// Rebuild the path from the expansion's start to `goal` using `strategy`
pub fn trace<M: MapTrait>(
    map: &M,
    expansion: &Expansion,
    goal: Point,
    strategy: Strategy,
) -> Result<Vec<Point>, SolveError> {
    let path = match strategy {
        Strategy::Predecessor => trace_predecessors(map, expansion, goal)?,
        Strategy::Monotone => trace_monotone(map, expansion, goal)?,
    };

    debug!(
        "{} backtrace from {} recovered {} cells",
        strategy,
        goal,
        path.len()
    );
    Ok(path)
}

/// Follow the predecessor links from `goal` until the source is found
pub fn trace_predecessors<M: MapTrait>(
    map: &M,
    expansion: &Expansion,
    goal: Point,
) -> Result<Vec<Point>, SolveError> {
    // no simple path can be longer than the grid has cells
    let limit = map.rows() * map.columns();

    let mut path = vec![goal];
    let mut current = goal;

    loop {
        let Some(item) = expansion.visit(current) else {
            // backtracking lead to a point that was never visited
            return Err(SolveError::PathReconstruction {
                at: current,
                steps: path.len() - 1,
            });
        };

        match item.from {
            // only the source has no predecessor
            None => break,
            Some(from) => {
                if path.len() >= limit {
                    return Err(SolveError::PathReconstruction {
                        at: current,
                        steps: path.len() - 1,
                    });
                }
                path.push(from);
                current = from;
            }
        }
    }

    path.reverse();
    Ok(path)
}

/// Walk down the distance map from `goal`, taking the first neighbor in
/// [`Direction::ALL`] order that is exactly one step closer to the source
pub fn trace_monotone<M: MapTrait>(
    map: &M,
    expansion: &Expansion,
    goal: Point,
) -> Result<Vec<Point>, SolveError> {
    let Some(mut cost) = expansion.distance_to(goal) else {
        return Err(SolveError::PathReconstruction { at: goal, steps: 0 });
    };

    let mut path = Vec::with_capacity(cost + 1);
    path.push(goal);
    let mut current = goal;

    while cost > 0 {
        let next = Direction::ALL.into_iter().find_map(|direction| {
            current
                .neighbor(direction)
                .filter(|&n| map.is_open(n) && expansion.distance_to(n) == Some(cost - 1))
                .map(|n| (direction, n))
        });

        let Some((direction, next)) = next else {
            return Err(SolveError::PathReconstruction {
                at: current,
                steps: path.len() - 1,
            });
        };

        log::trace!("{} -> {} going {}", current, next, direction);
        path.push(next);
        current = next;
        cost -= 1;
    }

    if current != expansion.start() {
        return Err(SolveError::PathReconstruction {
            at: current,
            steps: path.len() - 1,
        });
    }

    path.reverse();
    Ok(path)
}

/// Mark every cell of `path` on the grid, returning how many cells changed.
/// Marking the same path again changes nothing.
/// Nothing is marked unless every cell is an open cell of the grid.
pub fn mark_path(grid: &mut GridMap, path: &[Point]) -> Result<usize, SolveError> {
    for &point in path {
        grid.check_open(point)?;
    }

    let mut changed = 0;
    for &point in path {
        if grid.mark_on_path(point)? {
            changed += 1;
        }
    }
    Ok(changed)
}
