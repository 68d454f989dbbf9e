use std::{
    collections::VecDeque,
    fmt::Display,
    ops::{Deref, DerefMut},
};

use log::debug;

use crate::{
    error::{InvalidReason, SolveError},
    grid::{CellStorage, Point},
};

/// Distance reported for a target that cannot be reached from the source
pub const UNREACHABLE: usize = usize::MAX;

/// What the wave expansion needs to know about a map
pub trait MapTrait {
    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    /// Check if the provided node is inside the map
    fn is_valid(&self, node: Point) -> bool {
        node.row < self.rows() && node.col < self.columns()
    }

    /// Check if the provided node is inside the map and can be walked on
    fn is_open(&self, node: Point) -> bool;

    /// Return the open neighbors of the provided node, in [`crate::Direction::ALL`] order
    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = Point>;

    /// Create a storage for values of type T, one per cell
    fn create_storage<T: Default + Clone>(&self) -> CellStorage<T> {
        CellStorage::new(self.rows(), self.columns())
    }

    /// Ok if `node` can be used as a path end point
    fn check_open(&self, node: Point) -> Result<(), SolveError> {
        if !self.is_valid(node) {
            return Err(SolveError::InvalidInput {
                point: node,
                reason: InvalidReason::OutOfBounds,
            });
        }
        if !self.is_open(node) {
            return Err(SolveError::InvalidInput {
                point: node,
                reason: InvalidReason::Blocked,
            });
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitedItem {
    /// Number of steps from the source
    pub cost: usize,
    /// The cell this one was first reached from, `None` only for the source
    pub from: Option<Point>,
}

/// Visit record of a single cell, `None` until the wave reaches it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Visited(Option<VisitedItem>);

impl Deref for Visited {
    type Target = Option<VisitedItem>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl DerefMut for Visited {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl Display for Visited {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) => write!(f, "{:>3} ", item.cost),
            None => write!(f, "{:>3} ", "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Expanding,
    /// The goal was dequeued at this distance
    Reached(usize),
    /// The frontier ran empty (or the step cap was hit) without dequeuing the goal
    Exhausted,
}

impl SearchState {
    pub fn is_done(&self) -> bool {
        !matches!(self, SearchState::Expanding)
    }
}

/// Breadth-first wave expansion from a single source.
///
/// Cells are marked visited when they are enqueued. Because the frontier is
/// FIFO, every cell at distance `d` leaves the queue before any cell at
/// `d + 1`, so the first distance written for a cell is its shortest one.
#[derive(Debug)]
pub struct PathFinder<'m, M: MapTrait> {
    map: &'m M,
    start: Point,
    goal: Option<Point>,
    visited: CellStorage<Visited>,
    visit_list: VecDeque<(Point, usize)>,
    steps: usize,
    max_steps: usize,
    state: SearchState,
}

impl<'m, M: MapTrait> PathFinder<'m, M> {
    /// Prepare an expansion from `start`. Without a `goal` the whole
    /// reachable region is explored.
    pub fn new(map: &'m M, start: Point, goal: Option<Point>) -> Result<Self, SolveError> {
        map.check_open(start)?;

        let mut visited: CellStorage<Visited> = map.create_storage();
        if let Some(record) = visited.get_mut(start) {
            *record = Visited(Some(VisitedItem {
                cost: 0,
                from: None,
            }));
        }

        Ok(Self {
            map,
            start,
            goal,
            visited,
            visit_list: VecDeque::from([(start, 0)]),
            steps: 0,
            max_steps: map.rows() * map.columns(),
            state: SearchState::Expanding,
        })
    }

    /// Run the expansion to the end
    pub fn finish(mut self) -> Expansion {
        while !self.step().is_done() {}

        debug!(
            "wave from {} finished after {} steps: {:?}",
            self.start, self.steps, self.state
        );

        Expansion {
            start: self.start,
            goal: self.goal,
            visited: self.visited,
            state: self.state,
        }
    }

    /// Dequeue and expand a single cell
    pub fn step(&mut self) -> SearchState {
        if self.state.is_done() {
            return self.state;
        }
        let Some((point, cost)) = self.visit_list.pop_front() else {
            self.state = SearchState::Exhausted;
            return self.state;
        };
        // every open cell is dequeued at most once
        if self.steps >= self.max_steps {
            debug!("wave from {} hit the step cap of {}", self.start, self.max_steps);
            self.state = SearchState::Exhausted;
            return self.state;
        }
        self.steps += 1;

        if Some(point) == self.goal {
            self.state = SearchState::Reached(cost);
            return self.state;
        }

        let map = self.map;
        for next in map.neighbors_of(point) {
            let Some(record) = self.visited.get_mut(next) else {
                continue;
            };
            if record.is_some() {
                continue;
            }

            *record = Visited(Some(VisitedItem {
                cost: cost + 1,
                from: Some(point),
            }));
            self.visit_list.push_back((next, cost + 1));
        }

        self.state
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Cells discovered but not yet expanded, in the order they will be expanded
    pub fn frontier(&self) -> impl Iterator<Item = &(Point, usize)> {
        self.visit_list.iter()
    }

    pub fn get_visited(&self) -> &CellStorage<Visited> {
        &self.visited
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }
}

/// The visit records left behind by a finished [`PathFinder`]
#[derive(Debug, Clone)]
pub struct Expansion {
    start: Point,
    goal: Option<Point>,
    visited: CellStorage<Visited>,
    state: SearchState,
}

impl Expansion {
    /// Hand-made visit records, lets tests feed broken predecessor chains
    #[cfg(test)]
    pub(crate) fn from_records<M: MapTrait>(
        map: &M,
        start: Point,
        records: &[(Point, VisitedItem)],
    ) -> Self {
        let mut visited: CellStorage<Visited> = map.create_storage();
        for &(node, item) in records {
            if let Some(record) = visited.get_mut(node) {
                *record = Visited(Some(item));
            }
        }

        Self {
            start,
            goal: None,
            visited,
            state: SearchState::Exhausted,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn goal(&self) -> Option<Point> {
        self.goal
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn visit(&self, node: Point) -> Option<VisitedItem> {
        self.visited.get(node).and_then(|record| **record)
    }

    pub fn is_reached(&self, node: Point) -> bool {
        self.visit(node).is_some()
    }

    pub fn distance_to(&self, node: Point) -> Option<usize> {
        self.visit(node).map(|item| item.cost)
    }

    pub fn predecessor_of(&self, node: Point) -> Option<Point> {
        self.visit(node).and_then(|item| item.from)
    }

    pub fn reached_count(&self) -> usize {
        self.visited.iter().filter(|(_, record)| record.is_some()).count()
    }

    pub fn get_visited(&self) -> &CellStorage<Visited> {
        &self.visited
    }
}

impl Display for Expansion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.visited)
    }
}

/// Length of the shortest path from `start` to `goal`, or [`UNREACHABLE`]
pub fn shortest_distance<M: MapTrait>(
    map: &M,
    start: Point,
    goal: Point,
) -> Result<usize, SolveError> {
    map.check_open(goal)?;

    match PathFinder::new(map, start, Some(goal))?.finish().state() {
        SearchState::Reached(cost) => Ok(cost),
        _ => Ok(UNREACHABLE),
    }
}
