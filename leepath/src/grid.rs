use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::{GridError, SolveError},
    find::MapTrait,
};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Blocked,
    Open,
    /// An open cell that lies on the solved path
    OnPath,
}

impl Cell {
    /// Both open and marked cells can be walked through
    pub fn is_passable(self) -> bool {
        !matches!(self, Cell::Blocked)
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '#' | 'X' => Some(Cell::Blocked),
            '.' => Some(Cell::Open),
            'o' | '*' => Some(Cell::OnPath),
            _ => None,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Cell::Blocked => "#",
                Cell::Open => ".",
                Cell::OnPath => "o",
            }
        )
    }
}

/// The four axis-aligned moves, see [`Direction::ALL`] for the order they are tried in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Right,
    Down,
}

impl Direction {
    /// Neighbor order used by the expansion and by the monotone backtrace.
    /// Among several shortest paths the one discovered first in this order wins.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Right,
        Direction::Down,
    ];
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Left => "left",
                Direction::Right => "right",
                Direction::Down => "down",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The cell one step away in `direction`, or `None` when that would go
    /// below row or column zero. The upper bounds are the grid's business.
    pub fn neighbor(self, direction: Direction) -> Option<Point> {
        match direction {
            Direction::Up => self.row.checked_sub(1).map(|row| Point { row, ..self }),
            Direction::Left => self.col.checked_sub(1).map(|col| Point { col, ..self }),
            Direction::Right => Some(Point {
                col: self.col + 1,
                ..self
            }),
            Direction::Down => Some(Point {
                row: self.row + 1,
                ..self
            }),
        }
    }

    pub fn is_adjacent(self, other: Point) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `ROW,COL`, e.g. `12,40`
impl FromStr for Point {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("Invalid point {:?}, expected ROW,COL", s))?;

        Ok(Point {
            row: row.trim().parse()?,
            col: col.trim().parse()?,
        })
    }
}

/// Per-cell values laid out like the grid they were created from (one flat
/// row-major vec)
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    columns: usize,
    values: Vec<T>,
}

impl<T: Default + Clone> CellStorage<T> {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            columns,
            values: vec![T::default(); rows * columns],
        }
    }
}

impl<T> CellStorage<T> {
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            0
        } else {
            self.values.len() / self.columns
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_valid(&self, node: Point) -> bool {
        node.col < self.columns && node.row < self.rows()
    }

    fn index(&self, node: Point) -> Option<usize> {
        self.is_valid(node)
            .then(|| node.row * self.columns + node.col)
    }

    pub fn get(&self, node: Point) -> Option<&T> {
        self.index(node).map(|i| &self.values[i])
    }

    pub fn get_mut(&mut self, node: Point) -> Option<&mut T> {
        let i = self.index(node)?;
        Some(&mut self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        let columns = self.columns;
        self.values
            .iter()
            .enumerate()
            .map(move |(i, v)| (Point::new(i / columns, i % columns), v))
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// A MapTrait implementation that uses a rectangular grid of cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGridMap")]
pub struct GridMap {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

/// Unchecked serialized form, goes through [`GridMap::from_cells`]
#[derive(Deserialize)]
struct RawGridMap {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawGridMap> for GridMap {
    type Error = GridError;

    fn try_from(raw: RawGridMap) -> Result<Self, Self::Error> {
        GridMap::from_cells(raw.rows, raw.columns, raw.cells)
    }
}

impl GridMap {
    /// A grid where every cell is open
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Open; rows * columns],
        }
    }

    /// Build a grid from row-major cells
    pub fn from_cells(rows: usize, columns: usize, cells: Vec<Cell>) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::Empty);
        }
        if cells.len() != rows * columns {
            return Err(GridError::SizeMismatch {
                expected: rows * columns,
                found: cells.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn index(&self, node: Point) -> Option<usize> {
        (node.row < self.rows && node.col < self.columns)
            .then(|| node.row * self.columns + node.col)
    }

    pub fn get(&self, node: Point) -> Option<Cell> {
        self.index(node).map(|i| self.cells[i])
    }

    /// Overwrite a cell, returning what was there before (`None` if out of bounds)
    pub fn set(&mut self, node: Point, cell: Cell) -> Option<Cell> {
        let i = self.index(node)?;
        Some(std::mem::replace(&mut self.cells[i], cell))
    }

    /// Mark a cell as part of the path. Returns whether the cell changed, so
    /// marking an already marked cell is a no-op.
    pub fn mark_on_path(&mut self, node: Point) -> Result<bool, SolveError> {
        self.check_open(node)?;

        let previous = self.set(node, Cell::OnPath);
        Ok(previous != Some(Cell::OnPath))
    }

    /// Turn every path cell back into an open cell, returning how many were cleared
    pub fn clear_path(&mut self) -> usize {
        let mut cleared = 0;
        for cell in self.cells.iter_mut().filter(|c| **c == Cell::OnPath) {
            *cell = Cell::Open;
            cleared += 1;
        }
        cleared
    }

    pub fn path_cells(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::OnPath).count()
    }

    pub fn open_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_passable()).count()
    }

    /// Scales the map by the given factor, i.e. to make it twice as large, pass 2.
    /// Interpolates the cells by repeating the existing cells in the new grid.
    pub fn scale_up(&mut self, factor: usize) {
        let columns = self.columns * factor;
        let mut new_cells = vec![Cell::default(); self.rows * factor * columns];

        for row in 0..self.rows * factor {
            for col in 0..columns {
                new_cells[row * columns + col] =
                    self.cells[(row / factor) * self.columns + col / factor];
            }
        }

        self.rows *= factor;
        self.columns = columns;
        self.cells = new_cells;
    }
}

impl MapTrait for GridMap {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn is_open(&self, node: Point) -> bool {
        self.get(node).is_some_and(Cell::is_passable)
    }

    fn neighbors_of(&self, node: Point) -> impl Iterator<Item = Point> {
        let from_open = self.is_open(node);

        Direction::ALL
            .map(|direction| {
                node.neighbor(direction)
                    .filter(|&n| from_open && self.is_open(n))
            })
            .into_iter()
            .flatten()
    }
}

impl Display for GridMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

/// Parses the same text [`Display`] produces. Whitespace around a row and
/// empty lines are skipped so grids can be written as indented raw strings in
/// tests. Whitespace inside a row is an unknown symbol.
impl FromStr for GridMap {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let columns = lines.first().map_or(0, |line| line.chars().count());
        let mut cells = Vec::with_capacity(lines.len() * columns);

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(GridError::RaggedRow {
                    row,
                    expected: columns,
                    found,
                });
            }

            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol)
                    .ok_or(GridError::UnknownSymbol { symbol, row, col })?;
                cells.push(cell);
            }
        }

        GridMap::from_cells(lines.len(), columns, cells)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::error::InvalidReason;

    fn create_basic_map() -> GridMap {
        "
        #######
        #.###.#
        #.###.#
        #.#...#
        #.#.###
        #......
        #######
        "
        .parse()
        .unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let map = create_basic_map();
        assert_eq!(map.rows(), 7);
        assert_eq!(map.columns(), 7);
        assert_eq!(map.get(Point::new(1, 1)), Some(Cell::Open));
        assert_eq!(map.get(Point::new(2, 2)), Some(Cell::Blocked));
        assert_eq!(map.get(Point::new(7, 0)), None);

        let reparsed: GridMap = map.to_string().parse().unwrap();
        assert_eq!(reparsed, map);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<GridMap>(), Err(GridError::Empty));
        assert_eq!(
            "...\n..".parse::<GridMap>(),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            "..\n.?".parse::<GridMap>(),
            Err(GridError::UnknownSymbol {
                symbol: '?',
                row: 1,
                col: 1
            })
        );
        assert!(matches!(
            GridMap::from_cells(2, 2, vec![Cell::Open; 3]),
            Err(GridError::SizeMismatch {
                expected: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_is_open() {
        let mut map = create_basic_map();
        assert!(map.is_open(Point::new(1, 1)));
        assert!(!map.is_open(Point::new(0, 0)));
        assert!(!map.is_open(Point::new(1, 7)));
        assert!(!map.is_open(Point::new(70, 1)));

        // marked cells stay walkable
        map.mark_on_path(Point::new(1, 1)).unwrap();
        assert!(map.is_open(Point::new(1, 1)));
    }

    #[test]
    fn test_neighbor_order() {
        let map = GridMap::new(3, 3);
        let neighbors: Vec<_> = map.neighbors_of(Point::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                Point::new(0, 1),
                Point::new(1, 0),
                Point::new(1, 2),
                Point::new(2, 1)
            ]
        );

        // corners lose the out of bounds moves but keep the order
        let neighbors: Vec<_> = map.neighbors_of(Point::new(0, 0)).collect();
        assert_eq!(neighbors, vec![Point::new(0, 1), Point::new(1, 0)]);
        let neighbors: Vec<_> = map.neighbors_of(Point::new(2, 2)).collect();
        assert_eq!(neighbors, vec![Point::new(1, 2), Point::new(2, 1)]);
    }

    #[test]
    fn test_neighbors_skip_blocked() {
        let map = create_basic_map();
        let neighbors: Vec<_> = map.neighbors_of(Point::new(3, 3)).collect();
        assert_eq!(neighbors, vec![Point::new(3, 4), Point::new(4, 3)]);

        // nothing leaves a wall
        assert_eq!(map.neighbors_of(Point::new(2, 2)).count(), 0);
    }

    #[test]
    fn test_mark_on_path() {
        let mut map = create_basic_map();

        assert_eq!(map.mark_on_path(Point::new(1, 1)), Ok(true));
        assert_eq!(map.mark_on_path(Point::new(1, 1)), Ok(false));
        assert_eq!(map.path_cells(), 1);

        assert_eq!(
            map.mark_on_path(Point::new(0, 0)),
            Err(SolveError::InvalidInput {
                point: Point::new(0, 0),
                reason: InvalidReason::Blocked
            })
        );
        assert_eq!(
            map.mark_on_path(Point::new(0, 9)),
            Err(SolveError::InvalidInput {
                point: Point::new(0, 9),
                reason: InvalidReason::OutOfBounds
            })
        );

        assert_eq!(map.clear_path(), 1);
        assert_eq!(map, create_basic_map());
    }

    #[test]
    fn test_scale_up() {
        let mut map: GridMap = "#.\n..".parse().unwrap();
        let open = map.open_cells();
        map.scale_up(3);

        assert_eq!(map.rows(), 6);
        assert_eq!(map.columns(), 6);
        assert_eq!(map.open_cells(), open * 9);
        assert_eq!(map.get(Point::new(2, 2)), Some(Cell::Blocked));
        assert_eq!(map.get(Point::new(2, 3)), Some(Cell::Open));
        assert_eq!(map.get(Point::new(3, 0)), Some(Cell::Open));
    }

    #[test]
    fn test_point_parse() {
        assert_eq!("3,4".parse::<Point>().unwrap(), Point::new(3, 4));
        assert_eq!(" 12 , 0 ".parse::<Point>().unwrap(), Point::new(12, 0));
        assert!("3".parse::<Point>().is_err());
        assert!("-1,2".parse::<Point>().is_err());
    }

    #[test]
    fn test_parse_open_edges() {
        let map: GridMap = "  ..#.\n\t.#..  \r\n".parse().unwrap();
        assert_eq!((map.rows(), map.columns()), (2, 4));
        assert_eq!(map.get(Point::new(0, 0)), Some(Cell::Open));
        assert_eq!(map.get(Point::new(0, 3)), Some(Cell::Open));
        assert_eq!(map.get(Point::new(1, 0)), Some(Cell::Open));
        assert_eq!(map.get(Point::new(1, 3)), Some(Cell::Open));

        assert_eq!(
            ".. .\n....".parse::<GridMap>(),
            Err(GridError::UnknownSymbol {
                symbol: ' ',
                row: 0,
                col: 2
            })
        );
        assert_eq!(
            " .#\n...".parse::<GridMap>(),
            Err(GridError::RaggedRow {
                row: 1,
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_deserialize_checks_size() {
        let map: GridMap =
            toml::from_str("rows = 1\ncolumns = 2\ncells = [\"Open\", \"Blocked\"]").unwrap();
        assert_eq!(map.get(Point::new(0, 1)), Some(Cell::Blocked));

        assert!(toml::from_str::<GridMap>("rows = 3\ncolumns = 3\ncells = [\"Open\"]").is_err());
        assert!(toml::from_str::<GridMap>("rows = 0\ncolumns = 4\ncells = []").is_err());
    }

    #[test]
    fn test_direction_display() {
        let names: Vec<String> = Direction::ALL.iter().map(|d| d.to_string()).collect();
        assert_eq!(names, ["up", "left", "right", "down"]);
    }
}
