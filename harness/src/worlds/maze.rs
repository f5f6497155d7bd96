//! `GridMaze`: ASCII grid world with dynamic cell blocking.
//!
//! ```text
//! S . . #
//! # # . #
//! . . . G
//! ```
//!
//! Cells are `S` (start), `G` (goal), `.` (free), `#` (wall). Whitespace
//! between cells is ignored. Walls are static and never appear in any
//! transition. Free cells can be blocked and unblocked at run time with
//! [`GridMaze::set_blocked`]; a blocked cell keeps its transitions but every
//! transition touching it costs `f64::INFINITY`, so a driver can repair its
//! plan from the returned transition list.
//!
//! # Costs and heuristics
//!
//! | Connectivity | Step cost            | Heuristic        |
//! |--------------|----------------------|------------------|
//! | `Four`       | 1                    | Manhattan        |
//! | `Eight`      | 1 or `SQRT_2`        | octile distance  |
//!
//! Both heuristics are admissible and consistent for their step costs.
//! [`GridMaze::without_heuristic`] turns the search into uniform-cost search.

use std::collections::BTreeSet;
use std::fmt;

use adstar_kernel::transition::Transition;
use adstar_search::contract::SearchDomain;

/// A grid position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Move labels, ordered for deterministic enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    const ALL: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
            Direction::NorthWest => (-1, -1),
        }
    }

    fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthEast => Direction::NorthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
        }
    }

    fn is_diagonal(self) -> bool {
        !matches!(
            self,
            Direction::North | Direction::East | Direction::South | Direction::West
        )
    }
}

/// Neighbourhood used for moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    /// Orthogonal moves only.
    #[default]
    Four,
    /// Orthogonal plus diagonal moves.
    Eight,
}

impl Connectivity {
    fn directions(self) -> &'static [Direction] {
        match self {
            Connectivity::Four => &Direction::ORTHOGONAL,
            Connectivity::Eight => &Direction::ALL,
        }
    }
}

/// Error parsing a maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// No rows.
    Empty,
    /// A row's width differs from the first row's.
    Ragged {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// A character other than `S`, `G`, `.`, `#`.
    UnknownCell { row: usize, col: usize, found: char },
    /// `S` or `G` is missing.
    MissingMarker { marker: char },
    /// `S` or `G` appears more than once.
    DuplicateMarker { marker: char },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "maze has no rows"),
            Self::Ragged {
                row,
                expected,
                actual,
            } => write!(f, "row {row} has {actual} cells, expected {expected}"),
            Self::UnknownCell { row, col, found } => {
                write!(f, "unknown cell {found:?} at ({row}, {col})")
            }
            Self::MissingMarker { marker } => write!(f, "maze has no {marker:?} cell"),
            Self::DuplicateMarker { marker } => {
                write!(f, "maze has more than one {marker:?} cell")
            }
        }
    }
}

impl std::error::Error for MazeError {}

/// Transition type of the maze.
pub type MazeTransition = Transition<Cell, Direction>;

/// A rectangular maze.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMaze {
    /// Row-major; `true` is a wall.
    walls: Vec<Vec<bool>>,
    rows: usize,
    cols: usize,
    start: Cell,
    goal: Cell,
    blocked: BTreeSet<Cell>,
    connectivity: Connectivity,
    use_heuristic: bool,
}

impl GridMaze {
    /// Parse an ASCII maze.
    ///
    /// # Errors
    ///
    /// Returns [`MazeError`] if the grid is empty, ragged, contains an
    /// unknown character, or does not have exactly one `S` and one `G`.
    pub fn parse(text: &str, connectivity: Connectivity) -> Result<Self, MazeError> {
        let mut walls: Vec<Vec<bool>> = Vec::new();
        let mut start = None;
        let mut goal = None;
        for line in text.lines() {
            let row_index = walls.len();
            let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
            if cells.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(cells.len());
            for (col, ch) in cells.into_iter().enumerate() {
                let here = Cell::new(row_index, col);
                match ch {
                    '.' => row.push(false),
                    '#' => row.push(true),
                    'S' => {
                        if start.replace(here).is_some() {
                            return Err(MazeError::DuplicateMarker { marker: 'S' });
                        }
                        row.push(false);
                    }
                    'G' => {
                        if goal.replace(here).is_some() {
                            return Err(MazeError::DuplicateMarker { marker: 'G' });
                        }
                        row.push(false);
                    }
                    found => {
                        return Err(MazeError::UnknownCell {
                            row: row_index,
                            col,
                            found,
                        })
                    }
                }
            }
            if let Some(first) = walls.first() {
                let expected = first.len();
                if row.len() != expected {
                    return Err(MazeError::Ragged {
                        row: row_index,
                        expected,
                        actual: row.len(),
                    });
                }
            }
            walls.push(row);
        }

        let rows = walls.len();
        if rows == 0 {
            return Err(MazeError::Empty);
        }
        let cols = walls[0].len();
        Ok(Self {
            walls,
            rows,
            cols,
            start: start.ok_or(MazeError::MissingMarker { marker: 'S' })?,
            goal: goal.ok_or(MazeError::MissingMarker { marker: 'G' })?,
            blocked: BTreeSet::new(),
            connectivity,
            use_heuristic: true,
        })
    }

    /// Use a zero heuristic (uniform-cost behaviour).
    #[must_use]
    pub fn without_heuristic(mut self) -> Self {
        self.use_heuristic = false;
        self
    }

    #[must_use]
    pub fn start(&self) -> Cell {
        self.start
    }

    #[must_use]
    pub fn goal(&self) -> Cell {
        self.goal
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// `true` for in-bounds cells that are not walls.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols && !self.walls[cell.row][cell.col]
    }

    /// `true` if `cell` is currently blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked.contains(&cell)
    }

    /// Number of free cells (blocked ones included).
    #[must_use]
    pub fn free_cells(&self) -> usize {
        self.walls.iter().flatten().filter(|w| !**w).count()
    }

    /// Block or unblock a free cell.
    ///
    /// Returns every transition into and out of `cell` when its state
    /// actually changed, and nothing otherwise (walls included).
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) -> Vec<MazeTransition> {
        if !self.is_free(cell) {
            return Vec::new();
        }
        let changed = if blocked {
            self.blocked.insert(cell)
        } else {
            self.blocked.remove(&cell)
        };
        if !changed {
            return Vec::new();
        }
        let mut touched = self.moves_from(cell);
        touched.extend(self.moves_into(cell));
        touched
    }

    fn neighbour(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let col = cell.col.checked_add_signed(dc)?;
        let next = Cell::new(row, col);
        self.is_free(next).then_some(next)
    }

    fn moves_from(&self, cell: Cell) -> Vec<MazeTransition> {
        if !self.is_free(cell) {
            return Vec::new();
        }
        self.connectivity
            .directions()
            .iter()
            .filter_map(|&d| {
                self.neighbour(cell, d)
                    .map(|to| Transition::with_action(cell, to, d))
            })
            .collect()
    }

    fn moves_into(&self, cell: Cell) -> Vec<MazeTransition> {
        if !self.is_free(cell) {
            return Vec::new();
        }
        self.connectivity
            .directions()
            .iter()
            .filter_map(|&d| {
                self.neighbour(cell, d.opposite())
                    .map(|from| Transition::with_action(from, cell, d))
            })
            .collect()
    }

    /// Cost of a single move, ignoring blocking.
    fn step_cost(direction: Direction) -> f64 {
        if direction.is_diagonal() {
            std::f64::consts::SQRT_2
        } else {
            1.0
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn axis_distance(a: usize, b: usize) -> f64 {
    a.abs_diff(b) as f64
}

impl SearchDomain for GridMaze {
    type State = Cell;
    type Action = Direction;
    type Cost = f64;

    fn successors(&self, state: &Cell) -> Vec<MazeTransition> {
        self.moves_from(*state)
    }

    fn predecessors(&self, state: &Cell) -> Vec<MazeTransition> {
        self.moves_into(*state)
    }

    fn cost(&self, transition: &MazeTransition) -> f64 {
        let (Some(from), Some(direction)) = (transition.from, transition.action) else {
            return f64::INFINITY;
        };
        if self.is_blocked(from) || self.is_blocked(transition.to) {
            return f64::INFINITY;
        }
        Self::step_cost(direction)
    }

    fn heuristic(&self, state: &Cell) -> f64 {
        if !self.use_heuristic {
            return 0.0;
        }
        let dr = axis_distance(state.row, self.goal.row);
        let dc = axis_distance(state.col, self.goal.col);
        match self.connectivity {
            Connectivity::Four => dr + dc,
            Connectivity::Eight => {
                let (long, short) = if dr > dc { (dr, dc) } else { (dc, dr) };
                long - short + std::f64::consts::SQRT_2 * short
            }
        }
    }
}

/// A small catalogue of fixed mazes used by tests and benchmarks.
pub mod catalogue {
    /// Straight corridor of 12 cells.
    pub const CORRIDOR: &str = "S . . . . . . . . . . G";

    /// Winding single-solution corridor.
    pub const SERPENTINE: &str = "
        S . . . . . . #
        # # # # # # . #
        . . . . . . . #
        . # # # # # # #
        . . . . . . . G
    ";

    /// Open room with scattered obstacles and several optimal routes.
    pub const ROOM: &str = "
        S . . . . . . . . .
        . # # . . . # . . .
        . . # . # . # . # .
        . . # . # . . . # .
        . . . . # # # . # .
        # # . . . . # . . .
        . . . # . . # . # .
        . # . # . . . . # G
    ";

    /// Two corridors joined at the ends; the short one has a door cell
    /// at (0, 4) that tests block and unblock.
    pub const TWO_ROUTES: &str = "
        S . . . . . . . G
        . # # # # # # # .
        . # # # # # # # .
        . . . . . . . . .
    ";

    /// The goal is walled off.
    pub const SEALED: &str = "
        S . . # . .
        . . . # . G
        . . . # . .
    ";
}
