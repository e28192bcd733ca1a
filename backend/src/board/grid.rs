//! Grid board
//!
//! Tracks 2-D passenger occupancy and answers path-clear queries. Row 0 is
//! the front edge; a grid passenger can walk out only if every cell in its
//! own column between it and the front edge is empty. Columns never
//! interact.
//!
//! # Critical Invariants
//!
//! 1. At most one occupant per cell
//! 2. `is_path_clear` is pure: repeated calls on an unchanged board return
//!    the same result

use thiserror::Error;

/// Grid occupancy errors (caller misuse, not gameplay rejections)
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("cell ({row}, {col}) is out of bounds for a {width}x{height} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },
}

/// 2-D occupancy board holding passenger IDs
///
/// # Example
/// ```
/// use busjam_core_rs::GridBoard;
///
/// let mut grid = GridBoard::new(2, 2);
/// grid.place("p1".to_string(), 0, 0).unwrap();
/// grid.place("p2".to_string(), 1, 0).unwrap();
///
/// // p2 is behind p1 in column 0
/// assert!(!grid.is_path_clear(1, 0));
/// grid.remove("p1");
/// assert!(grid.is_path_clear(1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct GridBoard {
    width: usize,
    height: usize,

    /// Row-major cells; index = row * width + col
    cells: Vec<Option<String>>,
}

impl GridBoard {
    /// Create an empty board; zero-area boards are valid and always clear
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Grid width (columns)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (rows)
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<(), GridError> {
        if row >= self.height || col >= self.width {
            return Err(GridError::OutOfBounds {
                row,
                col,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Place a passenger on an empty cell
    pub fn place(&mut self, passenger_id: String, row: usize, col: usize) -> Result<(), GridError> {
        self.check_bounds(row, col)?;
        let index = self.index(row, col);
        if self.cells[index].is_some() {
            return Err(GridError::CellOccupied { row, col });
        }
        self.cells[index] = Some(passenger_id);
        Ok(())
    }

    /// Remove a passenger by identity, returning the freed cell
    ///
    /// Returns `None` when the passenger is not on the board.
    pub fn remove(&mut self, passenger_id: &str) -> Option<(usize, usize)> {
        let position = self.position_of(passenger_id)?;
        let index = self.index(position.0, position.1);
        self.cells[index] = None;
        Some(position)
    }

    /// Get the occupant of a cell
    pub fn occupant(&self, row: usize, col: usize) -> Option<&str> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells[self.index(row, col)].as_deref()
    }

    /// Find a passenger's cell by identity
    pub fn position_of(&self, passenger_id: &str) -> Option<(usize, usize)> {
        self.cells
            .iter()
            .position(|cell| cell.as_deref() == Some(passenger_id))
            .map(|index| (index / self.width, index % self.width))
    }

    /// Check whether the passenger at (row, col) can reach the front edge
    ///
    /// Scans the same column for every row between `row` and the front edge;
    /// any occupied intervening cell blocks. Row 0 and out-of-range cells
    /// are always clear. Pure query, no mutation.
    pub fn is_path_clear(&self, row: usize, col: usize) -> bool {
        if row >= self.height || col >= self.width {
            return true;
        }
        (0..row).all(|r| self.cells[self.index(r, col)].is_none())
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Evict every occupant (level teardown)
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}
