use crate::{Cell, GameError};

/// Fixed dimensions of a board, shared by the oracle and the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Result<Self, GameError> {
        if height == 0 || width == 0 {
            return Err(GameError::EmptyGrid);
        }
        Ok(Self { height, width })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn area(&self) -> usize {
        self.height * self.width
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    /// Builds a cell, rejecting coordinates outside the grid.
    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        let cell = Cell::new(row, col);
        if self.contains(cell) {
            Ok(cell)
        } else {
            Err(GameError::OutOfBounds(cell))
        }
    }

    /// The in-bounds cells adjacent to `cell`, diagonals included.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        (-1isize..=1).flat_map(move |dr| {
            (-1isize..=1).filter_map(move |dc| {
                if dr == 0 && dc == 0 {
                    return None;
                }
                let row = cell.row.checked_add_signed(dr)?;
                let col = cell.col.checked_add_signed(dc)?;
                let neighbor = Cell::new(row, col);
                self.contains(neighbor).then_some(neighbor)
            })
        })
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Cell::new(row, col)))
    }
}
