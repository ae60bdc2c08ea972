use crate::{Cell, GameError, Grid};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;

/// Ground truth the player queries: whether a cell is a mine, and how many
/// mines surround it.
pub trait Oracle {
    fn grid(&self) -> Grid;
    fn is_mine(&self, cell: Cell) -> bool;
    fn neighbor_mine_count(&self, cell: Cell) -> usize;
}

/// A board with hidden mines, plus the cells the player has flagged.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    mines: HashSet<Cell>,
    flagged: HashSet<Cell>,
}

impl Board {
    /// Places `mines_count` mines uniformly at random.
    pub fn new<R: Rng + ?Sized>(
        grid: Grid,
        mines_count: usize,
        rng: &mut R,
    ) -> Result<Self, GameError> {
        if mines_count >= grid.area() {
            return Err(GameError::TooManyMines {
                height: grid.height(),
                width: grid.width(),
                mines: mines_count,
            });
        }

        let mut mines = HashSet::with_capacity(mines_count);
        while mines.len() < mines_count {
            let row = rng.gen_range(0..grid.height());
            let col = rng.gen_range(0..grid.width());
            mines.insert(Cell::new(row, col));
        }

        Ok(Self {
            grid,
            mines,
            flagged: HashSet::new(),
        })
    }

    /// Builds a board with mines at exactly the given cells.
    pub fn with_mines(
        grid: Grid,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, GameError> {
        let mines = mines
            .into_iter()
            .map(|cell| grid.cell(cell.row, cell.col))
            .collect::<Result<HashSet<_>, _>>()?;
        if mines.len() >= grid.area() {
            return Err(GameError::TooManyMines {
                height: grid.height(),
                width: grid.width(),
                mines: mines.len(),
            });
        }

        Ok(Self {
            grid,
            mines,
            flagged: HashSet::new(),
        })
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn mines_count(&self) -> usize {
        self.mines.len()
    }

    /// Flags `cell` as a mine found by the player.
    pub fn flag(&mut self, cell: Cell) -> Result<(), GameError> {
        if !self.grid.contains(cell) {
            return Err(GameError::OutOfBounds(cell));
        }
        self.flagged.insert(cell);
        Ok(())
    }

    pub fn mines_found(&self) -> &HashSet<Cell> {
        &self.flagged
    }

    /// Whether the flagged cells are exactly the mines.
    pub fn won(&self) -> bool {
        self.flagged == self.mines
    }
}

impl Oracle for Board {
    fn grid(&self) -> Grid {
        self.grid
    }

    fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }

    fn neighbor_mine_count(&self, cell: Cell) -> usize {
        self.grid
            .neighbors(cell)
            .filter(|neighbor| self.mines.contains(neighbor))
            .count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "--".repeat(self.grid.width()) + "-";
        for row in 0..self.grid.height() {
            writeln!(f, "{separator}")?;
            for col in 0..self.grid.width() {
                let mark = if self.mines.contains(&Cell::new(row, col)) {
                    'X'
                } else {
                    ' '
                };
                write!(f, "|{mark}")?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{separator}")
    }
}
