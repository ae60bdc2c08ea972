use crate::Cell;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell {0} is out of bounds")]
    OutOfBounds(Cell),
    #[error("Too many mines ({mines}) for board size {height}x{width}")]
    TooManyMines {
        height: usize,
        width: usize,
        mines: usize,
    },
    #[error("Board must have at least one row and one column")]
    EmptyGrid,
    #[error("Cannot make a move in current game state")]
    InvalidGameState,
    #[error("Cell {0} is already revealed")]
    AlreadyRevealed(Cell),
}
