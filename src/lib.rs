pub mod agent;
pub mod board;
pub mod cell;
pub mod config;
pub mod error;
pub mod game;
pub mod grid;

pub use agent::{Agent, Deductions, Sentence};
pub use board::{Board, Oracle};
pub use cell::Cell;
pub use config::GameConfig;
pub use error::GameError;
pub use game::{Game, GameState, GameStats, Move, MoveKind};
pub use grid::Grid;
