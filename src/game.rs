use crate::{Agent, Board, Cell, GameConfig, GameError, Oracle};
use rand::Rng;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// How the agent picked a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// The cell was proven safe
    Safe,
    /// Nothing was provably safe, so the cell was a guess
    Random,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveKind::Safe => f.write_str("safe"),
            MoveKind::Random => f.write_str("random"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub cell: Cell,
    pub kind: MoveKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameStats {
    pub won: bool,
    pub moves: usize,
    pub safe_moves: usize,
    pub random_moves: usize,
    pub mines_flagged: usize,
}

/// Lets an [`Agent`] play a [`Board`] to the end.
pub struct Game<R> {
    board: Board,
    agent: Agent,
    rng: R,
    state: GameState,
    stats: GameStats,
}

impl<R: Rng> Game<R> {
    /// Starts a game on a freshly mined board. The same generator places the
    /// mines and drives the agent's guesses.
    pub fn new(config: &GameConfig, mut rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let board = Board::new(config.grid()?, config.mines, &mut rng)?;
        Ok(Self::from_board(board, rng))
    }

    pub fn from_board(board: Board, rng: R) -> Self {
        Self {
            agent: Agent::new(board.grid()),
            board,
            rng,
            state: GameState::Playing,
            stats: GameStats::default(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Reveals `cell`, feeding the observation to the agent and flagging every
    /// mine it proves as a result.
    pub fn reveal(&mut self, cell: Cell) -> Result<GameState, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::InvalidGameState);
        }
        let grid = self.board.grid();
        if !grid.contains(cell) {
            return Err(GameError::OutOfBounds(cell));
        }
        if self.agent.moves_made().contains(&cell) {
            return Err(GameError::AlreadyRevealed(cell));
        }

        self.stats.moves += 1;
        if self.board.is_mine(cell) {
            info!(%cell, moves = self.stats.moves, "hit a mine");
            self.state = GameState::Lost;
            return Ok(self.state);
        }

        let count = self.board.neighbor_mine_count(cell);
        let learned = self.agent.record_observation(cell, count);
        debug!(%cell, count, learned = learned.len(), "revealed cell");
        for &mine in &learned.mines {
            self.board.flag(mine)?;
        }
        self.stats.mines_flagged = self.board.mines_found().len();

        if self.agent.moves_made().len() == grid.area() - self.board.mines_count() {
            info!(
                moves = self.stats.moves,
                random_moves = self.stats.random_moves,
                "cleared the board"
            );
            self.state = GameState::Won;
            self.stats.won = true;
        }
        Ok(self.state)
    }

    /// Makes the agent's next move: a proven-safe cell if there is one,
    /// otherwise a guess. Returns `None` when the agent has nothing to play.
    pub fn step(&mut self) -> Result<Option<Move>, GameError> {
        if self.state != GameState::Playing {
            return Err(GameError::InvalidGameState);
        }

        let next = match self.agent.next_safe_move() {
            Some(cell) => Move {
                cell,
                kind: MoveKind::Safe,
            },
            None => match self.agent.next_random_move(&mut self.rng) {
                Some(cell) => Move {
                    cell,
                    kind: MoveKind::Random,
                },
                None => return Ok(None),
            },
        };

        debug!(cell = %next.cell, kind = %next.kind, "making move");
        match next.kind {
            MoveKind::Safe => self.stats.safe_moves += 1,
            MoveKind::Random => self.stats.random_moves += 1,
        }
        self.reveal(next.cell)?;
        Ok(Some(next))
    }

    /// Plays until the game is won or lost.
    pub fn play(&mut self) -> Result<GameStats, GameError> {
        while self.state == GameState::Playing {
            if self.step()?.is_none() {
                warn!("agent ran out of moves");
                break;
            }
        }
        Ok(self.stats.clone())
    }
}
