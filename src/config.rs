use crate::{GameError, Grid};

/// Board dimensions and mine total for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mines: 8,
        }
    }
}

impl GameConfig {
    pub fn new(height: usize, width: usize, mines: usize) -> Self {
        Self {
            height,
            width,
            mines,
        }
    }

    /// Beginner board: 9x9 with 10 mines
    pub fn beginner() -> Self {
        Self::new(9, 9, 10)
    }

    /// Intermediate board: 16x16 with 40 mines
    pub fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    /// Expert board: 16x30 with 99 mines
    pub fn expert() -> Self {
        Self::new(16, 30, 99)
    }

    pub fn grid(&self) -> Result<Grid, GameError> {
        Grid::new(self.height, self.width)
    }

    /// Checks that the board is non-empty and leaves at least one safe cell.
    pub fn validate(&self) -> Result<(), GameError> {
        let grid = self.grid()?;
        if self.mines >= grid.area() {
            return Err(GameError::TooManyMines {
                height: self.height,
                width: self.width,
                mines: self.mines,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid().unwrap().area(), 64);
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert!(config.validate().is_ok(), "{config:?} should be valid");
        }
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        assert_eq!(
            GameConfig::new(0, 4, 1).validate(),
            Err(GameError::EmptyGrid)
        );
        assert_eq!(
            GameConfig::new(2, 2, 4).validate(),
            Err(GameError::TooManyMines {
                height: 2,
                width: 2,
                mines: 4
            })
        );
    }
}
