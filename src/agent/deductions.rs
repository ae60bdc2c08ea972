use crate::Cell;
use std::collections::HashSet;

/// Cells the agent has newly proven to be mines or safe
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deductions {
    /// Cells that are definitely mines
    pub mines: HashSet<Cell>,
    /// Cells that are definitely safe
    pub safe: HashSet<Cell>,
}

impl Deductions {
    pub fn is_empty(&self) -> bool {
        self.mines.is_empty() && self.safe.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mines.len() + self.safe.len()
    }
}
