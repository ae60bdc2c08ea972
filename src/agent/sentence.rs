use crate::Cell;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;

/// A logical statement: exactly `count` of `cells` are mines.
///
/// Equality and hashing are by value, so a knowledge base of sentences can be
/// deduplicated through set membership. Cells are kept in a `BTreeSet` because
/// `HashSet` is not itself hashable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Sentence {
    pub fn new(cells: impl IntoIterator<Item = Cell>, count: usize) -> Self {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        debug_assert!(
            count <= cells.len(),
            "sentence claims {count} mines among {} cells",
            cells.len()
        );
        Self { cells, count }
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A sentence over no cells says nothing.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Every cell, when the count leaves no room for a safe one.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// Every cell, when the count is zero.
    pub fn known_safe(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    pub fn mark_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
        }
    }

    pub fn mark_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    pub fn is_subset(&self, other: &Sentence) -> bool {
        self.cells.is_subset(&other.cells)
    }

    /// Removes `subset` from this sentence: the cells outside `subset` hold
    /// exactly the mines `subset` does not account for.
    ///
    /// Returns `None` when `subset` is not a subset, or when the resulting
    /// count would not fit the remaining cells. The latter only happens when
    /// the two sentences contradict each other.
    pub fn subtract(&self, subset: &Sentence) -> Option<Sentence> {
        if !subset.is_subset(self) {
            return None;
        }
        let count = self.count.checked_sub(subset.count)?;
        let cells: BTreeSet<Cell> = self.cells.difference(&subset.cells).copied().collect();
        if count > cells.len() {
            return None;
        }
        Some(Sentence { cells, count })
    }

    /// Whether the count still fits the cells. Only contradictory
    /// observations can break this.
    pub fn is_consistent(&self) -> bool {
        self.count <= self.cells.len()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}} = {}", self.cells.iter().join(", "), self.count)
    }
}
