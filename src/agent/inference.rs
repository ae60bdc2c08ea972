use super::{Deductions, Sentence};
use crate::{Cell, Grid};
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, trace, warn};

/// Plays the board by logical deduction over the observations it is fed.
///
/// The agent keeps a knowledge base of [`Sentence`]s over the cells whose
/// status is still unknown. Once a cell is proven safe or a mine it is purged
/// from every sentence, so the knowledge base only ever talks about unknowns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    grid: Grid,
    /// Cells that have been revealed
    moves_made: HashSet<Cell>,
    /// Cells proven not to hold a mine
    safe: HashSet<Cell>,
    /// Cells proven to hold a mine
    mines: HashSet<Cell>,
    knowledge: HashSet<Sentence>,
}

impl Agent {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            moves_made: HashSet::new(),
            safe: HashSet::new(),
            mines: HashSet::new(),
            knowledge: HashSet::new(),
        }
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn safe(&self) -> &HashSet<Cell> {
        &self.safe
    }

    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    pub fn knowledge(&self) -> &HashSet<Sentence> {
        &self.knowledge
    }

    /// Records `cell` as a mine and removes it from every sentence.
    ///
    /// Returns whether the cell was newly learned. A cell already proven safe
    /// is left alone.
    pub fn mark_mine(&mut self, cell: Cell) -> bool {
        if self.safe.contains(&cell) {
            warn!(%cell, "refusing to mark a proven safe cell as a mine");
            return false;
        }
        if !self.mines.insert(cell) {
            return false;
        }
        self.update_knowledge(|sentence| sentence.mark_mine(cell));
        true
    }

    /// Records `cell` as safe and removes it from every sentence.
    ///
    /// Returns whether the cell was newly learned. A cell already proven to be
    /// a mine is left alone.
    pub fn mark_safe(&mut self, cell: Cell) -> bool {
        if self.mines.contains(&cell) {
            warn!(%cell, "refusing to mark a proven mine as safe");
            return false;
        }
        if !self.safe.insert(cell) {
            return false;
        }
        self.update_knowledge(|sentence| sentence.mark_safe(cell));
        true
    }

    /// Feeds the agent the number of mines around a revealed cell, then
    /// saturates the knowledge base. Returns everything learned as a result.
    ///
    /// # Panics
    ///
    /// Panics if `cell` lies outside the agent's grid.
    pub fn record_observation(&mut self, cell: Cell, count: usize) -> Deductions {
        assert!(
            self.grid.contains(cell),
            "cell {cell} is outside the {}x{} grid",
            self.grid.height(),
            self.grid.width()
        );

        let mut learned = Deductions::default();
        self.moves_made.insert(cell);
        if self.mark_safe(cell) {
            learned.safe.insert(cell);
        }

        // Only unknown neighbors go into the sentence; known mines come off the count
        let mut known_mines = 0;
        let mut unknown = Vec::new();
        for neighbor in self.grid.neighbors(cell) {
            if self.mines.contains(&neighbor) {
                known_mines += 1;
            } else if !self.safe.contains(&neighbor) {
                unknown.push(neighbor);
            }
        }

        match count
            .checked_sub(known_mines)
            .filter(|&remaining| remaining <= unknown.len())
        {
            Some(remaining) => {
                let sentence = Sentence::new(unknown, remaining);
                debug!(%cell, count, %sentence, "recorded observation");
                if !sentence.is_empty() {
                    self.knowledge.insert(sentence);
                }
            }
            None => warn!(
                %cell,
                count,
                known_mines,
                unknown = unknown.len(),
                "ignoring inconsistent observation"
            ),
        }

        let saturated = self.saturate();
        learned.mines.extend(saturated.mines);
        learned.safe.extend(saturated.safe);
        learned
    }

    /// Adds a sentence obtained elsewhere, purging cells whose status is
    /// already known, then saturates the knowledge base.
    pub fn add_sentence(&mut self, mut sentence: Sentence) -> Deductions {
        for &cell in &self.mines {
            sentence.mark_mine(cell);
        }
        for &cell in &self.safe {
            sentence.mark_safe(cell);
        }
        if !sentence.is_consistent() {
            warn!(%sentence, "ignoring inconsistent sentence");
        } else if !sentence.is_empty() {
            self.knowledge.insert(sentence);
        }
        self.saturate()
    }

    /// Applies every available deduction until a full round yields neither a
    /// new fact nor a new sentence.
    ///
    /// Each round marks the cells some sentence pins down, then derives
    /// `superset - subset` for every pair of sentences where one's cells
    /// contain the other's. A round that learns no fact strictly grows the
    /// knowledge base, which is finite, so the loop terminates.
    pub fn saturate(&mut self) -> Deductions {
        let mut learned = Deductions::default();
        for round in 1usize.. {
            let facts = self.apply_certain_facts(&mut learned);
            let inferred = self.infer_from_subsets();
            trace!(
                round,
                facts,
                inferred,
                knowledge = self.knowledge.len(),
                "saturation round"
            );
            if facts == 0 && inferred == 0 {
                debug!(
                    rounds = round,
                    mines = learned.mines.len(),
                    safe = learned.safe.len(),
                    knowledge = self.knowledge.len(),
                    "knowledge saturated"
                );
                break;
            }
        }
        learned
    }

    /// Some proven-safe cell that has not been revealed yet, lowest first.
    pub fn next_safe_move(&self) -> Option<Cell> {
        self.safe.difference(&self.moves_made).min().copied()
    }

    /// A uniformly chosen cell that is neither revealed nor a known mine.
    pub fn next_random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .grid
            .cells()
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect();
        candidates.choose(rng).copied()
    }

    fn apply_certain_facts(&mut self, learned: &mut Deductions) -> usize {
        let mut mines = BTreeSet::new();
        let mut safe = BTreeSet::new();
        for sentence in &self.knowledge {
            mines.extend(sentence.known_mines());
            safe.extend(sentence.known_safe());
        }

        let mut applied = 0;
        for cell in mines {
            if self.mark_mine(cell) {
                learned.mines.insert(cell);
                applied += 1;
            }
        }
        for cell in safe {
            if self.mark_safe(cell) {
                learned.safe.insert(cell);
                applied += 1;
            }
        }
        applied
    }

    fn infer_from_subsets(&mut self) -> usize {
        let inferred: HashSet<Sentence> = self
            .knowledge
            .iter()
            .cartesian_product(self.knowledge.iter())
            .filter(|(subset, superset)| subset != superset && subset.is_subset(superset))
            .filter_map(|(subset, superset)| superset.subtract(subset))
            .filter(|sentence| !sentence.is_empty() && !self.knowledge.contains(sentence))
            .collect();

        let added = inferred.len();
        self.knowledge.extend(inferred);
        added
    }

    /// Rebuilds the knowledge base from updated copies of its sentences, so
    /// no sentence is mutated while hashed into the set.
    fn update_knowledge(&mut self, mut update: impl FnMut(&mut Sentence)) {
        self.knowledge = std::mem::take(&mut self.knowledge)
            .into_iter()
            .filter_map(|mut sentence| {
                update(&mut sentence);
                if !sentence.is_consistent() {
                    warn!(%sentence, "dropping contradictory sentence");
                    return None;
                }
                (!sentence.is_empty()).then_some(sentence)
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use statrs::distribution::{ChiSquared, ContinuousCDF};
    use std::collections::HashMap;

    fn grid(height: usize, width: usize) -> Grid {
        Grid::new(height, width).unwrap()
    }

    fn sentence(coords: &[(usize, usize)], count: usize) -> Sentence {
        Sentence::new(coords.iter().copied().map(Cell::from), count)
    }

    fn assert_invariants(agent: &Agent) {
        assert!(
            agent.safe().is_disjoint(agent.mines()),
            "A cell was proven both safe and a mine"
        );
        assert!(agent.safe().is_superset(agent.moves_made()));
        for sentence in agent.knowledge() {
            assert!(!sentence.is_empty());
            assert!(sentence.count() <= sentence.len());
            for cell in sentence.cells() {
                assert!(
                    !agent.safe().contains(cell) && !agent.mines().contains(cell),
                    "Known cell {cell} still appears in {sentence}"
                );
            }
        }
    }

    #[test]
    fn test_single_neighbor_mine() {
        // [1|?] on a 1x2 board, the hidden cell must be the mine
        let mut agent = Agent::new(grid(1, 2));
        let learned = agent.record_observation(Cell::new(0, 0), 1);

        assert!(agent.mines().contains(&Cell::new(0, 1)));
        assert!(learned.mines.contains(&Cell::new(0, 1)));
        assert!(agent.knowledge().is_empty());
        assert_eq!(agent.next_safe_move(), None);
        assert_invariants(&agent);
    }

    #[test]
    fn test_zero_marks_all_neighbors_safe() {
        let mut agent = Agent::new(grid(2, 2));
        agent.record_observation(Cell::new(0, 0), 0);

        for cell in [Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)] {
            assert!(agent.safe().contains(&cell), "{cell} should be safe");
        }
        assert!(agent.mines().is_empty());
        assert_eq!(agent.next_safe_move(), Some(Cell::new(0, 1)));
        assert_invariants(&agent);
    }

    #[test]
    fn test_subset_reduction() {
        let mut agent = Agent::new(grid(3, 3));
        agent.add_sentence(sentence(&[(0, 0), (0, 1), (0, 2)], 1));
        assert!(agent.safe().is_empty());

        let learned = agent.add_sentence(sentence(&[(0, 0), (0, 1)], 1));
        assert!(agent.safe().contains(&Cell::new(0, 2)));
        assert!(learned.safe.contains(&Cell::new(0, 2)));
        assert!(agent.knowledge().contains(&sentence(&[(0, 0), (0, 1)], 1)));
        assert_eq!(agent.knowledge().len(), 1);
        assert_invariants(&agent);
    }

    #[test]
    fn test_chained_deductions_reach_fixpoint() {
        // Row of five, mines at columns 1 and 3:
        // [?|X|?|X|?]
        // [1|1|2|1|1]
        let mut agent = Agent::new(grid(2, 5));
        agent.record_observation(Cell::new(1, 0), 1);
        agent.record_observation(Cell::new(1, 1), 1);
        agent.record_observation(Cell::new(1, 2), 2);
        agent.record_observation(Cell::new(1, 3), 1);
        agent.record_observation(Cell::new(1, 4), 1);

        let mines: HashSet<Cell> = [Cell::new(0, 1), Cell::new(0, 3)].into_iter().collect();
        assert_eq!(agent.mines(), &mines);
        for col in [0, 2, 4] {
            assert!(agent.safe().contains(&Cell::new(0, col)));
        }
        assert!(agent.knowledge().is_empty());
        assert_invariants(&agent);
    }

    #[test]
    fn test_known_mines_reduce_observed_count() {
        let mut agent = Agent::new(grid(3, 3));
        agent.mark_mine(Cell::new(0, 0));
        agent.record_observation(Cell::new(1, 1), 1);

        // The only mine around the center is already known, everything else is safe
        assert_eq!(agent.mines().len(), 1);
        assert_eq!(agent.safe().len(), 8);
        assert!(agent.knowledge().is_empty());
        assert_invariants(&agent);
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut agent = Agent::new(grid(3, 3));
        agent.record_observation(Cell::new(1, 1), 2);

        assert!(agent.mark_mine(Cell::new(0, 0)));
        assert!(agent.mark_safe(Cell::new(2, 2)));
        let once = agent.clone();

        assert!(!agent.mark_mine(Cell::new(0, 0)));
        assert!(!agent.mark_safe(Cell::new(2, 2)));
        assert_eq!(agent, once);
    }

    #[test]
    fn test_contradictory_mark_is_refused() {
        let mut agent = Agent::new(grid(2, 2));
        agent.mark_safe(Cell::new(0, 0));
        assert!(!agent.mark_mine(Cell::new(0, 0)));
        assert!(agent.mines().is_empty());

        agent.mark_mine(Cell::new(1, 1));
        assert!(!agent.mark_safe(Cell::new(1, 1)));
        assert_invariants(&agent);
    }

    #[test]
    fn test_saturate_is_a_fixpoint() {
        let mut agent = Agent::new(grid(4, 4));
        agent.record_observation(Cell::new(0, 0), 1);
        agent.record_observation(Cell::new(0, 3), 1);
        agent.record_observation(Cell::new(3, 0), 2);
        let converged = agent.clone();

        assert!(agent.saturate().is_empty());
        assert_eq!(agent, converged);
    }

    #[test]
    fn test_inconsistent_observation_is_ignored() {
        let mut agent = Agent::new(grid(1, 2));
        agent.record_observation(Cell::new(0, 0), 3);

        assert!(agent.knowledge().is_empty());
        assert!(agent.mines().is_empty());
        assert_invariants(&agent);
    }

    #[test]
    #[should_panic(expected = "outside the 2x2 grid")]
    fn test_out_of_bounds_observation_panics() {
        let mut agent = Agent::new(grid(2, 2));
        agent.record_observation(Cell::new(2, 0), 0);
    }

    #[test]
    fn test_random_move_skips_mines_and_moves() {
        let mut agent = Agent::new(grid(3, 3));
        agent.mark_mine(Cell::new(0, 0));
        agent.mark_mine(Cell::new(0, 1));
        agent.record_observation(Cell::new(2, 2), 1);
        assert_eq!(agent.next_safe_move(), None);

        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Cell, usize> = HashMap::new();
        let samples = 6_000;
        for _ in 0..samples {
            let cell = agent.next_random_move(&mut rng).unwrap();
            assert!(!agent.mines().contains(&cell));
            assert!(!agent.moves_made().contains(&cell));
            *counts.entry(cell).or_default() += 1;
        }

        // 9 cells minus two mines and one revealed cell
        assert_eq!(counts.len(), 6);

        let expected = samples as f64 / counts.len() as f64;
        let statistic: f64 = counts
            .values()
            .map(|&observed| (observed as f64 - expected).powi(2) / expected)
            .sum();
        let dist = ChiSquared::new((counts.len() - 1) as f64).unwrap();
        let p_value = 1.0 - dist.cdf(statistic);
        assert!(
            p_value > 1e-6,
            "Random moves are not uniform: chi2 = {statistic:.3}, p = {p_value:.2e}"
        );
    }

    #[test]
    fn test_no_random_move_when_exhausted() {
        let mut agent = Agent::new(grid(1, 2));
        agent.record_observation(Cell::new(0, 0), 1);

        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(agent.next_random_move(&mut rng), None);
    }
}
