use super::Agent;
use crate::{Board, Cell, Grid, Oracle};
use rand::prelude::*;
use std::collections::HashSet;

/// Configuration for test board generation
#[derive(Debug, Clone)]
pub struct TestBoardConfig {
    pub height: usize,
    pub width: usize,
    pub mine_density: f64,
    pub revealed_percentage: f64,
}

impl Default for TestBoardConfig {
    fn default() -> Self {
        Self {
            height: 8,
            width: 8,
            mine_density: 0.15,
            revealed_percentage: 0.3,
        }
    }
}

/// Generates boards together with an agent that has already observed some of
/// their safe cells
pub struct TestBoardGenerator {
    config: TestBoardConfig,
    rng: StdRng,
}

impl TestBoardGenerator {
    pub fn new(config: TestBoardConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(config: TestBoardConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generates a board and reveals a random share of its safe cells to a
    /// fresh agent, in random order
    pub fn generate(&mut self) -> (Board, Agent) {
        let grid = Grid::new(self.config.height, self.config.width).unwrap();
        let area = grid.area() as f64;
        let mines_count = (area * self.config.mine_density) as usize;
        let board = Board::new(grid, mines_count, &mut self.rng).unwrap();

        let mut safe_cells: Vec<Cell> = grid.cells().filter(|&cell| !board.is_mine(cell)).collect();
        safe_cells.shuffle(&mut self.rng);
        let cells_to_reveal = ((area * self.config.revealed_percentage) as usize).min(safe_cells.len());

        let mut agent = Agent::new(grid);
        for &cell in &safe_cells[..cells_to_reveal] {
            agent.record_observation(cell, board.neighbor_mine_count(cell));
        }

        (board, agent)
    }

    /// Generates multiple test cases
    pub fn generate_batch(&mut self, count: usize) -> Vec<(Board, Agent)> {
        (0..count).map(|_| self.generate()).collect()
    }
}

/// Checks the agent's deductions against the ground truth, and its knowledge
/// base against the invariants it must keep
pub fn validate_agent<O: Oracle>(agent: &Agent, oracle: &O) -> bool {
    for cell in agent.mines() {
        if !oracle.is_mine(*cell) {
            println!("Agent incorrectly identified safe cell {} as mine", cell);
            return false;
        }
    }

    for cell in agent.safe() {
        if oracle.is_mine(*cell) {
            println!("Agent incorrectly identified mine {} as safe", cell);
            return false;
        }
    }

    if !agent.safe().is_disjoint(agent.mines()) {
        println!("Agent proved a cell both safe and a mine");
        return false;
    }

    let known: HashSet<&Cell> = agent.safe().union(agent.mines()).collect();
    for sentence in agent.knowledge() {
        if sentence.is_empty() || sentence.count() > sentence.len() {
            println!("Agent kept malformed sentence {}", sentence);
            return false;
        }
        if let Some(cell) = sentence.cells().iter().find(|cell| known.contains(cell)) {
            println!("Known cell {} still appears in {}", cell, sentence);
            return false;
        }
        let mines_in_sentence = sentence
            .cells()
            .iter()
            .filter(|&&cell| oracle.is_mine(cell))
            .count();
        if mines_in_sentence != sentence.count() {
            println!(
                "Sentence {} disagrees with the board, which has {} mines there",
                sentence, mines_in_sentence
            );
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_agents_are_sound() {
        let mut generator = TestBoardGenerator::with_seed(TestBoardConfig::default(), 12345);
        for (board, agent) in generator.generate_batch(50) {
            assert!(validate_agent(&agent, &board));
        }
    }

    #[test]
    fn test_validate_agent_catches_wrong_mine() {
        let grid = Grid::new(2, 2).unwrap();
        let board = Board::with_mines(grid, [Cell::new(0, 0)]).unwrap();
        let mut agent = Agent::new(grid);
        agent.mark_mine(Cell::new(1, 1));

        assert!(!validate_agent(&agent, &board));
    }
}
