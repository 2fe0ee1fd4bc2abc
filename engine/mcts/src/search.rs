//! MCTS search controller.
//!
//! Implements the core search loop:
//! 1. Selection: descend with UCB1 while the node is fully expanded
//! 2. Expansion: create one child for the first untried move
//! 3. Simulation: random rollout (or evaluator value) from the new child
//! 4. Backpropagation: update statistics along the path, flipping the sign
//!    at each ply
//!
//! Leaves whose game is already decided skip expansion entirely and
//! backpropagate the known outcome instead.

use std::time::Instant;

use gomoku_core::{Board, Move};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::SearchConfig;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::NodeId;
use crate::rollout::simulate_random_game;
use crate::tree::{ExpandError, SearchTree};

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no legal moves available from the root position")]
    NoLegalMoves,

    /// Contract violation inside the controller; aborts the search rather
    /// than silently corrupting tree statistics.
    #[error(transparent)]
    Expansion(#[from] ExpandError),

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Most visited root move (robust-child policy)
    pub best_move: Move,

    /// Value estimate of the root position from the perspective of the
    /// player to move there. Root statistics are stored for that player's
    /// opponent (the sign convention of backpropagation), so this is the
    /// negated root mean.
    pub value: f32,

    /// Number of simulations actually performed
    pub simulations: u32,

    /// Visit counts of the root's children
    pub visit_counts: Vec<(Move, u32)>,
}

/// MCTS search state over one root position.
///
/// Single-threaded and synchronous: every simulation runs selection,
/// expansion, rollout, and backpropagation in program order, so tree
/// statistics need no locking.
pub struct MctsSearch<'a> {
    tree: SearchTree,
    config: SearchConfig,
    evaluator: Option<&'a dyn Evaluator>,
}

impl<'a> MctsSearch<'a> {
    /// Create a search rooted at `root`.
    ///
    /// Fails with [`SearchError::NoLegalMoves`] if the game is already over
    /// at the root, since there is nothing to search.
    pub fn new(root: Board, config: SearchConfig) -> Result<Self, SearchError> {
        if root.outcome().is_some() {
            return Err(SearchError::NoLegalMoves);
        }
        Ok(Self {
            tree: SearchTree::new(root),
            config,
            evaluator: None,
        })
    }

    /// Use `evaluator`'s value estimate in place of random rollouts for
    /// non-terminal leaves.
    pub fn with_evaluator(mut self, evaluator: &'a dyn Evaluator) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Run simulations until the budget is exhausted and return the most
    /// visited root move.
    ///
    /// The configured deadline, if any, is checked once per simulation; at
    /// least one simulation always runs so a move can be returned.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult, SearchError> {
        let deadline = self
            .config
            .max_duration()
            .map(|limit| Instant::now() + limit);

        let mut simulations = 0u32;
        while simulations < self.config.num_simulations {
            if simulations > 0 {
                if let Some(deadline) = deadline {
                    if Instant::now() >= deadline {
                        debug!(simulations, "search deadline reached");
                        break;
                    }
                }
            }
            self.simulate(rng)?;
            simulations += 1;
        }

        let best_move = self.tree.best_move(rng).ok_or(SearchError::NoLegalMoves)?;
        let value = -self.tree.get(self.tree.root()).mean_value();
        debug!(
            simulations,
            nodes = self.tree.len(),
            best_move = ?best_move,
            value,
            "search complete"
        );

        Ok(SearchResult {
            best_move,
            value,
            simulations,
            visit_counts: self.tree.root_visit_counts(),
        })
    }

    /// One simulation pass: select a leaf, then either backpropagate its
    /// known outcome or expand it and estimate the new child.
    fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let leaf_id = self.select(rng);
        let leaf = self.tree.get(leaf_id);

        if let Some(outcome) = leaf.outcome {
            // The true result is known; expanding would violate the node
            // contract, so feed the outcome straight back up the tree.
            // Statistics are stored for the player who moved into the node.
            let value = outcome.value_for(leaf.state.current_player().other());
            self.tree.backpropagate(leaf_id, value);
            trace!(leaf = leaf_id.0, value, "terminal leaf revisited");
            return Ok(());
        }

        let child_id = self.tree.expand(leaf_id)?;
        let child = self.tree.get(child_id);
        let mover = child.state.current_player().other();

        let value = match child.outcome {
            Some(outcome) => outcome.value_for(mover),
            None => match self.evaluator {
                // The evaluator reports from the to-move player's
                // perspective; the tree stores the mover's.
                Some(evaluator) => -evaluator.evaluate(&child.state)?.value,
                None => simulate_random_game(&child.state, rng).value_for(mover),
            },
        };

        self.tree.backpropagate(child_id, value);
        trace!(
            leaf = child_id.0,
            value,
            nodes = self.tree.len(),
            "simulation complete"
        );
        Ok(())
    }

    /// Descend from the root while nodes are fully expanded and the game is
    /// not over, using UCB1 child selection.
    fn select(&self, rng: &mut ChaCha20Rng) -> NodeId {
        let mut current = self.tree.root();
        loop {
            let node = self.tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                return current;
            }
            match self
                .tree
                .select_child(current, self.config.exploration, rng)
            {
                Some(child_id) => current = child_id,
                None => return current,
            }
        }
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }
}

/// Convenience function to run a single search over `board`.
pub fn run_search(
    board: &Board,
    config: SearchConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board.clone(), config)?;
    search.run(rng)
}
