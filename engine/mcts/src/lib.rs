//! Monte Carlo Tree Search for connect-five boards.
//!
//! This crate provides the search engine over `gomoku-core` boards: an
//! automated opponent picks moves by building a tree of continuations and
//! estimating leaf positions with random rollouts.
//!
//! # Overview
//!
//! Each simulation consists of four phases:
//!
//! 1. **Selection**: Traverse the tree with UCB1, balancing exploration and
//!    exploitation, until reaching a node with untried moves
//! 2. **Expansion**: Add one child for the first untried move
//! 3. **Simulation**: Play a uniformly random game from the new position
//!    (or consult an attached [`Evaluator`]) to estimate its value
//! 4. **Backpropagation**: Update visit counts and value sums along the
//!    path back to the root, flipping the value's sign at each ply
//!
//! After the budget is spent, the most visited root move is returned
//! (robust-child policy).
//!
//! # Usage
//!
//! ```rust,ignore
//! use gomoku_core::Board;
//! use mcts::{MctsSearch, SearchConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let board = Board::new(5);
//! let config = SearchConfig::default();
//!
//! let mut rng = ChaCha20Rng::seed_from_u64(42);
//! let mut search = MctsSearch::new(board, config)?;
//! let result = search.run(&mut rng)?;
//!
//! println!("best move: {:?}", result.best_move);
//! println!("value: {}", result.value);
//! ```
//!
//! # Configuration
//!
//! The [`SearchConfig`] struct controls search behavior:
//!
//! - `num_simulations`: simulations per search (default: 800)
//! - `exploration`: UCB1 exploration constant (default: 1.4)
//! - `max_duration_ms`: optional wall-clock cutoff as an alternative budget
//!
//! Settings can also be loaded from `config.toml` with environment
//! overrides; see [`config::load_config`].
//!
//! # Randomness
//!
//! Every randomized operation (rollout moves, UCB and robust-child
//! tie-breaking) draws from an explicitly passed `ChaCha20Rng`, so searches
//! are reproducible under a fixed seed.

pub mod config;
pub mod evaluator;
pub mod node;
pub mod rollout;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::{load_config, BoardConfig, EngineConfig, SearchConfig};
pub use evaluator::{Evaluation, Evaluator, EvaluatorError, UniformEvaluator};
pub use node::{NodeId, SearchNode};
pub use rollout::simulate_random_game;
pub use search::{run_search, MctsSearch, SearchError, SearchResult};
pub use tree::{ExpandError, SearchTree, TreeStats};
