//! Position evaluator contract.
//!
//! An evaluator estimates a move-probability distribution and a scalar
//! position value for a board. In an AlphaZero-style setup this is a neural
//! network; for exercising the search without a model there is a uniform
//! evaluator.
//!
//! The search runs pure random rollouts by default. Attaching an evaluator
//! via [`crate::MctsSearch::with_evaluator`] replaces the rollout value
//! estimate for non-terminal leaves. The policy half of the contract is
//! carried for move-ordering and selection-weighting extensions but does not
//! bias selection yet; that is an explicit extension point, not an oversight
//! to reproduce.

use gomoku_core::{Board, Move};
use thiserror::Error;

/// Errors that can occur during evaluation.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

/// Result of evaluating a board position.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Probability per available move, in `available_moves` order.
    /// Values should sum to ~1.0 on non-terminal positions.
    pub policy: Vec<(Move, f32)>,

    /// Value estimate in [-1.0, 1.0] from the perspective of the player to
    /// move on the evaluated board.
    pub value: f32,
}

/// Trait for position evaluators.
pub trait Evaluator: Send + Sync {
    /// Evaluate a single board position.
    fn evaluate(&self, board: &Board) -> Result<Evaluation, EvaluatorError>;
}

/// Assigns equal probability to every available move with a neutral value.
/// Useful for exercising the search plumbing without a trained model.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, board: &Board) -> Result<Evaluation, EvaluatorError> {
        let moves = board.available_moves();
        if moves.is_empty() {
            // Terminal position: empty policy, neutral value.
            return Ok(Evaluation {
                policy: Vec::new(),
                value: 0.0,
            });
        }

        let prob = 1.0 / moves.len() as f32;
        let policy = moves.into_iter().map(|mv| (mv, prob)).collect();
        Ok(Evaluation { policy, value: 0.0 })
    }
}
