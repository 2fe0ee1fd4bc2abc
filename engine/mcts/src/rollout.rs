//! Random playout simulation.
//!
//! A rollout estimates a position's value without a trained evaluator by
//! playing uniformly random legal moves until the game ends, and reporting
//! who won.

use gomoku_core::{Board, Outcome};
use rand::Rng;
use rand_chacha::ChaCha20Rng;

/// Play a full random game starting from `board` and report the result.
///
/// The caller's board is never mutated; the playout runs on an independent
/// copy. Every iteration fills exactly one empty cell, so the loop
/// terminates within `size * size` placements.
pub fn simulate_random_game(board: &Board, rng: &mut ChaCha20Rng) -> Outcome {
    let mut sim = board.clone();

    loop {
        if let Some(winner) = sim.winner() {
            return Outcome::Win(winner);
        }
        if sim.is_full() {
            return Outcome::Draw;
        }

        let moves = sim.available_moves();
        let (x, y) = moves[rng.gen_range(0..moves.len())];
        sim.place_stone(x, y)
            .expect("move drawn from available_moves is legal");
    }
}
