//! Board state machine for a two-player connect-five game.
//!
//! This crate provides the game rules only: stone placement, turn order,
//! move legality, win detection, and draw detection. Search and move
//! selection live in the `mcts` crate, which builds its tree out of `Board`
//! snapshots.
//!
//! # Usage
//!
//! ```rust
//! use gomoku_core::{Board, Player};
//!
//! let mut board = Board::new(5);
//! board.place_stone(2, 2).unwrap();
//! assert_eq!(board.cell(2, 2), Some(Player::One));
//! assert_eq!(board.current_player(), Player::Two);
//! ```
//!
//! A game driver alternates `place_stone` calls (human input or a search
//! result) and checks `winner()` / `is_full()` — or the combined `outcome()`
//! — after every placement to detect game end.

pub mod board;

pub use board::{Board, IllegalMoveError, Move, Outcome, Player, DEFAULT_SIZE, WIN_LENGTH};
