//! Board representation and game rules.
//!
//! The board is a fixed-size square grid filled in by alternating players.
//! A run of five or more same-colored stones in any of the four scan
//! directions wins; a full board with no such run is a draw.

use thiserror::Error;

/// Number of consecutive stones required to win.
pub const WIN_LENGTH: usize = 5;

/// Default board side length.
pub const DEFAULT_SIZE: usize = 5;

/// A board coordinate pair `(x, y)`, row-major.
pub type Move = (usize, usize);

/// One of the two players. `Player::One` always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The opponent of this player.
    #[inline]
    pub fn other(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

/// Final result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

impl Outcome {
    /// Numeric value of this outcome from `player`'s perspective:
    /// +1.0 for a win, -1.0 for a loss, 0.0 for a draw.
    #[inline]
    pub fn value_for(self, player: Player) -> f32 {
        match self {
            Outcome::Win(winner) if winner == player => 1.0,
            Outcome::Win(_) => -1.0,
            Outcome::Draw => 0.0,
        }
    }
}

/// Error raised by [`Board::place_stone`] for a rejected move.
///
/// Recoverable by the caller: the board is left unchanged, so a driver can
/// simply re-prompt for input.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMoveError {
    #[error("position ({x}, {y}) is outside the {size}x{size} board")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("cell ({x}, {y}) is already occupied")]
    Occupied { x: usize, y: usize },
}

/// Game state: grid contents and whose turn it is.
///
/// Cells never revert to empty; `place_stone` is the only mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Option<Player>>,
    current_player: Player,
    moves_played: usize,
}

impl Board {
    /// Create an empty board with the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Self {
            size,
            cells: vec![None; size * size],
            current_player: Player::One,
            moves_played: 0,
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> usize {
        x * self.size + y
    }

    /// Side length of the board.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The player who places the next stone.
    #[inline]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Number of stones placed so far.
    #[inline]
    pub fn moves_played(&self) -> usize {
        self.moves_played
    }

    /// Contents of cell `(x, y)`; `None` for empty or out-of-range cells.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> Option<Player> {
        if x < self.size && y < self.size {
            self.cells[self.index(x, y)]
        } else {
            None
        }
    }

    /// True iff `(x, y)` is on the board and empty. No side effects.
    #[inline]
    pub fn is_legal(&self, x: usize, y: usize) -> bool {
        x < self.size && y < self.size && self.cells[self.index(x, y)].is_none()
    }

    /// Place a stone for the current player at `(x, y)` and pass the turn.
    ///
    /// On error the board is unchanged.
    pub fn place_stone(&mut self, x: usize, y: usize) -> Result<(), IllegalMoveError> {
        if x >= self.size || y >= self.size {
            return Err(IllegalMoveError::OutOfBounds {
                x,
                y,
                size: self.size,
            });
        }
        let index = self.index(x, y);
        if self.cells[index].is_some() {
            return Err(IllegalMoveError::Occupied { x, y });
        }

        self.cells[index] = Some(self.current_player);
        self.current_player = self.current_player.other();
        self.moves_played += 1;
        Ok(())
    }

    /// All empty cells, in row-major order.
    ///
    /// The order is deterministic so that search expansion and tests are
    /// reproducible even when move selection itself is randomized.
    pub fn available_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self.size * self.size - self.moves_played);
        for x in 0..self.size {
            for y in 0..self.size {
                if self.cells[self.index(x, y)].is_none() {
                    moves.push((x, y));
                }
            }
        }
        moves
    }

    /// True iff no empty cells remain.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.moves_played == self.size * self.size
    }

    /// The owner of any run of at least [`WIN_LENGTH`] stones, if one exists.
    ///
    /// Scans every cell as a potential run start in four directions
    /// (east, south, south-east, north-east). Runs longer than `WIN_LENGTH`
    /// on larger boards count as wins. A full board without a run is NOT a
    /// winner; draws are reported separately via [`Board::is_full`].
    pub fn winner(&self) -> Option<Player> {
        const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

        for x in 0..self.size {
            for y in 0..self.size {
                let Some(player) = self.cells[self.index(x, y)] else {
                    continue;
                };
                for (dx, dy) in DIRECTIONS {
                    let mut count = 1;
                    for step in 1..WIN_LENGTH {
                        let nx = x as isize + step as isize * dx;
                        let ny = y as isize + step as isize * dy;
                        if nx < 0
                            || ny < 0
                            || nx >= self.size as isize
                            || ny >= self.size as isize
                        {
                            break;
                        }
                        if self.cells[self.index(nx as usize, ny as usize)] == Some(player) {
                            count += 1;
                        } else {
                            break;
                        }
                    }
                    if count >= WIN_LENGTH {
                        return Some(player);
                    }
                }
            }
        }
        None
    }

    /// Game-over report: `Win` if a run exists, `Draw` if the board is full,
    /// `None` while the game is in progress.
    pub fn outcome(&self) -> Option<Outcome> {
        if let Some(winner) = self.winner() {
            Some(Outcome::Win(winner))
        } else if self.is_full() {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_SIZE)
    }
}
