//! The shared board: a fixed square grid of cell states and the attack
//! transition rule.

use crate::config::{BOARD_SIZE, DEPLOYMENT};
use core::fmt;

/// State of a single grid position.
///
/// Transitions are monotonic: `Ship` flips to `Hit` on the first successful
/// attack and a cell never regresses to `Ship` or `Empty`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Ship,
    Hit,
    AlreadyHit,
}

/// Outcome of a single attack, broadcast verbatim to both players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    Hit,
    Miss,
    AlreadyHit,
    Invalid,
}

impl fmt::Display for AttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            AttackResult::Hit => "Hit",
            AttackResult::Miss => "Miss",
            AttackResult::AlreadyHit => "AlreadyHit",
            AttackResult::Invalid => "Invalid",
        };
        f.write_str(word)
    }
}

/// Square grid of [`Cell`]s shared by both players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Create a board with the reference deployment placed.
    pub fn new() -> Self {
        Self::with_ships(&DEPLOYMENT)
    }

    /// Create a board with ships at the given coordinates. Out-of-range
    /// coordinates are ignored rather than placed.
    pub fn with_ships(ships: &[(usize, usize)]) -> Self {
        let mut cells = [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE];
        for &(x, y) in ships {
            if x < BOARD_SIZE && y < BOARD_SIZE {
                cells[x][y] = Cell::Ship;
            }
        }
        Board { cells }
    }

    /// Cell state at (x, y), if in range.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        self.cells.get(x).and_then(|row| row.get(y)).copied()
    }

    /// Resolve an attack at (x, y).
    ///
    /// Coordinates at or beyond [`BOARD_SIZE`] are `Invalid` and mutate
    /// nothing. A `Ship` cell flips to `Hit` exactly once; repeat attacks on
    /// the same cell report `AlreadyHit` without further mutation, and an
    /// `Empty` cell reports `Miss` forever.
    pub fn attack(&mut self, x: usize, y: usize) -> AttackResult {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return AttackResult::Invalid;
        }
        match self.cells[x][y] {
            Cell::Ship => {
                self.cells[x][y] = Cell::Hit;
                AttackResult::Hit
            }
            Cell::Empty => AttackResult::Miss,
            Cell::Hit | Cell::AlreadyHit => AttackResult::AlreadyHit,
        }
    }

    /// Returns `true` once no cell holds a `Ship`.
    pub fn victory(&self) -> bool {
        self.cells
            .iter()
            .flatten()
            .all(|cell| *cell != Cell::Ship)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
