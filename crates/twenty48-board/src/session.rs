use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::{self, Direction, Grid, Spawn};

/// What a single `Game::apply` did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub changed: bool,
    /// Tile placed after an effective move; always `None` when `changed` is false.
    pub spawn: Option<Spawn>,
}

/// A single game: owns the board and the RNG used for spawns.
///
/// The board is only ever replaced as a whole inside [`Game::apply`], so
/// callers holding `&Game` never observe a half-applied move.
pub struct Game<R: Rng = StdRng> {
    grid: Grid,
    rng: R,
    moves: u64,
}

impl Game<StdRng> {
    /// Fresh `size x size` game with a seeded RNG.
    pub fn from_seed(size: usize, seed: u64) -> Self {
        Game::new(size, StdRng::seed_from_u64(seed))
    }

    /// Fresh `size x size` game seeded from OS entropy.
    pub fn from_entropy(size: usize) -> Self {
        Game::new(size, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    /// Start from an empty board and place the two opening tiles.
    pub fn new(size: usize, mut rng: R) -> Self {
        let mut grid = Grid::new(size);
        for _ in 0..2 {
            if let Some(s) = engine::spawn_tile(&mut grid, &mut rng) {
                debug!("opening tile {} at ({}, {})", s.value, s.row, s.col);
            }
        }
        Game { grid, rng, moves: 0 }
    }

    /// Resume from a known board without placing any tiles.
    pub fn with_grid(grid: Grid, rng: R) -> Self {
        Game { grid, rng, moves: 0 }
    }

    /// Read-only view of the current board.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of effective moves applied so far.
    #[inline]
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// Resolve `direction`; on change, spawn one tile on the new board and
    /// swap it in. An ineffective move leaves both the board and the RNG
    /// untouched.
    pub fn apply(&mut self, direction: Direction) -> MoveOutcome {
        let engine::MoveResult { mut grid, changed } = engine::resolve_move(&self.grid, direction);
        if !changed {
            trace!("move {direction} had no effect");
            return MoveOutcome {
                changed: false,
                spawn: None,
            };
        }
        let spawn = engine::spawn_tile(&mut grid, &mut self.rng);
        self.grid = grid;
        self.moves += 1;
        match spawn {
            Some(s) => debug!(
                "move {} -> {direction}, spawned {} at ({}, {})",
                self.moves, s.value, s.row, s.col
            ),
            None => debug!("move {} -> {direction}, board full", self.moves),
        }
        MoveOutcome {
            changed: true,
            spawn,
        }
    }

    /// Consume the game, returning its board.
    pub fn into_grid(self) -> Grid {
        self.grid
    }
}
