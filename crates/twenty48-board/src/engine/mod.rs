//! Engine module: square 2048 board, move resolution and tile spawning.
//!
//! - `Grid` is the N x N state with useful methods.
//! - Free functions carry the move algorithm: every direction is reduced to
//!   a left slide by turning the board with `rotate`, sliding rows with
//!   `slide_row`, and turning it back.

mod ops;
pub mod state;

pub use state::{Direction, Grid, MoveResult, Spawn, Tile, DEFAULT_SIZE, MAX_TILE};

pub use ops::{
    changed_cells, insert_random_tile, resolve_move, rotate, rotate_times, slide_row, spawn_tile,
};
