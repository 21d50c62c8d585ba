//! twenty48-board: a 2048 board engine
//!
//! This crate provides:
//! - A square `Grid` with pure move resolution (`engine::resolve_move`) built
//!   on a quarter-turn `rotate` primitive and a single left `slide_row`
//! - Random tile spawning with an injectable RNG (`engine::spawn_tile`)
//! - A `Game` session that owns the only mutable grid (`session` module)
//! - Key-name and drag-gesture mapping to directions (`input` module)
//!
//! Quick start:
//! ```
//! use twenty48_board::engine::Direction;
//! use twenty48_board::session::Game;
//!
//! // Deterministic session with a seeded RNG
//! let mut game = Game::from_seed(4, 42);
//! assert_eq!(game.grid().count_empty(), 14);
//! let outcome = game.apply(Direction::Left);
//! if outcome.changed {
//!     assert!(outcome.spawn.is_some());
//! }
//! ```
//!
pub mod engine;
pub mod input;
pub mod session;
