use anyhow::{ensure, Result};
use rand::Rng;
use std::fmt;

use super::ops;
use serde::{Deserialize, Serialize};

/// Value held by a single cell: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;

/// Side length of the default board.
pub const DEFAULT_SIZE: usize = 4;

/// Largest tile accepted when building a board from explicit rows.
pub const MAX_TILE: Tile = 1 << 30;

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Number of clockwise quarter turns that make this direction equivalent to `Left`.
    #[inline]
    pub fn rotations(self) -> usize {
        match self {
            Direction::Left => 0,
            Direction::Down => 1,
            Direction::Right => 2,
            Direction::Up => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Square N x N board stored row-major. The side length is fixed at construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    pub(crate) size: usize,
    pub(crate) cells: Vec<Tile>,
}

impl Grid {
    /// An all-empty board of side `size`.
    ///
    /// ```
    /// use twenty48_board::engine::Grid;
    /// let g = Grid::new(4);
    /// assert_eq!(g.count_empty(), 16);
    /// ```
    pub fn new(size: usize) -> Self {
        debug_assert!(size > 0, "grid size must be positive");
        Grid {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Build a board from explicit rows, rejecting non-square input and
    /// values that are neither 0 nor a power of two in `2..=MAX_TILE`.
    ///
    /// ```
    /// use twenty48_board::engine::Grid;
    /// let g = Grid::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
    /// assert_eq!(g.get(1, 1), 4);
    /// assert!(Grid::from_rows(vec![vec![3, 0], vec![0, 0]]).is_err());
    /// ```
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self> {
        let size = rows.len();
        ensure!(size > 0, "grid must have at least one row");
        let mut cells = Vec::with_capacity(size * size);
        for (r, row) in rows.into_iter().enumerate() {
            ensure!(
                row.len() == size,
                "row {r} has {} cells, expected {size}",
                row.len()
            );
            for (c, v) in row.into_iter().enumerate() {
                ensure!(
                    v == 0 || (v >= 2 && v.is_power_of_two()),
                    "cell ({r}, {c}) holds {v}, which is not a tile value"
                );
                ensure!(v <= MAX_TILE, "cell ({r}, {c}) holds {v}, above {MAX_TILE}");
                cells.push(v);
            }
        }
        Ok(Grid { size, cells })
    }

    /// Side length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Value at `(row, col)`; 0 means empty.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Tile {
        self.cells[row * self.size + col]
    }

    #[inline]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: Tile) {
        self.cells[row * self.size + col] = value;
    }

    /// Row `idx` as a slice.
    #[inline]
    pub fn row(&self, idx: usize) -> &[Tile] {
        &self.cells[idx * self.size..(idx + 1) * self.size]
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> + '_ {
        self.cells.chunks(self.size)
    }

    /// Copy the board out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    /// Iterate over `(row, col, value)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i / size, i % size, v))
    }

    /// Coordinates of every empty cell in row-major order.
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells()
            .filter(|&(_, _, v)| v == 0)
            .map(|(r, c, _)| (r, c))
            .collect()
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == 0).count()
    }

    /// Return the highest tile value present, or 0 for an empty board.
    #[inline]
    pub fn highest_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_board::engine::{Direction, Grid};
    /// let g = Grid::from_rows(vec![vec![0, 2], vec![0, 0]]).unwrap();
    /// let moved = g.shift(Direction::Left);
    /// assert_eq!(moved.get(0, 0), 2);
    /// ```
    #[inline]
    pub fn shift(&self, dir: Direction) -> Self {
        ops::resolve_move(self, dir).grid
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty slot, using the provided RNG.
    /// A full board is returned unchanged.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_board::engine::Grid;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let g = Grid::new(4).with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(g.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        ops::spawn_tile(&mut self, rng);
        self
    }

    /// Convenience: like `with_random_tile` but uses thread-local RNG.
    #[inline]
    pub fn with_random_tile_thread(self) -> Self {
        let mut rng = rand::thread_rng();
        self.with_random_tile(&mut rng)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Grid::new(DEFAULT_SIZE)
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("rows", &self.to_rows())
            .finish()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.size * 8);
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f, "{rule}")?;
            }
            let cells: Vec<String> = row.iter().map(|&v| ops::format_val(v)).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

/// Outcome of resolving a direction against a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    pub grid: Grid,
    /// True iff `grid` differs from the input in at least one cell.
    pub changed: bool,
}

/// A tile placed by a spawn event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawn {
    pub row: usize,
    pub col: usize,
    pub value: Tile,
}
