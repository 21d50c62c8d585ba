use log::trace;
use rand::Rng;

use super::state::{Direction, Grid, MoveResult, Spawn, Tile};

/// Resolve `direction` against `grid` without touching the grid or any RNG.
///
/// The board is turned so that `direction` becomes a left slide, every row
/// is slid, and the result is turned back by the complementary count.
///
/// ```
/// use twenty48_board::engine::{resolve_move, Direction, Grid};
/// let g = Grid::from_rows(vec![vec![0, 2], vec![0, 2]]).unwrap();
/// let res = resolve_move(&g, Direction::Up);
/// assert!(res.changed);
/// assert_eq!(res.grid.to_rows(), vec![vec![0, 4], vec![0, 0]]);
/// ```
pub fn resolve_move(grid: &Grid, direction: Direction) -> MoveResult {
    let k = direction.rotations();
    let turned = rotate_times(grid, k);
    let mut cells = Vec::with_capacity(turned.cells.len());
    for row in turned.rows() {
        cells.extend(slide_row(row));
    }
    let slid = Grid {
        size: turned.size,
        cells,
    };
    let restored = rotate_times(&slid, (4 - k) % 4);
    let changed = restored != *grid;
    trace!("resolved {direction}: changed={changed}");
    MoveResult {
        grid: restored,
        changed,
    }
}

/// Rotate the board a quarter turn clockwise: `new[r][c] = old[N-1-c][r]`.
pub fn rotate(grid: &Grid) -> Grid {
    let n = grid.size;
    let mut cells = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            cells.push(grid.get(n - 1 - c, r));
        }
    }
    Grid { size: n, cells }
}

/// Apply [`rotate`] `times % 4` times.
pub fn rotate_times(grid: &Grid, times: usize) -> Grid {
    (0..times % 4).fold(grid.clone(), |g, _| rotate(&g))
}

/// Slide a single row toward index 0, merging equal neighbours once each.
///
/// A tile produced by a merge does not merge again within the same call,
/// so `[4, 4, 4, 4]` becomes `[8, 8, 0, 0]`. A pair whose sum would not fit
/// in a [`Tile`] stays unmerged.
///
/// ```
/// use twenty48_board::engine::slide_row;
/// assert_eq!(slide_row(&[2, 0, 2, 4]), vec![4, 4, 0, 0]);
/// ```
pub fn slide_row(row: &[Tile]) -> Vec<Tile> {
    let tiles: Vec<Tile> = row.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(row.len());
    let mut i = 0;
    while i < tiles.len() {
        let merged = match tiles.get(i + 1) {
            Some(&next) if next == tiles[i] => tiles[i].checked_mul(2),
            _ => None,
        };
        if let Some(v) = merged {
            out.push(v);
            i += 2;
        } else {
            out.push(tiles[i]);
            i += 1;
        }
    }
    out.resize(row.len(), 0);
    out
}

/// Place a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
/// Returns `None` and leaves the board alone when it is full.
pub fn spawn_tile<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Spawn> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    let value = generate_random_tile(rng);
    grid.set(row, col, value);
    Some(Spawn { row, col, value })
}

/// Insert a random tile using thread-local RNG.
///
/// For reproducible behavior, prefer `spawn_tile(&mut grid, &mut impl Rng)`.
pub fn insert_random_tile(grid: Grid) -> Grid {
    grid.with_random_tile_thread()
}

pub(crate) fn generate_random_tile<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..10u32) < 9 {
        2
    } else {
        4
    }
}

/// Cells whose value differs between `before` and `after` and which are
/// occupied afterwards. Boards of different sizes yield nothing.
pub fn changed_cells(before: &Grid, after: &Grid) -> Vec<(usize, usize)> {
    if before.size != after.size {
        return Vec::new();
    }
    after
        .cells()
        .filter(|&(r, c, v)| v != 0 && v != before.get(r, c))
        .map(|(r, c, _)| (r, c))
        .collect()
}

pub(crate) fn format_val(val: Tile) -> String {
    match val {
        0 => String::from("       "),
        x => format!("{:^7}", x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::state::MAX_TILE;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid(rows: &[&[Tile]]) -> Grid {
        Grid::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    fn sample() -> Grid {
        grid(&[&[2, 4, 8, 16], &[2, 8, 8, 4], &[4, 0, 0, 4], &[2, 0, 0, 4]])
    }

    fn sample_cols() -> Grid {
        grid(&[&[2, 2, 4, 2], &[4, 8, 0, 0], &[8, 8, 0, 0], &[16, 4, 4, 4]])
    }

    #[test]
    fn it_slide_row() {
        assert_eq!(slide_row(&[0, 0, 0, 0]), vec![0, 0, 0, 0]);
        assert_eq!(slide_row(&[2, 4, 2, 4]), vec![2, 4, 2, 4]);
        assert_eq!(slide_row(&[2, 2, 4, 4]), vec![4, 8, 0, 0]);
        assert_eq!(slide_row(&[2, 0, 2, 4]), vec![4, 4, 0, 0]);
        assert_eq!(slide_row(&[2, 0, 0, 2]), vec![4, 0, 0, 0]);
        assert_eq!(slide_row(&[0, 2, 2, 2]), vec![4, 2, 0, 0]);
    }

    #[test]
    fn slide_row_does_not_chain_merges() {
        assert_eq!(slide_row(&[4, 4, 4, 4]), vec![8, 8, 0, 0]);
        assert_eq!(slide_row(&[2, 2, 4, 0]), vec![4, 4, 0, 0]);
        assert_eq!(slide_row(&[8, 4, 4, 0]), vec![8, 8, 0, 0]);
    }

    #[test]
    fn slide_row_is_idempotent_on_settled_rows() {
        let rows: [Vec<Tile>; 5] = [
            vec![4, 8, 0, 0],
            vec![0, 0, 0, 0],
            vec![2, 4, 2, 4],
            vec![16, 0, 0, 0],
            vec![2, 4, 8, 16, 32],
        ];
        for row in rows {
            let once = slide_row(&row);
            assert_eq!(slide_row(&once), once);
        }
    }

    #[test]
    fn largest_tiles_merge_without_overflow() {
        let g = grid(&[&[MAX_TILE, MAX_TILE], &[0, 0]]);
        let res = resolve_move(&g, Direction::Left);
        assert!(res.changed);
        assert_eq!(res.grid.to_rows(), vec![vec![1 << 31, 0], vec![0, 0]]);

        let top = 1u32 << 31;
        assert_eq!(slide_row(&[top, top, 0]), vec![top, top, 0]);
        assert_eq!(slide_row(&[0, top, top]), vec![top, top, 0]);
    }

    #[test]
    fn slide_row_keeps_width() {
        assert_eq!(slide_row(&[2, 2, 2, 2, 2, 2]), vec![4, 4, 4, 0, 0, 0]);
        assert_eq!(slide_row(&[0, 2]), vec![2, 0]);
    }

    #[test]
    fn rotate_is_clockwise() {
        let g = grid(&[&[2, 4], &[8, 16]]);
        assert_eq!(rotate(&g).to_rows(), vec![vec![8, 2], vec![16, 4]]);
    }

    #[test]
    fn rotate_round_trips() {
        let g = sample();
        assert_eq!(rotate_times(&g, 4), g);
        for k in 0..4 {
            let there = rotate_times(&g, k);
            assert_eq!(rotate_times(&there, (4 - k) % 4), g, "k = {k}");
        }
        let odd = grid(&[&[2, 0, 4], &[0, 8, 0], &[16, 0, 32]]);
        for k in 0..4 {
            assert_eq!(rotate_times(&rotate_times(&odd, k), 4 - k), odd);
        }
    }

    #[test]
    fn test_move_left() {
        let res = resolve_move(&sample(), Direction::Left);
        assert!(res.changed);
        assert_eq!(
            res.grid,
            grid(&[&[2, 4, 8, 16], &[2, 16, 4, 0], &[8, 0, 0, 0], &[2, 4, 0, 0]])
        );
    }

    #[test]
    fn test_move_right() {
        let res = resolve_move(&sample(), Direction::Right);
        assert!(res.changed);
        assert_eq!(
            res.grid,
            grid(&[&[2, 4, 8, 16], &[0, 2, 16, 4], &[0, 0, 0, 8], &[0, 0, 2, 4]])
        );
    }

    #[test]
    fn test_move_up() {
        let res = resolve_move(&sample_cols(), Direction::Up);
        assert!(res.changed);
        assert_eq!(
            res.grid,
            grid(&[&[2, 2, 8, 2], &[4, 16, 0, 4], &[8, 4, 0, 0], &[16, 0, 0, 0]])
        );
    }

    #[test]
    fn test_move_down() {
        let res = resolve_move(&sample_cols(), Direction::Down);
        assert!(res.changed);
        assert_eq!(
            res.grid,
            grid(&[&[2, 0, 0, 0], &[4, 2, 0, 0], &[8, 16, 0, 2], &[16, 4, 8, 4]])
        );
    }

    #[test]
    fn resolve_move_leaves_input_alone() {
        let g = sample();
        let before = g.clone();
        let _ = resolve_move(&g, Direction::Down);
        assert_eq!(g, before);
    }

    #[test]
    fn packed_board_reports_no_change() {
        let g = grid(&[&[2, 4, 8, 16], &[4, 8, 16, 32], &[8, 16, 32, 64], &[16, 32, 64, 128]]);
        for dir in Direction::ALL {
            let res = resolve_move(&g, dir);
            assert!(!res.changed, "{dir}");
            assert_eq!(res.grid, g);
        }
    }

    #[test]
    fn packed_left_can_still_move_right() {
        let g = grid(&[&[2, 4, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        assert!(!resolve_move(&g, Direction::Left).changed);
        assert!(!resolve_move(&g, Direction::Up).changed);
        assert!(resolve_move(&g, Direction::Right).changed);
        assert!(resolve_move(&g, Direction::Down).changed);
    }

    #[test]
    fn left_on_split_pair() {
        let g = grid(&[&[0, 2, 0, 2], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        let res = resolve_move(&g, Direction::Left);
        assert!(res.changed);
        assert_eq!(res.grid.row(0), &[4, 0, 0, 0]);
        assert_eq!(res.grid.count_empty(), 15);
    }

    #[test]
    fn spawn_on_full_board_is_noop() {
        let mut g = grid(&[&[2, 4], &[8, 16]]);
        let before = g.clone();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(spawn_tile(&mut g, &mut rng), None);
        assert_eq!(g, before);
    }

    #[test]
    fn spawn_with_fixed_rng_takes_first_empty_cell() {
        let mut g = grid(&[&[2, 0], &[0, 0]]);
        let mut rng = StepRng::new(0, 0);
        let spawn = spawn_tile(&mut g, &mut rng).unwrap();
        assert_eq!(spawn, Spawn { row: 0, col: 1, value: 2 });
        assert_eq!(g.to_rows(), vec![vec![2, 2], vec![0, 0]]);
    }

    #[test]
    fn spawn_is_reproducible_with_seed() {
        let a = Grid::new(4)
            .with_random_tile(&mut StdRng::seed_from_u64(99))
            .with_random_tile(&mut StdRng::seed_from_u64(100));
        let b = Grid::new(4)
            .with_random_tile(&mut StdRng::seed_from_u64(99))
            .with_random_tile(&mut StdRng::seed_from_u64(100));
        assert_eq!(a, b);
    }

    #[test]
    fn spawn_value_distribution() {
        let mut rng = StdRng::seed_from_u64(7);
        let trials = 10_000;
        let mut fours = 0;
        for _ in 0..trials {
            let mut g = Grid::new(4);
            let spawn = spawn_tile(&mut g, &mut rng).unwrap();
            assert!(spawn.value == 2 || spawn.value == 4);
            assert_eq!(g.get(spawn.row, spawn.col), spawn.value);
            assert_eq!(g.count_empty(), 15);
            if spawn.value == 4 {
                fours += 1;
            }
        }
        assert!((700..1300).contains(&fours), "fours = {fours}");
    }

    #[test]
    fn spawn_cell_is_uniform() {
        let mut rng = StdRng::seed_from_u64(21);
        let trials = 16_000;
        let mut hits = [[0u32; 4]; 4];
        for _ in 0..trials {
            let mut g = Grid::new(4);
            let spawn = spawn_tile(&mut g, &mut rng).unwrap();
            hits[spawn.row][spawn.col] += 1;
        }
        // Expected 1000 per cell; the band is about five standard deviations.
        for (r, row) in hits.iter().enumerate() {
            for (c, &n) in row.iter().enumerate() {
                assert!((850..1150).contains(&n), "cell ({r}, {c}) hit {n} times");
            }
        }
    }

    #[test]
    fn spawn_only_lands_on_empty_cells() {
        let mut rng = StdRng::seed_from_u64(4);
        let start = grid(&[&[2, 0, 4, 0], &[8, 8, 8, 8], &[0, 2, 2, 2], &[4, 4, 4, 0]]);
        let mut seen = Vec::new();
        for _ in 0..400 {
            let mut g = start.clone();
            let spawn = spawn_tile(&mut g, &mut rng).unwrap();
            assert_eq!(start.get(spawn.row, spawn.col), 0);
            if !seen.contains(&(spawn.row, spawn.col)) {
                seen.push((spawn.row, spawn.col));
            }
        }
        seen.sort();
        assert_eq!(seen, start.empty_cells());
    }

    #[test]
    fn it_test_insert_random_tile() {
        let mut g = Grid::new(4);
        for _ in 0..16 {
            g = insert_random_tile(g);
        }
        assert_eq!(g.count_empty(), 0);
        assert_eq!(insert_random_tile(g.clone()), g);
    }

    #[test]
    fn changed_cells_skips_emptied_cells() {
        let before = grid(&[&[0, 2, 0, 2], &[0, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 0, 0]]);
        let after = grid(&[&[4, 0, 0, 0], &[0, 0, 0, 0], &[0, 0, 2, 0], &[0, 0, 0, 0]]);
        assert_eq!(changed_cells(&before, &after), vec![(0, 0), (2, 2)]);
        assert!(changed_cells(&after, &after).is_empty());
        assert!(changed_cells(&Grid::new(3), &after).is_empty());
    }

    #[test]
    fn it_format_val() {
        assert_eq!(format_val(0), "       ");
        assert_eq!(format_val(2).trim(), "2");
        assert_eq!(format_val(2048).len(), 7);
    }
}
