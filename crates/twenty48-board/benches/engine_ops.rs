use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;
use twenty48_board::engine::{resolve_move, rotate, Direction, Grid};
use twenty48_board::session::Game;

fn corpus() -> Vec<Grid> {
    let mut game = Game::from_seed(4, 42);
    let mut grids = vec![Grid::new(4), game.grid().clone()];
    // Derive a variety of densities deterministically
    for i in 0..20 {
        game.apply(Direction::ALL[i % 4]);
        grids.push(game.grid().clone());
    }
    grids
}

fn bench_resolve(c: &mut Criterion) {
    for dir in Direction::ALL {
        c.bench_function(&format!("resolve/{dir}"), |bch| {
            let grids = corpus();
            bch.iter(|| {
                let mut changed = 0usize;
                for g in &grids {
                    changed += resolve_move(g, dir).changed as usize;
                }
                black_box(changed)
            })
        });
    }
    c.bench_function("rotate", |bch| {
        let grids = corpus();
        bch.iter(|| {
            for g in &grids {
                black_box(rotate(g));
            }
        })
    });
}

fn bench_spawn_and_play(c: &mut Criterion) {
    c.bench_function("grid/with_random_tile", |bch| {
        bch.iter_batched(
            || (Grid::new(4), StdRng::seed_from_u64(7)),
            |(mut g, mut rng)| {
                for _ in 0..16 {
                    g = g.with_random_tile(&mut rng);
                }
                black_box(g)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("game/apply_cycle", |bch| {
        bch.iter_batched(
            || Game::from_seed(4, 9),
            |mut game| {
                for i in 0..64 {
                    game.apply(Direction::ALL[i % 4]);
                }
                black_box(game.into_grid())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(engine_ops, bench_resolve, bench_spawn_and_play);
criterion_main!(engine_ops);
