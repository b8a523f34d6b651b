use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use minegym_core::{BoardGenerator, Game, GameConfig, UniformGenerator};
use serde_json::json;
use std::hint::black_box;

const TIERS: [(&str, GameConfig); 3] = [
    ("beginner", GameConfig::new(9, 9, 10)),
    ("intermediate", GameConfig::new(16, 16, 40)),
    ("expert", GameConfig::new(16, 30, 99)),
];

fn bench_generate(c: &mut Criterion) {
    for (tier, config) in TIERS {
        c.bench_function(&format!("generate/{tier}"), |b| {
            let mut seed = 0u64;
            b.iter(|| {
                seed = seed.wrapping_add(1);
                black_box(UniformGenerator::new(seed).generate(config).unwrap())
            })
        });
    }
}

fn bench_flood_full_board(c: &mut Criterion) {
    // mine-free board: the first reveal floods every cell
    for (tier, config) in TIERS {
        let empty = GameConfig::new(config.rows, config.cols, 0);
        let request = json!({"type": "reveal", "row": 0, "col": 0});
        c.bench_function(&format!("flood_full_board/{tier}"), |b| {
            b.iter_batched(
                || Game::new(empty, Some(3)).unwrap(),
                |mut game| black_box(game.do_action(&request)),
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(gen_tiers, bench_generate, bench_flood_full_board);
criterion_main!(gen_tiers);
