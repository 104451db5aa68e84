use std::{hint::black_box, time::Duration};

use criterion::{Criterion, criterion_group, criterion_main};
use rand::prelude::*;

use edit_script::{
    config::{Config, LogConfig, init_config},
    diff::{Diff, EditScript},
    wire::{self, Layout},
};

/// Seeded random bytes, then the same bytes with a sprinkle of edits applied.
fn create_payloads(seed: u64, len: usize, every: usize) -> (Vec<u8>, Vec<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let old: Vec<u8> = (0..len).map(|_| rng.random_range(b' '..=b'_')).collect();
    let mut new = Vec::with_capacity(len);
    for (i, &byte) in old.iter().enumerate() {
        match i % every {
            0 => {}
            1 => {
                new.push(byte);
                new.push(b'!');
            }
            _ => new.push(byte),
        }
    }
    (old, new)
}

fn criterion_benchmark(c: &mut Criterion) {
    init_config(Config {
        log_config: LogConfig::NoLog,
        threads: 1,
    });
    let (old, new) = create_payloads(114514, 16 * 1024, 97);

    c.bench_function("edit_script_diff", |b| {
        b.iter(|| black_box(EditScript::from_compare(black_box(&old), black_box(&new))))
    });

    let script = EditScript::from_compare(&old, &new);
    c.bench_function("edit_script_patch_revert", |b| {
        b.iter(|| {
            black_box(script.patch(black_box(&old)).unwrap());
            black_box(script.revert(black_box(&new)).unwrap());
        })
    });
    c.bench_function("edit_script_render_parse", |b| {
        b.iter(|| {
            let text = wire::render(black_box(script.hunks()), Layout::Compact);
            black_box(wire::parse(&text).unwrap());
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs(20))
        .sample_size(30)
        .warm_up_time(Duration::from_secs(5))
        .noise_threshold(0.1);
    targets = criterion_benchmark
}
criterion_main!(benches);
