use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::dsp::filter::OnePole;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();
        let mut buffer = input.clone();

        let mut low = OnePole::with_frequency(1_200.0, 48_000.0);
        group.bench_with_input(BenchmarkId::new("low_pass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                low.low_pass_buffer(black_box(&mut buffer));
            })
        });

        // Coefficients recomputed every block, as the effects do
        let mut high = OnePole::new();
        let mut cutoff = 40.0;
        group.bench_with_input(BenchmarkId::new("high_pass_retuned", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 1_000.0 { 40.0 } else { cutoff * 1.01 };
                high.set_frequency(black_box(cutoff), 48_000.0);
                buffer.copy_from_slice(&input);
                high.high_pass_buffer(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
