//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::dsp::delay::DelayLine;

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        // Read-then-write feedback loop at a fixed delay
        let mut line = DelayLine::default();
        group.bench_with_input(BenchmarkId::new("feedback_4800", size), &size, |b, _| {
            b.iter(|| {
                let mut last = 0.0;
                for &x in &input {
                    let y = line.read_at(black_box(4_800.0));
                    line.write(x + 0.5 * y);
                    last = y;
                }
                last
            })
        });

        // Swept fractional delay (chorus-like modulation)
        let mut line = DelayLine::default();
        group.bench_with_input(BenchmarkId::new("read_swept", size), &size, |b, _| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for (i, &x) in input.iter().enumerate() {
                    let delay = 480.0 + (i as f64 * 0.1).sin() * 48.0;
                    sum += line.read_at(black_box(delay));
                    line.write(x);
                }
                sum
            })
        });
    }

    group.finish();
}
