use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::dsp::oscillator::{Phase, Shape};

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        for shape in [Shape::Sine, Shape::Triangle, Shape::Square] {
            let mut phase = Phase::default();
            let increment = 440.0 / 48_000.0;
            group.bench_with_input(
                BenchmarkId::new(shape.name().to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        for out in buffer.iter_mut() {
                            *out = phase.eval(black_box(shape));
                            phase.advance(increment);
                        }
                    })
                },
            );
        }
    }

    group.finish();
}
