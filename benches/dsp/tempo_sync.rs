use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::sequencing::{Rate, TempoSync, Transport};

use crate::BLOCK_SIZES;

pub fn bench_tempo_sync(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/tempo_sync");

    for &size in BLOCK_SIZES {
        let mut triggers = vec![false; size];
        let mut sync = TempoSync::with_rate(Rate::ThreeSixteenths);
        let mut transport = Transport {
            playing: true,
            ..Transport::default()
        };

        group.bench_with_input(BenchmarkId::new("triggers", size), &size, |b, _| {
            b.iter(|| {
                sync.process(black_box(&transport), 48_000.0, &mut triggers);
                transport.time_in_samples += size as i64;
            })
        });
    }

    group.finish();
}
