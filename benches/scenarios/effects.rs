use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::{
    effects::{Drums, DrumsParams, Echo, Effect, Fuzz, Gate, StreamConfig},
    io::{AssetBank, SampleBuffer},
    sequencing::Transport,
};

use crate::BLOCK_SIZES;

fn bench_stereo_effect<E: Effect>(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    mut effect: E,
    size: usize,
) {
    effect.start(&StreamConfig::new(48_000.0, 2, 2, size));

    let input: Vec<f32> = (0..size).map(|i| 0.5 * (i as f32 * 0.05).sin()).collect();
    let mut left = vec![0.0f32; size];
    let mut right = vec![0.0f32; size];
    let transport = Transport::default();
    let inputs: [&[f32]; 2] = [&input, &input];

    group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
        b.iter(|| {
            let mut outputs: [&mut [f32]; 2] = [&mut left, &mut right];
            effect
                .process(black_box(&inputs), &mut outputs, size, &transport)
                .unwrap();
        })
    });
}

pub fn bench_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/effects");

    for &size in BLOCK_SIZES {
        bench_stereo_effect(&mut group, "echo", Echo::default(), size);
        bench_stereo_effect(&mut group, "fuzz", Fuzz::default(), size);
        bench_stereo_effect(&mut group, "gate", Gate::default(), size);

        // Drums at 140 bpm with both voices active
        let hit: Vec<f32> = (0..9_600).map(|i| (-(i as f32) / 1_500.0).exp()).collect();
        let bank = AssetBank::new()
            .with(SampleBuffer::new(hit.clone(), 44_100.0).into_shared())
            .with(SampleBuffer::new(hit, 48_000.0).into_shared());
        let mut drums = Drums::new(DrumsParams::default(), bank);
        drums.start(&StreamConfig::new(48_000.0, 0, 2, size));

        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        let mut transport = Transport {
            playing: true,
            bpm: 140.0,
            ..Transport::default()
        };

        group.bench_with_input(BenchmarkId::new("drums", size), &size, |b, _| {
            b.iter(|| {
                let mut outputs: [&mut [f32]; 2] = [&mut left, &mut right];
                drums
                    .process(&[], &mut outputs, size, black_box(&transport))
                    .unwrap();
                transport.time_in_samples += size as i64;
            })
        });
    }

    group.finish();
}
