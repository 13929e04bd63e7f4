use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tempo_dsp::dsp::player::SamplePlayer;
use tempo_dsp::io::asset::SampleBuffer;

use crate::BLOCK_SIZES;

pub fn bench_player(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/player");

    // One second of noise-like material at 44.1kHz, played back at 48kHz
    let samples: Vec<f32> = (0..44_100).map(|i| ((i * 7919) % 2000) as f32 / 1000.0 - 1.0).collect();
    let asset = SampleBuffer::new(samples, 44_100.0).into_shared();

    for &size in BLOCK_SIZES {
        let mut out = vec![0.0f32; size];
        let mut triggers = vec![false; size];
        triggers[0] = true;

        let mut player = SamplePlayer::new();
        player.bind(&asset);
        player.set_looping(true);
        player.set_speed(1.3);

        group.bench_with_input(BenchmarkId::new("hermite_looping", size), &size, |b, _| {
            b.iter(|| {
                player
                    .render(black_box(&triggers), &mut out, 48_000.0, 0.8)
                    .unwrap();
            })
        });
    }

    group.finish();
}
