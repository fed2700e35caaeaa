use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use draupnir::{crc64, crc8, random};

fn squeeze_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("squeeze");
    group.throughput(Throughput::Bytes(1024));

    group.bench_function("crc64/1KiB", |b| {
        let mut sponge = crc64().build().unwrap();
        b.iter(|| {
            let mut acc = 0u8;
            for _ in 0..1024 {
                acc ^= sponge.squeeze();
            }
            black_box(acc)
        })
    });

    group.bench_function("crc8/1KiB", |b| {
        let mut sponge = crc8().build().unwrap();
        b.iter(|| {
            let mut acc = 0u8;
            for _ in 0..1024 {
                acc ^= sponge.squeeze();
            }
            black_box(acc)
        })
    });

    group.finish();
}

fn soak_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("soak");
    let message = vec![0xa5u8; 1024];
    group.throughput(Throughput::Bytes(message.len() as u64));

    group.bench_function("crc64/1KiB", |b| {
        let mut sponge = crc64().build().unwrap();
        b.iter(|| {
            sponge.soak(black_box(&message));
        })
    });

    group.finish();
}

fn distribution_cost(c: &mut Criterion) {
    let mut group = c.benchmark_group("random");

    group.bench_function("permutation/52", |b| {
        let mut sponge = crc64().build().unwrap();
        b.iter(|| black_box(random::permutation(&mut sponge, 52)))
    });

    group.bench_function("vose/[1,3,6]x1000", |b| {
        let mut sponge = crc64().build().unwrap();
        b.iter(|| {
            black_box(random::non_uniform_sample_with_replacement(&mut sponge, &[1, 3, 6], 1000))
        })
    });

    group.finish();
}

criterion_group!(benches, squeeze_throughput, soak_throughput, distribution_cost);
criterion_main!(benches);
