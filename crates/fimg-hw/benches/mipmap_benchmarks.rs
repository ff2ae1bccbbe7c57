//! Benchmarks for mipmap chain computation and context restore

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fimg_hw::texture::mipmap::compute_chain;
use fimg_hw::texture::MipmapLayout;
use fimg_hw::{FimgContext, RegisterIo};

/// Discards writes so only encoder cost is measured
struct NullDevice {
    writes: u64,
}

impl RegisterIo for NullDevice {
    fn write(&mut self, _offset: u32, value: u32) {
        self.writes = self.writes.wrapping_add(value as u64);
    }

    fn read(&mut self, _offset: u32) -> u32 {
        0
    }
}

fn bench_mipmap_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("mipmap_chain");

    for layout in [MipmapLayout::Generic, MipmapLayout::Yuv, MipmapLayout::S3tc] {
        for size in [64u32, 512, 2048] {
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", layout), size),
                &size,
                |b, &size| {
                    b.iter(|| compute_chain(layout, black_box(size), black_box(size), 11));
                },
            );
        }
    }

    group.finish();
}

fn bench_context_restore(c: &mut Criterion) {
    let ctx = FimgContext::new();
    let mut dev = NullDevice { writes: 0 };

    c.bench_function("context_restore", |b| {
        b.iter(|| {
            ctx.restore(&mut dev);
            black_box(dev.writes);
        });
    });
}

criterion_group!(benches, bench_mipmap_chain, bench_context_restore);
criterion_main!(benches);
