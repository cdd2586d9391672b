use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use bootseq_core::{Dimensions, SequenceConfig, StormSettings};
use bootseq_engine::{GlyphStormGenerator, PositionAllocator, UsedPositions};

fn bench_generate_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_line");
    let generator = GlyphStormGenerator::new(&StormSettings::default().alphabet).unwrap();

    for width in [20usize, 40, 120] {
        let mut rng = StdRng::seed_from_u64(7);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| {
                let line = generator.generate_line(black_box(width), &mut rng);
                black_box(line);
            });
        });
    }

    group.finish();
}

fn bench_allocate_explosion(c: &mut Criterion) {
    let allocator = PositionAllocator::from_config(&SequenceConfig::default());

    c.bench_function("allocate_8_windows", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let mut used = UsedPositions::new();
            for _ in 0..8 {
                let allocation = allocator.allocate(&used, &mut rng);
                used.insert(allocation.placement.position);
            }
            black_box(used);
        });
    });
}

fn bench_allocate_saturated(c: &mut Criterion) {
    // Small grid: most draws miss and the row-major scan does the work
    let allocator = PositionAllocator::new(
        Dimensions::new(40, 140),
        Dimensions::new(30, 120),
        10,
        4,
        20,
    );
    let mut used = UsedPositions::new();
    for anchor in allocator.anchors().skip(1) {
        used.insert(anchor);
    }

    c.bench_function("allocate_nearly_full_grid", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let allocation = allocator.allocate(black_box(&used), &mut rng);
            black_box(allocation);
        });
    });
}

criterion_group!(
    benches,
    bench_generate_line,
    bench_allocate_explosion,
    bench_allocate_saturated
);
criterion_main!(benches);
