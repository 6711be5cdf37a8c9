use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::{Array3, Array4};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vision_augment::{
    AffineTransform, Augmentation, AugmentationConfig, BatchAugmenter, BatchConfig, FillMode,
    Interpolation, ProjectiveWarp, RandomShear, Warp,
};

/// Benchmarks for the CPU warp and the full random shear.
///
/// To run these, use:
/// ```bash
/// cargo bench -p vision_augment
/// ```

/// Square image sides swept by every benchmark.
const SIDES: [usize; 3] = [64, 224, 512];

fn gradient(side: usize) -> Array3<f32> {
    Array3::from_shape_fn((side, side, 3), |(y, x, c)| ((x + y + c) % 256) as f32)
}

/// Single warp pass per interpolation mode
fn bench_warp(c: &mut Criterion) {
    let mut group = c.benchmark_group("ProjectiveWarp");

    for &side in &SIDES {
        let batch: Array4<f32> = gradient(side).insert_axis(ndarray::Axis(0));
        group.throughput(Throughput::Elements((side * side) as u64));

        for interpolation in [Interpolation::Nearest, Interpolation::Bilinear] {
            let config = AugmentationConfig {
                interpolation,
                fill_mode: FillMode::Reflect,
                fill_value: 0.0,
            };
            group.bench_with_input(
                BenchmarkId::new(interpolation.to_string(), side),
                &batch,
                |b, batch| {
                    b.iter(|| {
                        ProjectiveWarp
                            .warp(
                                black_box(batch.view()),
                                &[AffineTransform::shear_x(0.2)],
                                &config,
                            )
                            .expect("warp")
                    })
                },
            );
        }
    }
    group.finish();
}

/// Sample + X and Y shear per image
fn bench_random_shear(c: &mut Criterion) {
    let mut group = c.benchmark_group("RandomShear");
    let shear = RandomShear::builder()
        .x((0.1, 0.3))
        .y((0.1, 0.3))
        .build()
        .expect("valid ranges");

    for &side in &SIDES {
        let image = gradient(side);
        group.throughput(Throughput::Elements((side * side) as u64));
        group.bench_with_input(BenchmarkId::new("xy", side), &image, |b, image| {
            let mut rng = StdRng::seed_from_u64(0);
            b.iter(|| {
                let sample = shear.sample_transformation(&mut rng);
                shear
                    .augment_image(black_box(image.clone()), &sample)
                    .expect("shear")
            })
        });
    }
    group.finish();
}

/// Batch of 32 images across worker counts
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("BatchAugmenter");
    let images = vec![gradient(224); 32];

    for workers in [0, 2, 4] {
        let shear = RandomShear::builder().x(0.3).build().expect("valid range");
        let augmenter = BatchAugmenter::new(
            shear,
            BatchConfig::builder().seed(42).num_workers(workers).build(),
        );
        group.bench_function(BenchmarkId::new("workers", workers), |b| {
            b.iter(|| augmenter.augment_batch(images.clone(), 0).expect("batch"))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_warp, bench_random_shear, bench_batch);
criterion_main!(benches);
