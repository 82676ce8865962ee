mod common;

use std::hint::black_box;

use circle_pack::prelude::{pack_circles, OverlapIndex, PackConfig, UpdateMode};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TARGETS: [usize; 3] = [300, 1000, 3000];

fn bench_config(
    c: &mut Criterion,
    name: &str,
    mut make_config: impl FnMut(usize) -> PackConfig,
) {
    let mask = common::blob_mask(512);
    let mut group = c.benchmark_group(name);

    for &n in &TARGETS {
        let config = make_config(n);

        // Preview a run to report throughput in placed circles per iteration.
        let mut rng_preview = StdRng::seed_from_u64(0xC1C1E);
        let preview = pack_circles(&mask, &config, &mut rng_preview, None)
            .expect("bench config is valid");
        group.throughput(common::elements_throughput(preview.placed_count()));

        group.bench_with_input(BenchmarkId::from_parameter(n), &config, |b, config| {
            b.iter_batched(
                || StdRng::seed_from_u64(12345),
                |mut rng| {
                    let result = pack_circles(&mask, config, &mut rng, None)
                        .expect("bench config is valid");
                    black_box(result.attempts);
                    black_box(result.placed_count());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn packing_overlap_index_benches(c: &mut Criterion) {
    bench_config(c, "packing/linear_scan", |n| {
        PackConfig::new(n, 1.0, 12.0).with_overlap_index(OverlapIndex::LinearScan)
    });
    bench_config(c, "packing/bucket_grid", |n| {
        PackConfig::new(n, 1.0, 12.0).with_overlap_index(OverlapIndex::BucketGrid)
    });
}

fn packing_update_benches(c: &mut Criterion) {
    bench_config(c, "packing/update_every_100", |n| {
        PackConfig::new(n, 1.0, 12.0).with_update(UpdateMode::Every(100))
    });
    bench_config(c, "packing/update_every_placement", |n| {
        PackConfig::new(n, 1.0, 12.0).with_update(UpdateMode::EveryPlacement)
    });
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = packing_overlap_index_benches, packing_update_benches
}
criterion_main!(benches);
