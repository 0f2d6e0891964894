//! Benchmarks for the stowage engine's hot paths.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stowage::cancellation::CancellationToken;
use stowage::container::{Container, OpenFace};
use stowage::geometry::Dimensions;
use stowage::grid::OccupancyGrid;
use stowage::item::{Item, Priority};
use stowage::orientation::all_orientations;
use stowage::placement::find_valid_placements;

fn half_filled_grid() -> OccupancyGrid {
    let mut grid = OccupancyGrid::new(Dimensions::new(20, 16, 10).unwrap());
    grid.occupy(stowage::geometry::Coordinate::origin(), Dimensions::new(10, 16, 10).unwrap(), "FILL".into())
        .unwrap();
    grid
}

/// Benchmark enumerating every orientation of an item's dimensions.
fn bench_all_orientations(c: &mut Criterion) {
    let dims = Dimensions::new(3, 4, 2).unwrap();
    c.bench_function("all_orientations", |b| {
        b.iter(|| {
            for orientation in all_orientations() {
                black_box(orientation.apply(black_box(dims)));
            }
        })
    });
}

/// Benchmark placement search against a partially filled container.
fn bench_find_valid_placements(c: &mut Criterion) {
    let grid = half_filled_grid();
    let dims = Dimensions::new(2, 2, 2).unwrap();
    c.bench_function("find_valid_placements", |b| {
        b.iter(|| find_valid_placements(black_box(&grid), black_box(dims)))
    });
}

/// Benchmark the largest-empty-box scan used by fragmentation analysis.
fn bench_find_largest_empty_box(c: &mut Criterion) {
    let grid = half_filled_grid();
    let token = CancellationToken::never();
    c.bench_function("find_largest_empty_box", |b| {
        b.iter(|| grid.find_largest_empty_box(black_box(&token)).unwrap())
    });
}

/// Benchmark ranked placement end to end through `Container::place_item`.
fn bench_place_item_ranked(c: &mut Criterion) {
    c.bench_function("place_item_ranked", |b| {
        b.iter_batched(
            || Container::new("bench", "zone-a", Dimensions::new(20, 16, 10).unwrap(), OpenFace::Front),
            |mut container| {
                let item = Item::new("I", "i", Dimensions::new(2, 2, 2).unwrap(), 1.0, Priority::Medium).unwrap();
                container.place_item(black_box(item), Default::default()).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_all_orientations,
    bench_find_valid_placements,
    bench_find_largest_empty_box,
    bench_place_item_ranked
);
criterion_main!(benches);
