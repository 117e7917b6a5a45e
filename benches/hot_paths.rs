use criterion::{black_box, criterion_group, criterion_main, Criterion};
use geojson::JsonObject;
use tourism_map::data::{Dataset, Feature, YearRange};
use tourism_map::map::SymbolLayer;
use tourism_map::stats::{compute_statistics, group_thousands, parse_value, radius_for};

/// A world-sized dataset: 250 countries, 2013..=2020
fn world_dataset() -> Dataset {
    let range = YearRange::default();
    let features = (0..250u32)
        .map(|i| {
            let mut properties = JsonObject::new();
            for (slot, year) in range.labels().into_iter().enumerate() {
                let value = 1_000.0 + (i as f64 * 7_919.0 + slot as f64 * 104_729.0) % 9e7;
                properties.insert(year, group_thousands(value).into());
            }
            let lon = (i as f64 * 1.44) - 180.0;
            let lat = ((i as f64 * 0.72) % 140.0) - 70.0;
            Feature::new(&format!("Country {i}"), lon, lat, properties)
        })
        .collect();
    Dataset::new(features, range).expect("benchmark dataset")
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_value grouped", |b| {
        b.iter(|| parse_value(black_box("83,634,000")))
    });
}

fn bench_statistics(c: &mut Criterion) {
    let dataset = world_dataset();
    c.bench_function("compute_statistics 250x8", |b| {
        b.iter(|| compute_statistics(black_box(&dataset.features), black_box(&dataset.years)))
    });
}

fn bench_radius(c: &mut Criterion) {
    c.bench_function("radius_for", |b| {
        b.iter(|| radius_for(black_box(42_000_000.0), black_box(486_000.0), black_box(5.0)))
    });
}

fn bench_restyle(c: &mut Criterion) {
    let mut layer = SymbolLayer::new(world_dataset(), 5.0).expect("symbol layer");
    let years = layer.dataset().years.clone();
    let mut i = 0;
    c.bench_function("restyle 250 symbols", |b| {
        b.iter(|| {
            i = (i + 1) % years.len();
            layer.restyle(black_box(&years[i]))
        })
    });
}

criterion_group!(benches, bench_parse, bench_statistics, bench_radius, bench_restyle);
criterion_main!(benches);
