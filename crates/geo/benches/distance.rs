//! Benchmarks for distance, parsing and proximity search.

use bookax_geo::{
    bounding_box, distance_km, parse_postgis_value, search, GeoPoint, LocatedItem, ProximityQuery,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

fn create_test_items(count: usize) -> Vec<LocatedItem> {
    (0..count)
        .map(|i| {
            // Points in a grid around Berlin, alternating storage shapes
            let lat = 52.0 + (i as f64 * 0.01) % 2.0;
            let lng = 13.0 + (i as f64 * 0.01) % 2.0;
            let location = if i % 2 == 0 {
                json!({"type": "Point", "coordinates": [lng, lat]})
            } else {
                json!(format!("SRID=4326;POINT({} {})", lng, lat))
            };
            LocatedItem { id: i as i64, location }
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let berlin = GeoPoint::new(52.5200, 13.4050);
    let munich = GeoPoint::new(48.1351, 11.5820);

    c.bench_function("haversine_single", |b| {
        b.iter(|| distance_km(black_box(&berlin), black_box(&munich)))
    });

    c.bench_function("bounding_box", |b| {
        b.iter(|| bounding_box(black_box(&berlin), black_box(50.0)))
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("proximity_search");
    let query = ProximityQuery::new(GeoPoint::new(52.5, 13.4)).with_radius_km(25.0);

    for size in [10, 100, 1000, 10000].iter() {
        let items = create_test_items(*size);
        group.bench_with_input(BenchmarkId::new("search", size), size, |b, _| {
            b.iter(|| search(black_box(&query), black_box(&items)))
        });
    }

    group.finish();
}

fn bench_postgis_parsing(c: &mut Criterion) {
    let geojson = json!({"type": "Point", "coordinates": [13.4050, 52.5200]});
    let wkt = json!("SRID=4326;POINT(13.4050 52.5200)");

    let mut group = c.benchmark_group("postgis_parsing");

    group.bench_function("geojson", |b| b.iter(|| parse_postgis_value(black_box(&geojson))));
    group.bench_function("wkt", |b| b.iter(|| parse_postgis_value(black_box(&wkt))));

    group.finish();
}

criterion_group!(benches, bench_single_distance, bench_search, bench_postgis_parsing);
criterion_main!(benches);
