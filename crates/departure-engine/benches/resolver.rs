use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use chrono::TimeZone;
use departure_engine::{next_departures_in, Timetable, JST};

/// A full service day at five-minute headways, denser than any real table.
fn dense_table() -> Timetable {
    Timetable::from_hours((6u32..=21).map(|hour| (hour, (0..60).step_by(5).collect())))
        .expect("dense rows are valid")
}

fn resolver_benchmark(c: &mut Criterion) {
    let table = dense_table();
    let queries: Vec<_> = (0u32..24)
        .map(|hour| JST.with_ymd_and_hms(2026, 8, 26, hour, 17, 0).unwrap())
        .collect();

    c.bench_function("next_departures_in day sweep", |b| {
        b.iter(|| {
            for at in &queries {
                black_box(next_departures_in(&table, black_box(at)));
            }
        })
    });
}

fn parse_benchmark(c: &mut Criterion) {
    let csv = (6u32..=21)
        .map(|hour| format!("{hour},0,5,10,15,20,25,30,35,40,45,50,55"))
        .collect::<Vec<_>>()
        .join("\n");

    c.bench_function("Timetable parse", |b| {
        b.iter(|| Timetable::parse_reader(black_box(csv.as_bytes())).expect("valid rows"))
    });
}

criterion_group!(benches, resolver_benchmark, parse_benchmark);
criterion_main!(benches);
