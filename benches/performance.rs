use std::collections::BTreeSet;

use criterion::{criterion_group, criterion_main, Criterion};
use shelterdash_core::prelude::{AnimalRecord, RescueCategory};
use shelterdash_operators::table::{self, TableState};
use shelterdash_operators::{BreedChart, LocationMap, Projection, ProjectionInput, SortKey};
use shelterdash_planner::{compile, BreedSelection};

const BREEDS: [&str; 6] = [
    "Labrador Retriever Mix",
    "German Shepherd",
    "Newfoundland",
    "Rottweiler",
    "Poodle",
    "Bloodhound",
];

fn make_rows(rows: usize) -> Vec<AnimalRecord> {
    (0..rows)
        .map(|i| AnimalRecord {
            name: Some(format!("dog-{i}")),
            animal_type: Some("Dog".into()),
            breed: Some(BREEDS[i % BREEDS.len()].into()),
            sex_upon_outcome: Some(if i % 2 == 0 { "Intact Male" } else { "Intact Female" }.into()),
            age_upon_outcome_in_weeks: Some((i % 300) as f64),
            location_lat: Some(30.0 + (i % 100) as f64 / 100.0),
            location_long: Some(-97.0 - (i % 100) as f64 / 100.0),
            ..Default::default()
        })
        .collect()
}

fn bench_compile_and_match(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let breeds: BreedSelection = ["German Shepherd".to_string(), "Poodle".to_string()].into();
    c.bench_function("compile_mountain_and_match_10k", |b| {
        b.iter(|| {
            let q = compile(RescueCategory::Mountain, &breeds);
            rows.iter().filter(|r| q.matches(r)).count()
        })
    });
}

fn bench_projections(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let cols = BTreeSet::new();
    let input = ProjectionInput {
        visible_rows: &rows,
        selected_row: Some(42),
        selected_columns: &cols,
    };
    c.bench_function("breed_chart_10k", |b| b.iter(|| BreedChart.project(&input)));
    c.bench_function("location_map", |b| b.iter(|| LocationMap::default().project(&input)));
}

fn bench_table(c: &mut Criterion) {
    let rows = make_rows(10_000);
    let state = TableState {
        sort_by: vec![SortKey::asc("breed"), SortKey::desc("age_upon_outcome_in_weeks")],
        filter: Some("{sex_upon_outcome} = \"Intact Male\" && {age_upon_outcome_in_weeks} >= 26".into()),
    };
    c.bench_function("table_filter_sort_10k", |b| {
        b.iter(|| table::apply(&rows, &state).map(|v| v.len()).unwrap_or(0))
    });
}

criterion_group!(benches, bench_compile_and_match, bench_projections, bench_table);
criterion_main!(benches);
