// Criterion benchmarks for Rescue Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use rescue_match::core::{
    catalog::{criteria_for, predicate_for},
    filters::matches_predicate,
    ranker::rank,
    sanitize::sanitize_records,
    scoring::score_record,
};
use rescue_match::models::{Category, Document};
use serde_json::{json, Value};

const BREEDS: [&str; 6] = [
    "Labrador Retriever Mix",
    "Beagle",
    "German Shepherd",
    "Newfoundland",
    "Pit Bull Mix",
    "Rottweiler",
];

const SEXES: [&str; 4] = ["Intact Female", "Intact Male", "Spayed Female", "Neutered Male"];

fn create_document(id: usize) -> Document {
    // Every fifth age arrives as text, the way some shelter exports store it
    let age: Value = if id % 5 == 0 {
        json!(format!("{}", 10 + (id * 7) % 400))
    } else {
        json!(10 + (id * 7) % 400)
    };

    let value = json!({
        "_id": id,
        "animal_id": format!("A{:06}", id),
        "name": format!("Dog {}", id),
        "breed": BREEDS[id % BREEDS.len()],
        "sex_upon_outcome": SEXES[id % SEXES.len()],
        "age_upon_outcome_in_weeks": age,
        "location_lat": 30.75 + (id as f64 * 0.001) % 0.2,
        "location_long": -97.48 + (id as f64 * 0.001) % 0.2,
    });

    match value {
        Value::Object(document) => document,
        _ => Document::new(),
    }
}

fn create_documents(count: usize) -> Vec<Document> {
    (0..count).map(create_document).collect()
}

fn bench_score_record(c: &mut Criterion) {
    let criteria = criteria_for(Category::Water);
    let records = sanitize_records(&create_documents(1));
    let record = &records[0];

    c.bench_function("score_record", |b| {
        b.iter(|| score_record(black_box(record), black_box(&criteria)));
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let documents = create_documents(500);

    c.bench_function("sanitize_records_500", |b| {
        b.iter(|| sanitize_records(black_box(&documents)));
    });
}

fn bench_rank(c: &mut Criterion) {
    let criteria = criteria_for(Category::Disaster);

    let mut group = c.benchmark_group("ranking");

    for page_size in [10, 50, 100, 500].iter() {
        let records = sanitize_records(&create_documents(*page_size));

        group.bench_with_input(
            BenchmarkId::new("rank", page_size),
            page_size,
            |b, _| {
                b.iter(|| rank(black_box(records.clone()), black_box(&criteria)));
            },
        );
    }

    group.finish();
}

fn bench_predicate_scan(c: &mut Criterion) {
    let documents = create_documents(1000);
    let predicate = predicate_for(Category::Mountain);

    c.bench_function("predicate_scan_1000_documents", |b| {
        b.iter(|| {
            let matched = documents
                .iter()
                .filter(|d| matches_predicate(d, &predicate))
                .count();

            black_box(matched)
        });
    });
}

criterion_group!(
    benches,
    bench_score_record,
    bench_sanitize,
    bench_rank,
    bench_predicate_scan
);

criterion_main!(benches);
