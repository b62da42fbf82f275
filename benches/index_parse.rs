use std::hint::black_box;
use std::io::Cursor;
use std::path::Path;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use metad2a_data::dataset::{ClassIndex, index::parse_index, make_dataset};

const ROW_COUNT: usize = 10_000;
const CLASS_COUNT: usize = 100;

fn index_text() -> String {
    (0..ROW_COUNT)
        .map(|i| format!("{i:07} Boeing 7{:02}-{}\n", i % CLASS_COUNT, i % 3))
        .collect()
}

fn bench_parse_index(c: &mut Criterion) {
    let text = index_text();
    let path = Path::new("images_variant_trainval.txt");
    c.bench_with_input(
        BenchmarkId::new("parse_index", ROW_COUNT),
        &text,
        |b, text| {
            b.iter(|| {
                let entries = parse_index(Cursor::new(text.as_bytes()), path).expect("parse");
                black_box(entries);
            });
        },
    );
}

fn bench_build_samples(c: &mut Criterion) {
    let entries = parse_index(
        Cursor::new(index_text().into_bytes()),
        Path::new("images_variant_trainval.txt"),
    )
    .expect("parse");
    let image_ids: Vec<String> = entries.iter().map(|entry| entry.image_id.clone()).collect();
    c.bench_function("class_index_and_samples", |b| {
        b.iter(|| {
            let classes = ClassIndex::from_labels(entries.iter().map(|entry| &entry.label));
            let targets: Vec<usize> = entries
                .iter()
                .map(|entry| classes.index_of(&entry.label).unwrap_or_default())
                .collect();
            let samples =
                make_dataset(Path::new("/data/fgvc-aircraft-2013b"), &image_ids, &targets)
                    .expect("samples");
            black_box((classes, samples));
        });
    });
}

criterion_group!(benches, bench_parse_index, bench_build_samples);
criterion_main!(benches);
