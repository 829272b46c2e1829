#![allow(missing_docs, unused_doc_comments, unused_attributes)]
//! Benchmarks for the diglib-migrate pipeline.
//!
//! Measures batch assembly, date normalization and EDTF validation over a
//! synthetic batch using Criterion.rs for statistical analysis.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use diglib_migrate::config::MigrationConfig;
use diglib_migrate::date::normalize_date;
use diglib_migrate::parent::KnownParentIndex;
use diglib_migrate::vocabulary::Vocabulary;
use diglib_migrate::{columns, driver, edtf, Assembler, Batch};

const DATES: [&str; 8] = [
    "March 5, 1920",
    "1920-1930",
    "1920-5-07",
    "[1920]",
    "1920, March",
    "circa 1920",
    "1920-03-05",
    "2004-06-XX",
];

/// Build a synthetic batch: one collection followed by `pages` pages.
fn synthetic_batch(pages: usize) -> Batch {
    let mut csv = format!(
        "{},{},{},{},{},{},{},{}\n",
        columns::PID,
        columns::TITLE,
        columns::IS_PAGE_OF,
        columns::SEQUENCE_NUMBER,
        columns::HAS_MODEL,
        "mods_name_personal_author_namePart_ms",
        columns::DATE_ISSUED,
        columns::RELATED_URL,
    );
    csv.push_str(
        "book:0,Ship Logs,,,info:fedora/islandora:bookCModel,\"Smith\\, Jane,Jones\\, Bob\",\"March 5, 1920\",https://example.org/ships\n",
    );
    for i in 1..=pages {
        let date = DATES[i % DATES.len()];
        csv.push_str(&format!(
            "book:{i},,info:fedora/book:0,{i},info:fedora/islandora:pageCModel,,\"{date}\",example.org/{i}\n"
        ));
    }
    driver::read_batch("batch-1.csv", csv.as_bytes()).expect("synthetic batch")
}

/// Benchmark assembling a 1,000-record batch.
fn benchmark_assemble_1k(c: &mut Criterion) {
    let batch = black_box(synthetic_batch(1_000));
    let vocabulary = Vocabulary::standard();
    let known = KnownParentIndex::new();
    let config = MigrationConfig::default();
    let assembler = Assembler::new(&vocabulary, &known, &config);

    c.bench_function("assemble_1k_records", |b| {
        b.iter(|| assembler.assemble(&batch).map(|out| out.records.len()));
    });
}

/// Benchmark assembling and writing a 1,000-record batch.
fn benchmark_assemble_and_write_1k(c: &mut Criterion) {
    let batch = black_box(synthetic_batch(1_000));
    let vocabulary = Vocabulary::standard();
    let known = KnownParentIndex::new();
    let config = MigrationConfig::default();
    let assembler = Assembler::new(&vocabulary, &known, &config);

    c.bench_function("assemble_and_write_1k_records", |b| {
        b.iter(|| {
            let mut output = Vec::new();
            if let Ok(out) = assembler.assemble(&batch) {
                let _ = driver::write_batch(&out, &mut output);
            }
            output.len()
        });
    });
}

/// Benchmark date normalization followed by EDTF validation.
fn benchmark_dates(c: &mut Criterion) {
    c.bench_function("normalize_and_validate_dates", |b| {
        b.iter(|| {
            DATES
                .iter()
                .filter(|d| edtf::is_valid(&normalize_date(black_box(d))))
                .count()
        });
    });
}

criterion_group!(
    benches,
    benchmark_assemble_1k,
    benchmark_assemble_and_write_1k,
    benchmark_dates,
);
criterion_main!(benches);
