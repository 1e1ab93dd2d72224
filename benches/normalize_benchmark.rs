//! Benchmarks for location normalization.
//!
//! Run with: cargo bench
//!
//! Mentions are synthesized from the default reference spellings with
//! historic variants, genitive suffixes and excluded tokens mixed in.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use letterloc::extract::XmlExtractor;
use letterloc::model::Mention;
use letterloc::normalize::{similarity, LocationNormalizer, NormalizeOptions};

/// Creates `count` mentions cycling through variants of the reference names.
fn create_mentions(count: usize) -> Vec<Mention> {
    let variants = [
        "Kjøbenhavn",
        "Københavns",
        "Rom",
        "Roms",
        "Dresdens",
        "Paris",
        "Sverig",
        "Frankrige",
        "Mars",
        "Christiania",
        "Bergens",
        "Florens",
    ];
    (0..count)
        .map(|i| {
            // a share of unique names keeps the fuzzy pass busy
            let raw = if i % 5 == 0 {
                format!("Sted{}", i)
            } else {
                variants[i % variants.len()].to_string()
            };
            Mention::new(format!("B{}", i / 20), raw)
        })
        .collect()
}

/// Creates a TEI-like letter with the given number of paragraphs.
fn create_letter(paragraphs: usize) -> String {
    let mut xml = String::from(
        "<TEI xmlns=\"http://www.tei-c.org/ns/1.0\"><text><body><div>\
         <address><addrLine>Rom, 3. Marts</addrLine></address>",
    );
    for i in 0..paragraphs {
        xml.push_str(&format!(
            "<p>Kjære Ven, jeg rejser den {}de til <placeName>Dresden</placeName> og \
             derfra videre til Kjøbenhavn.</p>",
            i + 1
        ));
    }
    xml.push_str("</div></body></text></TEI>");
    xml
}

/// Benchmark the similarity score.
fn bench_similarity(c: &mut Criterion) {
    c.bench_function("similarity", |b| {
        b.iter(|| similarity(black_box("Kjøbenhavn"), black_box("København")));
    });
}

/// Benchmark normalization at various batch sizes.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let normalizer = LocationNormalizer::with_options(NormalizeOptions::default());

    for count in [100, 1_000, 10_000].iter() {
        let mentions = create_mentions(*count);

        group.bench_function(format!("{}_mentions", count), |b| {
            b.iter(|| normalizer.normalize(black_box(&mentions)));
        });
    }

    group.finish();
}

/// Benchmark with only the five best candidates per reference.
fn bench_candidate_limit(c: &mut Criterion) {
    let mentions = create_mentions(1_000);
    let limited = LocationNormalizer::with_options(
        NormalizeOptions::default().with_candidate_limit(5),
    );

    c.bench_function("normalize_candidate_limit", |b| {
        b.iter(|| limited.normalize(black_box(&mentions)));
    });
}

/// Benchmark paragraph extraction.
fn bench_extract(c: &mut Criterion) {
    let extractor = XmlExtractor::new();
    let letter = create_letter(50);

    c.bench_function("extract_50_paragraphs", |b| {
        b.iter(|| extractor.extract_str("B1", black_box(&letter)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_similarity,
    bench_normalize,
    bench_candidate_limit,
    bench_extract,
);
criterion_main!(benches);
