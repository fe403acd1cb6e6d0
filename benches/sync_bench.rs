//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metagenome::translate::{to_genome, to_meta_genome};
use metagenome::{merge_with_length, Offset, OffsetList};

const CHROMOSOME_LENGTH: u64 = 50_000_000;

/// One indel every `spacing` bases, alternating insertions and deletions.
fn synthetic_lists(events: u64, spacing: u64) -> (OffsetList, OffsetList) {
    let mut reference = OffsetList::new();
    let mut allele = OffsetList::new();
    for idx in 0..events {
        let position = (idx + 1) * spacing;
        let length = (idx % 7 + 1) as i64;
        reference.insert_widest(Offset::new(position, length + (idx % 3) as i64));
        let own = if idx % 2 == 0 { length } else { -length };
        allele.push(Offset::new(position, own)).expect("ascending");
    }
    (reference, allele)
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    for events in [1_000u64, 10_000, 100_000] {
        let (reference, allele) = synthetic_lists(events, 400);
        group.bench_with_input(BenchmarkId::from_parameter(events), &events, |b, _| {
            b.iter(|| {
                merge_with_length(
                    black_box(&reference),
                    black_box(&allele),
                    CHROMOSOME_LENGTH,
                )
                .expect("ordered")
            });
        });
    }
    group.finish();
}

fn bench_translate(c: &mut Criterion) {
    let (reference, allele) = synthetic_lists(100_000, 400);
    let list = merge_with_length(&reference, &allele, CHROMOSOME_LENGTH).expect("ordered");

    c.bench_function("to_meta_genome_100k_boundaries", |b| {
        let mut position = 1u64;
        b.iter(|| {
            position = position.wrapping_mul(6_364_136_223_846_793_005) % CHROMOSOME_LENGTH + 1;
            black_box(to_meta_genome(&list, black_box(position)))
        });
    });

    c.bench_function("to_genome_100k_boundaries", |b| {
        let mut meta = 1u64;
        b.iter(|| {
            meta = meta.wrapping_mul(6_364_136_223_846_793_005) % CHROMOSOME_LENGTH + 1;
            black_box(to_genome(&list, black_box(meta)))
        });
    });
}

criterion_group!(benches, bench_merge, bench_translate);
criterion_main!(benches);
