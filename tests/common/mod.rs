#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use metagenome::{
    Alternative, MetaGenomeIndex, Offset, OffsetList, ProjectLayout, TrackKey, VariantRecord,
    VariantSource,
};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("METAGENOME_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set METAGENOME_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// Ascending offset list from `(position, value)` pairs.
pub fn offsets(entries: &[(u64, i64)]) -> OffsetList {
    OffsetList::from_sorted(
        entries
            .iter()
            .map(|&(position, value)| Offset::new(position, value))
            .collect(),
    )
    .expect("fixture offsets are ascending")
}

/// Record with the given alternatives and `(genome, genotype)` columns.
pub fn record(
    chromosome: &str,
    position: u64,
    alternatives: &[Alternative],
    genotypes: &[(&str, &str)],
) -> VariantRecord {
    let mut record = VariantRecord::new(chromosome, position);
    for alternative in alternatives {
        record = record.with_alternative(*alternative);
    }
    for (genome, genotype) in genotypes {
        record = record.with_genotype(*genome, *genotype);
    }
    record
}

/// Three genomes over two chromosomes, split across two sources.
pub fn cohort_layout() -> ProjectLayout {
    ProjectLayout::builder("GRCh38")
        .genome("HG001", 2)
        .genome("HG002", 2)
        .genome("HG003", 1)
        .chromosome("chr1", 1_000)
        .chromosome("chr2", 300)
        .build()
        .expect("valid layout")
}

pub fn cohort_sources() -> Vec<VariantSource> {
    let cohort = vec![
        record(
            "chr1",
            100,
            &[Alternative::insertion(3), Alternative::insertion(5)],
            &[("HG001", "1|0"), ("HG002", "2|1")],
        ),
        record(
            "chr1",
            200,
            &[Alternative::deletion(4)],
            &[("HG001", "0|1"), ("HG002", "0|0")],
        ),
        record(
            "chr1",
            300,
            &[Alternative::snp()],
            &[("HG001", "1|1"), ("HG002", "1|0")],
        ),
        record(
            "chr2",
            50,
            &[Alternative::insertion(2)],
            &[("HG001", "1|1"), ("HG002", "./.")],
        ),
    ];
    let single = vec![
        record("chr1", 100, &[Alternative::insertion(5)], &[("HG003", "1")]),
        record("chr1", 500, &[Alternative::insertion(7)], &[("HG003", "1")]),
        record("chr2", 10, &[Alternative::deletion(2)], &[("HG003", "1")]),
    ];

    vec![
        VariantSource::new("cohort.vcf", ["HG001", "HG002"], cohort),
        VariantSource::new("single.vcf", ["HG003"], single),
    ]
}

/// One line per track (reference included), sorted by track.
pub fn render_index(layout: &ProjectLayout, index: &MetaGenomeIndex) -> String {
    let mut lines: Vec<(TrackKey, String)> = index
        .tracks()
        .map(|(key, list)| (key.clone(), render_list(list)))
        .collect();
    for chromosome in layout.chromosomes() {
        if let Some(list) = index.reference_track(&chromosome.name) {
            let key = TrackKey::new(layout.reference().clone(), 0, chromosome.name.clone());
            lines.push((key, render_list(list)));
        }
    }
    lines.sort();

    let mut out = String::new();
    for (key, line) in lines {
        out.push_str(&format!("{key}\t{line}\n"));
    }
    out
}

fn render_list(list: &metagenome::SynchronizedOffsetList) -> String {
    let boundaries = if list.is_empty() {
        "-".to_string()
    } else {
        list.boundaries()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "genome={}\tmeta={}\t{}",
        list.genome_length().map_or("?".to_string(), |l| l.to_string()),
        list.meta_length().map_or("?".to_string(), |l| l.to_string()),
        boundaries
    )
}
