mod common;

use common::{assert_snapshot, cohort_layout, cohort_sources, render_index};
use metagenome::{
    synchronize_sources, CoordinateTranslator, GenomePosition, OffsetCollector, ScanSummary,
    SyncConfig, TranslateError,
};

#[test]
fn cohort_index_snapshot() {
    let layout = cohort_layout();
    let outcome = synchronize_sources(&layout, cohort_sources(), &SyncConfig::default())
        .expect("cohort synchronizes");
    assert!(outcome.is_complete());
    assert_eq!(outcome.index.track_count(), 10);

    assert_snapshot(
        "pipeline/cohort.txt",
        &render_index(&layout, &outcome.index),
    );
}

#[test]
fn cohort_scan_counters() {
    let layout = cohort_layout();
    let source = cohort_sources().remove(0);

    let mut collector = OffsetCollector::new(&layout);
    let summary = collector
        .scan(&source.name, &source.genomes, source.records)
        .expect("cohort scans");

    assert_eq!(
        summary,
        ScanSummary {
            records: 4,
            offsets: 6,
            reference_insertions: 5,
            snps_skipped: 3,
            off_layout: 0,
        }
    );
    assert_eq!(collector.summary(), summary);
}

#[test]
fn translations_across_the_cohort() {
    let layout = cohort_layout();
    let outcome = synchronize_sources(&layout, cohort_sources(), &SyncConfig::sequential())
        .expect("cohort synchronizes");
    let translator = CoordinateTranslator::new(&outcome.index);

    // Base right after HG001#1's deletion lands on the same column in HG002#0.
    assert_eq!(
        translator
            .genome_to_genome(("HG001", 1), ("HG002", 0), "chr1", 201)
            .unwrap(),
        GenomePosition::Present(210)
    );
    assert_eq!(translator.reference_to_meta_genome("chr1", 501).unwrap(), 513);
    assert_eq!(
        translator.meta_genome_to_reference("chr1", 103).unwrap(),
        GenomePosition::NotPresent
    );
    assert_eq!(translator.meta_chromosome_length("chr1"), Some(1_012));
    assert_eq!(translator.meta_chromosome_length("chr2"), Some(302));

    // HG003 carries every insertion at full width, so it is the meta axis.
    for position in [1, 100, 106, 505, 1_012] {
        assert_eq!(
            translator.to_meta_genome("HG003", 0, "chr1", position).unwrap(),
            position
        );
    }
}

#[test]
fn lookups_outside_the_project() {
    let layout = cohort_layout();
    let outcome = synchronize_sources(&layout, cohort_sources(), &SyncConfig::sequential())
        .expect("cohort synchronizes");
    let translator = CoordinateTranslator::new(&outcome.index);

    assert!(matches!(
        translator.to_meta_genome("HG999", 0, "chr1", 10),
        Err(TranslateError::UnknownGenome(_))
    ));
    assert!(matches!(
        translator.to_meta_genome("HG003", 1, "chr1", 10),
        Err(TranslateError::UnknownAllele { ploidy: 1, .. })
    ));
    assert_eq!(translator.to_meta_genome("HG001", 0, "chrM", 77).unwrap(), 77);
    assert_eq!(
        translator.to_genome("HG001", 0, "chrM", 77).unwrap(),
        GenomePosition::Present(77)
    );
}
