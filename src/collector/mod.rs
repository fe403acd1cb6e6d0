//! Offset collection from parsed variant records.
//!
//! Records are observed one genome at a time. Every non-SNP alternative
//! carried by a copy is appended to that copy's raw offset list; insertions
//! are mirrored into the reference aggregate because they widen the shared
//! axis for every genome.

mod store;

pub use store::{OffsetStore, TrackKey};

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::offset::{Offset, OffsetOrderError};
use crate::project::ProjectLayout;
use crate::variant::{GenotypeCall, GenotypeParseError, InconsistentAlternative, VariantKind, VariantRecord};

/// Errors raised while observing a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    /// Genome is not declared in the project layout.
    #[error("genome '{0}' is not part of the project")]
    UnknownGenome(String),
    /// Record has no genotype column for the genome.
    #[error("no genotype for genome '{0}'")]
    MissingGenotype(String),
    /// Genotype text could not be parsed.
    #[error(transparent)]
    Genotype(#[from] GenotypeParseError),
    /// Alternative kind and length disagree.
    #[error(transparent)]
    Alternative(#[from] InconsistentAlternative),
    /// Genotype names an alternative the record does not have.
    #[error("allele index {index} out of range ({available} alternatives)")]
    AlleleOutOfRange {
        /// 0-based alternative index from the genotype.
        index: usize,
        /// Number of alternatives in the record.
        available: usize,
    },
    /// Genotype has more copies than the genome's ploidy.
    #[error("genotype has {copies} copies but genome '{genome}' has ploidy {ploidy}")]
    PloidyExceeded {
        /// Genome name.
        genome: String,
        /// Copies in the genotype.
        copies: usize,
        /// Declared ploidy.
        ploidy: usize,
    },
    /// Record would break the ascending order of a track.
    #[error("track {track}: {source}")]
    Unordered {
        /// Track being appended to.
        track: TrackKey,
        /// Ordering violation.
        source: OffsetOrderError,
    },
    /// Two stores both hold the same track.
    #[error("track {0} collected from more than one source")]
    DuplicateTrack(TrackKey),
}

/// Fatal error that stopped the scan of one source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{origin}: record {ordinal} ({chromosome}:{position}): {error}")]
pub struct ScanError {
    /// Name of the scanned source (usually a file path).
    pub origin: String,
    /// 1-based ordinal of the record in the source.
    pub ordinal: usize,
    /// Chromosome of the record.
    pub chromosome: String,
    /// Position of the record.
    pub position: u64,
    /// Underlying error.
    #[source]
    pub error: CollectError,
}

/// Counters describing what a scan contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Records read.
    pub records: usize,
    /// Offsets appended to allele lists.
    pub offsets: usize,
    /// Insertions recorded in the reference aggregate.
    pub reference_insertions: usize,
    /// SNP alternatives carried by a copy and ignored.
    pub snps_skipped: usize,
    /// Records on chromosomes absent from the layout.
    pub off_layout: usize,
}

impl ScanSummary {
    fn add(&mut self, other: &ScanSummary) {
        self.records += other.records;
        self.offsets += other.offsets;
        self.reference_insertions += other.reference_insertions;
        self.snps_skipped += other.snps_skipped;
        self.off_layout += other.off_layout;
    }
}

/// Accumulates raw offsets for the genomes of one project.
#[derive(Debug)]
pub struct OffsetCollector<'a> {
    layout: &'a ProjectLayout,
    store: OffsetStore,
    summary: ScanSummary,
}

impl<'a> OffsetCollector<'a> {
    /// Create a collector writing into an empty store.
    pub fn new(layout: &'a ProjectLayout) -> Self {
        Self {
            layout,
            store: OffsetStore::new(),
            summary: ScanSummary::default(),
        }
    }

    /// Observe one record for one genome.
    ///
    /// Either every offset implied by the genotype is applied or none is.
    pub fn observe(&mut self, record: &VariantRecord, genome: &str) -> Result<(), CollectError> {
        let mut summary = ScanSummary::default();
        let result = self.observe_into(record, genome, &mut summary);
        self.summary.add(&summary);
        result
    }

    fn observe_into(
        &mut self,
        record: &VariantRecord,
        genome: &str,
        summary: &mut ScanSummary,
    ) -> Result<(), CollectError> {
        let info = self
            .layout
            .genome(genome)
            .ok_or_else(|| CollectError::UnknownGenome(genome.to_string()))?;

        if self.layout.chromosome(&record.chromosome).is_none() {
            summary.off_layout += 1;
            return Ok(());
        }

        record.validate()?;
        let text = record
            .genotype(genome)
            .ok_or_else(|| CollectError::MissingGenotype(genome.to_string()))?;
        let call: GenotypeCall = text.parse()?;
        if call.ploidy() > info.ploidy {
            return Err(CollectError::PloidyExceeded {
                genome: genome.to_string(),
                copies: call.ploidy(),
                ploidy: info.ploidy,
            });
        }

        let mut planned = Vec::with_capacity(call.ploidy());
        for (allele, copy) in call.copies().iter().enumerate() {
            let Some(index) = copy.alternative_index() else {
                continue;
            };
            let alternative =
                record
                    .alternatives
                    .get(index)
                    .ok_or(CollectError::AlleleOutOfRange {
                        index,
                        available: record.alternatives.len(),
                    })?;
            if alternative.kind == VariantKind::Snp {
                summary.snps_skipped += 1;
                continue;
            }
            if alternative.length == 0 {
                continue;
            }

            let track = TrackKey::new(Arc::clone(&info.name), allele, Arc::clone(&record.chromosome));
            let offset = Offset::new(record.position, alternative.length);
            self.store
                .check_push(&track, offset)
                .map_err(|source| CollectError::Unordered {
                    track: track.clone(),
                    source,
                })?;
            planned.push((track, offset, alternative.kind));
        }

        for (track, offset, kind) in planned {
            self.store
                .push_track(track.clone(), offset)
                .map_err(|source| CollectError::Unordered { track, source })?;
            summary.offsets += 1;
            if kind == VariantKind::Insertion {
                self.store
                    .record_reference_insertion(&record.chromosome, offset);
                summary.reference_insertions += 1;
            }
        }
        Ok(())
    }

    /// Observe every record of a source for each listed genome.
    ///
    /// Stops at the first malformed record.
    pub fn scan<I, S>(
        &mut self,
        origin: &str,
        genomes: &[S],
        records: I,
    ) -> Result<ScanSummary, ScanError>
    where
        I: IntoIterator<Item = VariantRecord>,
        S: AsRef<str>,
    {
        let mut summary = ScanSummary::default();
        for (idx, record) in records.into_iter().enumerate() {
            summary.records += 1;
            if self.layout.chromosome(&record.chromosome).is_none() {
                summary.off_layout += 1;
                continue;
            }
            for genome in genomes {
                self.observe_into(&record, genome.as_ref(), &mut summary)
                    .map_err(|error| ScanError {
                        origin: origin.to_string(),
                        ordinal: idx + 1,
                        chromosome: record.chromosome.to_string(),
                        position: record.position,
                        error,
                    })?;
            }
        }

        self.summary.add(&summary);
        debug!(
            origin,
            records = summary.records,
            offsets = summary.offsets,
            reference_insertions = summary.reference_insertions,
            "scanned variant source"
        );
        Ok(summary)
    }

    /// Counters accumulated over every observed record.
    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    /// Borrow the store built so far.
    pub fn store(&self) -> &OffsetStore {
        &self.store
    }

    /// Finish collection and hand over the store.
    pub fn finish(self) -> OffsetStore {
        self.store
    }
}

/// Join stores collected from independent sources.
pub fn join_stores<I>(stores: I) -> Result<OffsetStore, CollectError>
where
    I: IntoIterator<Item = OffsetStore>,
{
    let mut joined = OffsetStore::new();
    for store in stores {
        joined.absorb(store).map_err(CollectError::DuplicateTrack)?;
    }
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Alternative;

    fn layout() -> ProjectLayout {
        ProjectLayout::builder("ref")
            .genome("A", 2)
            .genome("B", 1)
            .chromosome("chr1", 1_000)
            .build()
            .unwrap()
    }

    fn offsets(store: &OffsetStore, genome: &str, allele: usize) -> Vec<(u64, i64)> {
        store
            .track(&TrackKey::new(genome, allele, "chr1"))
            .map(|list| list.iter().map(|o| (o.position, o.value)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn insertion_reaches_allele_and_reference() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chr1", 100)
            .with_alternative(Alternative::insertion(3))
            .with_genotype("A", "0|1");

        collector.observe(&record, "A").unwrap();
        let store = collector.finish();

        assert_eq!(offsets(&store, "A", 0), vec![]);
        assert_eq!(offsets(&store, "A", 1), vec![(100, 3)]);
        let reference: Vec<_> = store.reference("chr1").unwrap().iter().copied().collect();
        assert_eq!(reference, vec![Offset::new(100, 3)]);
    }

    #[test]
    fn deletion_is_private_and_snp_is_ignored() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chr1", 200)
            .with_alternative(Alternative::snp())
            .with_alternative(Alternative::deletion(4))
            .with_genotype("A", "1/2");

        collector.observe(&record, "A").unwrap();
        assert_eq!(collector.summary().snps_skipped, 1);
        let store = collector.finish();

        assert_eq!(offsets(&store, "A", 0), vec![]);
        assert_eq!(offsets(&store, "A", 1), vec![(200, -4)]);
        assert!(store.reference("chr1").is_none());
    }

    #[test]
    fn reference_and_no_call_copies_have_no_effect() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chr1", 10)
            .with_alternative(Alternative::insertion(2))
            .with_genotype("A", "./0");

        collector.observe(&record, "A").unwrap();
        assert_eq!(collector.store().track_count(), 0);
    }

    #[test]
    fn malformed_genotype_applies_nothing() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chr1", 10)
            .with_alternative(Alternative::insertion(2))
            .with_genotype("A", "1|3");

        let err = collector.observe(&record, "A").unwrap_err();
        assert_eq!(
            err,
            CollectError::AlleleOutOfRange {
                index: 2,
                available: 1
            }
        );
        assert_eq!(collector.store().track_count(), 0);
        assert!(collector.store().reference("chr1").is_none());
    }

    #[test]
    fn ploidy_is_enforced() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chr1", 10)
            .with_alternative(Alternative::deletion(1))
            .with_genotype("B", "1/1");

        assert!(matches!(
            collector.observe(&record, "B"),
            Err(CollectError::PloidyExceeded { copies: 2, ploidy: 1, .. })
        ));
    }

    #[test]
    fn scan_stops_at_first_bad_record() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let records = vec![
            VariantRecord::new("chr1", 10)
                .with_alternative(Alternative::insertion(2))
                .with_genotype("A", "1|1"),
            VariantRecord::new("chr1", 20)
                .with_alternative(Alternative::deletion(2))
                .with_genotype("A", "1|z"),
            VariantRecord::new("chr1", 30)
                .with_alternative(Alternative::insertion(2))
                .with_genotype("A", "1|1"),
        ];

        let err = collector.scan("a.vcf", &["A"], records).unwrap_err();
        assert_eq!(err.origin, "a.vcf");
        assert_eq!(err.ordinal, 2);
        assert_eq!(err.position, 20);
        assert!(matches!(err.error, CollectError::Genotype(_)));
        assert_eq!(offsets(collector.store(), "A", 0), vec![(10, 2)]);
    }

    #[test]
    fn out_of_order_record_is_reported() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let first = VariantRecord::new("chr1", 50)
            .with_alternative(Alternative::deletion(2))
            .with_genotype("B", "1");
        let second = VariantRecord::new("chr1", 40)
            .with_alternative(Alternative::insertion(1))
            .with_genotype("B", "1");

        collector.observe(&first, "B").unwrap();
        let err = collector.observe(&second, "B").unwrap_err();
        assert!(matches!(err, CollectError::Unordered { .. }));
        assert!(collector.store().reference("chr1").is_none());
    }

    #[test]
    fn records_outside_layout_are_counted() {
        let layout = layout();
        let mut collector = OffsetCollector::new(&layout);
        let record = VariantRecord::new("chrUn_decoy", 5)
            .with_alternative(Alternative::insertion(9))
            .with_genotype("A", "1|1")
            .with_genotype("B", "1");

        let summary = collector
            .scan("decoy.vcf", &["A", "B"], vec![record])
            .unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(summary.off_layout, 1);
        assert_eq!(summary.offsets, 0);
        assert_eq!(collector.summary().off_layout, 1);
    }

    #[test]
    fn join_stores_rejects_shared_track() {
        let layout = layout();
        let record = VariantRecord::new("chr1", 10)
            .with_alternative(Alternative::insertion(2))
            .with_genotype("B", "1");

        let mut first = OffsetCollector::new(&layout);
        first.observe(&record, "B").unwrap();
        let mut second = OffsetCollector::new(&layout);
        second.observe(&record, "B").unwrap();

        let err = join_stores([first.finish(), second.finish()]).unwrap_err();
        assert_eq!(err, CollectError::DuplicateTrack(TrackKey::new("B", 0, "chr1")));
    }
}
