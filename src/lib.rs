//! # Meta-genome coordinate synchronization
//!
//! Genomes aligned against one reference all have different lengths once
//! their insertions and deletions are applied. This crate places every
//! genome on one shared axis, the *meta-genome*, wide enough to hold the
//! widest insertion seen at every locus, so tracks from different genomes
//! line up position for position.
//!
//! ## Pipeline
//!
//! 1. **Collection**: parsed variant records feed per-track offset lists
//!    (one per genome, allele and chromosome) plus a reference aggregate of
//!    every insertion
//! 2. **Merge**: each track is swept against the reference aggregate into a
//!    list of boundaries `(genome position, meta-genome position)`
//! 3. **Translation**: binary search over those boundaries maps genome
//!    positions to the meta-genome axis and back
//!
//! ## Usage Example
//!
//! ```
//! use metagenome::{
//!     Alternative, CoordinateTranslator, GenomePosition, OffsetCollector, ProjectLayout,
//!     SyncConfig, Synchronizer, VariantRecord,
//! };
//!
//! let layout = ProjectLayout::builder("ref")
//!     .genome("A", 1)
//!     .genome("B", 1)
//!     .chromosome("chr1", 1_000)
//!     .build()?;
//!
//! let record = VariantRecord::new("chr1", 100)
//!     .with_alternative(Alternative::insertion(5))
//!     .with_genotype("A", "1")
//!     .with_genotype("B", "0");
//!
//! let mut collector = OffsetCollector::new(&layout);
//! collector.scan("cohort.vcf", &["A", "B"], vec![record])?;
//!
//! let outcome = Synchronizer::new(SyncConfig::sequential())
//!     .synchronize(&layout, collector.finish())?;
//! let translator = CoordinateTranslator::new(&outcome.index);
//!
//! // B lacks A's 5 inserted bases, so its base 101 sits after them.
//! assert_eq!(translator.to_meta_genome("B", 0, "chr1", 101)?, 106);
//! assert_eq!(translator.to_genome("B", 0, "chr1", 103)?, GenomePosition::NotPresent);
//! # Ok::<(), metagenome::Error>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod collector; // Offset collection from parsed records
pub mod config; // Synchronization settings
pub mod merge; // Reference vs allele sweep
pub mod offset; // Offset lists and synchronized boundaries
pub mod project; // Genomes, ploidy and chromosomes of a project
pub mod sync; // Per-track orchestration
pub mod translate; // Genome <-> meta-genome lookups
pub mod variant; // Parsed variant records and genotype calls

// Re-exports for convenience
pub use collector::{
    join_stores, CollectError, OffsetCollector, OffsetStore, ScanError, ScanSummary, TrackKey,
};
pub use config::{ConfigError, SyncConfig};
pub use merge::{merge, merge_with_length, ListRole, MergeError};
pub use offset::{Boundary, Offset, OffsetList, OffsetOrderError, SynchronizedOffsetList};
pub use project::{Chromosome, Genome, LayoutError, ProjectLayout, ProjectLayoutBuilder};
pub use sync::{
    synchronize_project, FailureCause, MetaGenomeIndex, SyncError, SyncOutcome, Synchronizer,
    TrackFailure,
};
pub use translate::{CoordinateTranslator, GenomePosition, TranslateError};
pub use variant::{AlleleCall, Alternative, GenotypeCall, VariantKind, VariantRecord};

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::warn;

/// Errors surfaced by the end-to-end pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Project layout rejected.
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Invalid settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Collected stores could not be joined.
    #[error(transparent)]
    Collect(#[from] CollectError),

    /// Synchronization run aborted.
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// Coordinate lookup failed.
    #[error(transparent)]
    Translate(#[from] TranslateError),
}

/// Parsed records of one variant source and the genomes it carries.
#[derive(Debug, Clone)]
pub struct VariantSource {
    /// Source name used in diagnostics (usually the file path).
    pub name: String,
    /// Genomes whose genotype columns are read from this source.
    pub genomes: Vec<Arc<str>>,
    /// Records in position order.
    pub records: Vec<VariantRecord>,
}

impl VariantSource {
    /// Create a source.
    pub fn new(
        name: impl Into<String>,
        genomes: impl IntoIterator<Item = impl Into<Arc<str>>>,
        records: Vec<VariantRecord>,
    ) -> Self {
        Self {
            name: name.into(),
            genomes: genomes.into_iter().map(Into::into).collect(),
            records,
        }
    }
}

/// Collect every source, join the stores, then synchronize the project.
///
/// Sources are scanned concurrently unless `config` is sequential; each
/// source is still scanned in record order. A source that fails to scan
/// contributes nothing: every track of its genomes is reported in
/// [`SyncOutcome::failures`] and the other genomes are synchronized as usual.
/// With `abort_on_failure` the first scan error is returned instead.
pub fn synchronize_sources(
    layout: &ProjectLayout,
    sources: Vec<VariantSource>,
    config: &SyncConfig,
) -> Result<SyncOutcome, Error> {
    let collect = |source: VariantSource| {
        let mut collector = OffsetCollector::new(layout);
        let scanned = collector.scan(&source.name, &source.genomes, source.records);
        (source.genomes, scanned.map(|_| collector.finish()))
    };

    let collected: Vec<(Vec<Arc<str>>, Result<OffsetStore, ScanError>)> = if config.parallel {
        sources.into_par_iter().map(collect).collect()
    } else {
        sources.into_iter().map(collect).collect()
    };

    let mut stores = Vec::with_capacity(collected.len());
    let mut scan_failures = HashMap::new();
    for (genomes, result) in collected {
        match result {
            Ok(store) => stores.push(store),
            Err(error) => {
                if config.abort_on_failure {
                    return Err(error.into());
                }
                warn!(%error, genomes = genomes.len(), "variant source skipped");
                for genome in genomes {
                    scan_failures.insert(genome, error.clone());
                }
            }
        }
    }

    let store = join_stores(stores)?;
    Ok(Synchronizer::new(config.clone()).synchronize_with_scan_failures(
        layout,
        store,
        &scan_failures,
    )?)
}
