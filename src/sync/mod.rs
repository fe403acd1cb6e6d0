//! Synchronization orchestrator.
//!
//! Every (genome, allele, chromosome) track is merged against the reference
//! aggregate of its chromosome, then the reference genome itself is placed
//! on the meta-genome axis. Tracks are independent and run on a rayon pool.

mod index;

pub use index::MetaGenomeIndex;
pub(crate) use index::TrackLookup;

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::collector::{OffsetStore, ScanError, TrackKey};
use crate::config::SyncConfig;
use crate::merge::{merge_with_length, MergeError};
use crate::offset::{OffsetList, SynchronizedOffsetList};
use crate::project::ProjectLayout;

/// Why a track is missing from the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// The source supplying the track's genome could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),
    /// The merge of the track failed.
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Track that could not be synchronized; the rest of the project is unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackFailure {
    /// Failed track (the reference genome uses allele 0).
    pub track: TrackKey,
    /// Cause of the failure.
    pub error: FailureCause,
}

/// Errors that abort a whole synchronization run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The dedicated worker pool could not be created.
    #[error("failed to build merge thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// A track failed while `abort_on_failure` was set.
    #[error("synchronization of track {track} failed: {source}")]
    Track {
        /// Failed track.
        track: TrackKey,
        /// Merge error.
        source: MergeError,
    },
}

/// Index built by a run plus the tracks that could not be synchronized.
#[derive(Debug)]
pub struct SyncOutcome {
    /// Synchronized lists of every successful track.
    pub index: MetaGenomeIndex,
    /// Tracks left out of the index.
    pub failures: Vec<TrackFailure>,
}

impl SyncOutcome {
    /// Whether every track was synchronized.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
struct MergeTask {
    track: TrackKey,
    offsets: OffsetList,
    reference_length: u64,
    is_reference: bool,
}

/// Drives the merger over every track of a project.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer with the given settings.
    pub fn new(config: SyncConfig) -> Self {
        Self { config }
    }

    /// Settings in use.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Merge every track of `layout`, consuming the raw offsets in `store`.
    pub fn synchronize(
        &self,
        layout: &ProjectLayout,
        store: OffsetStore,
    ) -> Result<SyncOutcome, SyncError> {
        self.synchronize_with_scan_failures(layout, store, &HashMap::new())
    }

    /// Like [`Synchronizer::synchronize`], leaving out the genomes whose
    /// source failed to scan.
    ///
    /// Every track of a genome in `scan_failures` is reported as a failure
    /// carrying the scan error; all other tracks are merged as usual.
    pub fn synchronize_with_scan_failures(
        &self,
        layout: &ProjectLayout,
        store: OffsetStore,
        scan_failures: &HashMap<Arc<str>, ScanError>,
    ) -> Result<SyncOutcome, SyncError> {
        let (raw, reference) = store.into_parts();
        let mut failures = Vec::new();
        for genome in layout.genomes() {
            let Some(error) = scan_failures.get(&genome.name) else {
                continue;
            };
            for allele in 0..genome.ploidy {
                for chromosome in layout.chromosomes() {
                    failures.push(TrackFailure {
                        track: TrackKey::new(
                            Arc::clone(&genome.name),
                            allele,
                            Arc::clone(&chromosome.name),
                        ),
                        error: FailureCause::Scan(error.clone()),
                    });
                }
            }
        }

        let tasks = plan_tasks(layout, raw, scan_failures);
        let results = self.run_tasks(&tasks, &reference)?;

        let mut index = MetaGenomeIndex::empty(layout);
        for (task, result) in tasks.into_iter().zip(results) {
            match result {
                Ok(list) => {
                    debug!(track = %task.track, boundaries = list.len(), "track synchronized");
                    if task.is_reference {
                        index.insert_reference(task.track.chromosome, list);
                    } else {
                        index.insert_track(task.track, list);
                    }
                }
                Err(error) => {
                    if self.config.abort_on_failure {
                        return Err(SyncError::Track {
                            track: task.track,
                            source: error,
                        });
                    }
                    warn!(track = %task.track, %error, "track left unsynchronized");
                    failures.push(TrackFailure {
                        track: task.track,
                        error: FailureCause::Merge(error),
                    });
                }
            }
        }

        info!(
            genomes = layout.genomes().len(),
            chromosomes = layout.chromosomes().len(),
            tracks = index.track_count(),
            failures = failures.len(),
            "meta-genome synchronization complete"
        );
        Ok(SyncOutcome { index, failures })
    }

    fn run_tasks(
        &self,
        tasks: &[MergeTask],
        reference: &HashMap<Arc<str>, OffsetList>,
    ) -> Result<Vec<Result<SynchronizedOffsetList, MergeError>>, SyncError> {
        let empty = OffsetList::new();
        let run = |task: &MergeTask| {
            let shared = reference.get(&task.track.chromosome).unwrap_or(&empty);
            merge_with_length(shared, &task.offsets, task.reference_length)
        };

        if !self.config.parallel {
            return Ok(tasks.iter().map(run).collect());
        }
        match self.config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()?;
                Ok(pool.install(|| tasks.par_iter().map(run).collect()))
            }
            None => Ok(tasks.par_iter().map(run).collect()),
        }
    }
}

/// One task per genome track, followed by one reference task per chromosome.
fn plan_tasks(
    layout: &ProjectLayout,
    mut raw: HashMap<TrackKey, OffsetList>,
    skipped: &HashMap<Arc<str>, ScanError>,
) -> Vec<MergeTask> {
    let mut tasks = Vec::with_capacity(layout.track_count() + layout.chromosomes().len());
    for genome in layout.genomes() {
        if skipped.contains_key(&genome.name) {
            continue;
        }
        for allele in 0..genome.ploidy {
            for chromosome in layout.chromosomes() {
                let track = TrackKey::new(
                    Arc::clone(&genome.name),
                    allele,
                    Arc::clone(&chromosome.name),
                );
                let offsets = raw.remove(&track).unwrap_or_default();
                tasks.push(MergeTask {
                    track,
                    offsets,
                    reference_length: chromosome.length,
                    is_reference: false,
                });
            }
        }
    }

    if !raw.is_empty() {
        debug!(tracks = raw.len(), "raw tracks outside the layout were dropped");
    }

    for chromosome in layout.chromosomes() {
        tasks.push(MergeTask {
            track: TrackKey::new(Arc::clone(layout.reference()), 0, Arc::clone(&chromosome.name)),
            offsets: OffsetList::new(),
            reference_length: chromosome.length,
            is_reference: true,
        });
    }
    tasks
}

/// Synchronize with default settings.
pub fn synchronize_project(
    layout: &ProjectLayout,
    store: OffsetStore,
) -> Result<SyncOutcome, SyncError> {
    Synchronizer::default().synchronize(layout, store)
}
