//! Genome ↔ meta-genome coordinate translation.
//!
//! Both directions locate the floor boundary with a binary search over the
//! synchronized list and add the residual distance past it. All search
//! state lives on the stack of the call.

use thiserror::Error;

use crate::collector::TrackKey;
use crate::offset::SynchronizedOffsetList;
use crate::sync::{MetaGenomeIndex, TrackLookup};

/// Result of a reverse (meta-genome → genome) lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenomePosition {
    /// The meta-genome coordinate corresponds to this genome position.
    Present(u64),
    /// The coordinate falls on bases this genome does not have
    /// (another genome's insertion, or bases it deleted).
    NotPresent,
}

impl GenomePosition {
    /// Genome position, if present.
    pub fn position(self) -> Option<u64> {
        match self {
            GenomePosition::Present(position) => Some(position),
            GenomePosition::NotPresent => None,
        }
    }
}

/// Lookup failure in the translator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// Genome is neither the reference nor part of the project.
    #[error("unknown genome '{0}'")]
    UnknownGenome(String),
    /// Allele index beyond the genome's ploidy.
    #[error("genome '{genome}' has no allele {allele} (ploidy {ploidy})")]
    UnknownAllele {
        /// Genome name.
        genome: String,
        /// Requested allele.
        allele: usize,
        /// Declared ploidy.
        ploidy: usize,
    },
    /// Track exists in the layout but its merge failed.
    #[error("track {0} was not synchronized")]
    NotSynchronized(TrackKey),
}

/// Translate a genome-axis position to the meta-genome axis.
///
/// Positions before the first boundary, or beyond the known genome
/// length, are returned unchanged.
pub fn to_meta_genome(list: &SynchronizedOffsetList, position: u64) -> u64 {
    if list.genome_length().is_some_and(|length| position > length) {
        return position;
    }

    let boundaries = list.boundaries();
    let after = boundaries.partition_point(|boundary| boundary.position <= position);
    match after.checked_sub(1).map(|idx| boundaries[idx]) {
        None => position,
        Some(floor) if floor.position == position => floor.target,
        Some(floor) => floor.target + (position - floor.position),
    }
}

/// Translate a meta-genome position back to the genome axis.
///
/// Positions beyond the known meta-genome length are returned unchanged.
pub fn to_genome(list: &SynchronizedOffsetList, meta: u64) -> GenomePosition {
    if list.meta_length().is_some_and(|length| meta > length) {
        return GenomePosition::Present(meta);
    }

    let boundaries = list.boundaries();
    let after = boundaries.partition_point(|boundary| boundary.target <= meta);
    let (position, target) = match after.checked_sub(1) {
        Some(idx) => (boundaries[idx].position, boundaries[idx].target),
        None => (0, 0),
    };

    let candidate = position + (meta - target);
    match boundaries.get(after) {
        // The segment ends before `meta`: it lies in the gap ahead of the
        // next boundary's target.
        Some(next) if candidate >= next.position => GenomePosition::NotPresent,
        _ => GenomePosition::Present(candidate),
    }
}

/// Read-only translation service over a synchronized index.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTranslator<'a> {
    index: &'a MetaGenomeIndex,
}

impl<'a> CoordinateTranslator<'a> {
    /// Wrap an index.
    pub fn new(index: &'a MetaGenomeIndex) -> Self {
        Self { index }
    }

    fn list(
        &self,
        genome: &str,
        allele: usize,
        chromosome: &str,
    ) -> Result<Option<&'a SynchronizedOffsetList>, TranslateError> {
        match self.index.lookup(genome, allele, chromosome) {
            TrackLookup::Found(list) => Ok(Some(list)),
            TrackLookup::UnknownChromosome => Ok(None),
            TrackLookup::UnknownGenome => Err(TranslateError::UnknownGenome(genome.to_string())),
            TrackLookup::UnknownAllele { ploidy } => Err(TranslateError::UnknownAllele {
                genome: genome.to_string(),
                allele,
                ploidy,
            }),
            TrackLookup::Failed(key) => Err(TranslateError::NotSynchronized(key)),
        }
    }

    /// Genome position → meta-genome position.
    pub fn to_meta_genome(
        &self,
        genome: &str,
        allele: usize,
        chromosome: &str,
        position: u64,
    ) -> Result<u64, TranslateError> {
        Ok(self
            .list(genome, allele, chromosome)?
            .map_or(position, |list| to_meta_genome(list, position)))
    }

    /// Meta-genome position → genome position.
    pub fn to_genome(
        &self,
        genome: &str,
        allele: usize,
        chromosome: &str,
        meta: u64,
    ) -> Result<GenomePosition, TranslateError> {
        Ok(self
            .list(genome, allele, chromosome)?
            .map_or(GenomePosition::Present(meta), |list| to_genome(list, meta)))
    }

    /// Reference position → meta-genome position.
    pub fn reference_to_meta_genome(&self, chromosome: &str, position: u64) -> Result<u64, TranslateError> {
        self.to_meta_genome(self.index.reference_name(), 0, chromosome, position)
    }

    /// Meta-genome position → reference position.
    pub fn meta_genome_to_reference(
        &self,
        chromosome: &str,
        meta: u64,
    ) -> Result<GenomePosition, TranslateError> {
        self.to_genome(self.index.reference_name(), 0, chromosome, meta)
    }

    /// Position of one genome's base on another genome's axis, through the
    /// shared meta-genome coordinate.
    pub fn genome_to_genome(
        &self,
        from: (&str, usize),
        to: (&str, usize),
        chromosome: &str,
        position: u64,
    ) -> Result<GenomePosition, TranslateError> {
        let meta = self.to_meta_genome(from.0, from.1, chromosome, position)?;
        self.to_genome(to.0, to.1, chromosome, meta)
    }

    /// Length of a chromosome on the meta-genome axis.
    pub fn meta_chromosome_length(&self, chromosome: &str) -> Option<u64> {
        self.index.meta_chromosome_length(chromosome)
    }
}
