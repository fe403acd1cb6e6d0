//! Parsed variant records as handed over by the file-scanning layer.
//!
//! Records are already tokenized; this module only models their typed
//! fields and the per-genome genotype calls.

mod genotype;

pub use genotype::{AlleleCall, GenotypeCall, GenotypeParseError};

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

/// Closed set of variant classifications the synchronizer branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Bases inserted after the anchor base.
    Insertion,
    /// Reference bases removed after the anchor base.
    Deletion,
    /// Single-base substitution, no shift.
    Snp,
    /// Anything else (MNPs, symbolic alleles).
    Other,
}

/// One alternative allele of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternative {
    /// Classification of the alternative.
    pub kind: VariantKind,
    /// Signed length relative to the reference allele.
    pub length: i64,
}

impl Alternative {
    /// Construct an alternative.
    pub fn new(kind: VariantKind, length: i64) -> Self {
        Self { kind, length }
    }

    /// Insertion of `len` bases.
    pub fn insertion(len: u32) -> Self {
        Self::new(VariantKind::Insertion, i64::from(len))
    }

    /// Deletion of `len` reference bases.
    pub fn deletion(len: u32) -> Self {
        Self::new(VariantKind::Deletion, -i64::from(len))
    }

    /// Substitution.
    pub fn snp() -> Self {
        Self::new(VariantKind::Snp, 0)
    }
}

/// Alternative whose kind and length disagree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("alternative {index} is tagged {kind:?} but has length {length}")]
pub struct InconsistentAlternative {
    /// 0-based index of the alternative.
    pub index: usize,
    /// Declared kind.
    pub kind: VariantKind,
    /// Declared length.
    pub length: i64,
}

/// Variant record at one reference position.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRecord {
    /// Chromosome/contig name.
    pub chromosome: Arc<str>,
    /// 1-based reference position of the anchor base.
    pub position: u64,
    /// Alternatives in record order.
    pub alternatives: Vec<Alternative>,
    genotypes: HashMap<Arc<str>, String>,
}

impl VariantRecord {
    /// Create a record without alternatives or genotypes.
    pub fn new(chromosome: impl Into<Arc<str>>, position: u64) -> Self {
        Self {
            chromosome: chromosome.into(),
            position,
            alternatives: Vec::new(),
            genotypes: HashMap::new(),
        }
    }

    /// Add an alternative allele.
    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternatives.push(alternative);
        self
    }

    /// Attach the raw genotype text for a genome.
    pub fn with_genotype(mut self, genome: impl Into<Arc<str>>, genotype: impl Into<String>) -> Self {
        self.genotypes.insert(genome.into(), genotype.into());
        self
    }

    /// Raw genotype text for a genome.
    pub fn genotype(&self, genome: &str) -> Option<&str> {
        self.genotypes.get(genome).map(String::as_str)
    }

    /// Check that every alternative's length agrees with its kind.
    pub fn validate(&self) -> Result<(), InconsistentAlternative> {
        for (index, alt) in self.alternatives.iter().enumerate() {
            let consistent = match alt.kind {
                VariantKind::Insertion => alt.length > 0,
                VariantKind::Deletion => alt.length < 0,
                VariantKind::Snp | VariantKind::Other => true,
            };
            if !consistent {
                return Err(InconsistentAlternative {
                    index,
                    kind: alt.kind,
                    length: alt.length,
                });
            }
        }
        Ok(())
    }
}
