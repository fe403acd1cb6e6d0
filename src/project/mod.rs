//! Project layout: reference name, genomes with their ploidy, chromosomes.
//!
//! The layout is resolved by the caller (project configuration) and passed
//! explicitly to the collector, synchronizer and translator.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

/// Genome taking part in synchronization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genome {
    /// Sample/genome name as used in genotype columns.
    pub name: Arc<str>,
    /// Number of chromosome copies (alleles), at least 1.
    pub ploidy: usize,
}

/// Chromosome of the reference assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chromosome {
    /// Chromosome/contig name.
    pub name: Arc<str>,
    /// Length on the reference axis.
    pub length: u64,
}

/// Layout validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The same genome name was declared twice.
    #[error("genome '{0}' declared more than once")]
    DuplicateGenome(String),
    /// A genome reuses the reference genome's name.
    #[error("genome '{0}' clashes with the reference genome name")]
    ReferenceNameClash(String),
    /// A genome was declared with no alleles.
    #[error("genome '{0}' has ploidy 0")]
    ZeroPloidy(String),
    /// The same chromosome name was declared twice.
    #[error("chromosome '{0}' declared more than once")]
    DuplicateChromosome(String),
}

/// Resolved genomes and chromosomes of one project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    reference: Arc<str>,
    genomes: Vec<Genome>,
    chromosomes: Vec<Chromosome>,
}

impl ProjectLayout {
    /// Start building a layout around the named reference genome.
    pub fn builder(reference: impl Into<Arc<str>>) -> ProjectLayoutBuilder {
        ProjectLayoutBuilder {
            reference: reference.into(),
            genomes: Vec::new(),
            chromosomes: Vec::new(),
        }
    }

    /// Name of the reference genome.
    pub fn reference(&self) -> &Arc<str> {
        &self.reference
    }

    /// Genomes in declaration order.
    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    /// Chromosomes in declaration order.
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// Look up a genome by name.
    pub fn genome(&self, name: &str) -> Option<&Genome> {
        self.genomes.iter().find(|genome| genome.name.as_ref() == name)
    }

    /// Look up a chromosome by name.
    pub fn chromosome(&self, name: &str) -> Option<&Chromosome> {
        self.chromosomes
            .iter()
            .find(|chromosome| chromosome.name.as_ref() == name)
    }

    /// Total number of (genome, allele, chromosome) tracks.
    pub fn track_count(&self) -> usize {
        let alleles: usize = self.genomes.iter().map(|genome| genome.ploidy).sum();
        alleles * self.chromosomes.len()
    }
}

/// Builder validating a [`ProjectLayout`].
#[derive(Debug)]
pub struct ProjectLayoutBuilder {
    reference: Arc<str>,
    genomes: Vec<Genome>,
    chromosomes: Vec<Chromosome>,
}

impl ProjectLayoutBuilder {
    /// Declare a genome with the given ploidy.
    pub fn genome(mut self, name: impl Into<Arc<str>>, ploidy: usize) -> Self {
        self.genomes.push(Genome {
            name: name.into(),
            ploidy,
        });
        self
    }

    /// Declare a chromosome with its reference length.
    pub fn chromosome(mut self, name: impl Into<Arc<str>>, length: u64) -> Self {
        self.chromosomes.push(Chromosome {
            name: name.into(),
            length,
        });
        self
    }

    /// Validate and build the layout.
    pub fn build(self) -> Result<ProjectLayout, LayoutError> {
        let mut seen = HashSet::new();
        for genome in &self.genomes {
            if genome.name == self.reference {
                return Err(LayoutError::ReferenceNameClash(genome.name.to_string()));
            }
            if genome.ploidy == 0 {
                return Err(LayoutError::ZeroPloidy(genome.name.to_string()));
            }
            if !seen.insert(Arc::clone(&genome.name)) {
                return Err(LayoutError::DuplicateGenome(genome.name.to_string()));
            }
        }

        let mut seen = HashSet::new();
        for chromosome in &self.chromosomes {
            if !seen.insert(Arc::clone(&chromosome.name)) {
                return Err(LayoutError::DuplicateChromosome(
                    chromosome.name.to_string(),
                ));
            }
        }

        Ok(ProjectLayout {
            reference: self.reference,
            genomes: self.genomes,
            chromosomes: self.chromosomes,
        })
    }
}
