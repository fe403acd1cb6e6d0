use std::collections::HashMap;
use std::sync::Arc;

use crate::collector::TrackKey;
use crate::offset::SynchronizedOffsetList;
use crate::project::ProjectLayout;

/// Synchronized offset lists of a whole project.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaGenomeIndex {
    reference_name: Arc<str>,
    ploidy: HashMap<Arc<str>, usize>,
    chromosomes: HashMap<Arc<str>, u64>,
    tracks: HashMap<TrackKey, SynchronizedOffsetList>,
    reference: HashMap<Arc<str>, SynchronizedOffsetList>,
}

/// Outcome of resolving a (genome, allele, chromosome) triple.
#[derive(Debug)]
pub(crate) enum TrackLookup<'a> {
    Found(&'a SynchronizedOffsetList),
    UnknownGenome,
    UnknownAllele { ploidy: usize },
    UnknownChromosome,
    Failed(TrackKey),
}

impl MetaGenomeIndex {
    pub(crate) fn empty(layout: &ProjectLayout) -> Self {
        Self {
            reference_name: Arc::clone(layout.reference()),
            ploidy: layout
                .genomes()
                .iter()
                .map(|genome| (Arc::clone(&genome.name), genome.ploidy))
                .collect(),
            chromosomes: layout
                .chromosomes()
                .iter()
                .map(|chromosome| (Arc::clone(&chromosome.name), chromosome.length))
                .collect(),
            tracks: HashMap::new(),
            reference: HashMap::new(),
        }
    }

    pub(crate) fn insert_track(&mut self, key: TrackKey, list: SynchronizedOffsetList) {
        self.tracks.insert(key, list);
    }

    pub(crate) fn insert_reference(&mut self, chromosome: Arc<str>, list: SynchronizedOffsetList) {
        self.reference.insert(chromosome, list);
    }

    /// Name of the reference genome.
    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    /// Synchronized list of a genome track.
    pub fn track(&self, key: &TrackKey) -> Option<&SynchronizedOffsetList> {
        self.tracks.get(key)
    }

    /// Synchronized list of the reference genome on a chromosome.
    pub fn reference_track(&self, chromosome: &str) -> Option<&SynchronizedOffsetList> {
        self.reference.get(chromosome)
    }

    /// Number of synchronized genome tracks (reference excluded).
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Iterate genome tracks in arbitrary order.
    pub fn tracks(&self) -> impl Iterator<Item = (&TrackKey, &SynchronizedOffsetList)> {
        self.tracks.iter()
    }

    /// Chromosome length on the meta-genome axis.
    pub fn meta_chromosome_length(&self, chromosome: &str) -> Option<u64> {
        self.reference
            .get(chromosome)
            .and_then(SynchronizedOffsetList::meta_length)
    }

    pub(crate) fn lookup(&self, genome: &str, allele: usize, chromosome: &str) -> TrackLookup<'_> {
        let is_reference = genome == self.reference_name.as_ref();
        let ploidy = if is_reference {
            1
        } else {
            match self.ploidy.get(genome) {
                Some(&ploidy) => ploidy,
                None => return TrackLookup::UnknownGenome,
            }
        };
        if allele >= ploidy {
            return TrackLookup::UnknownAllele { ploidy };
        }
        if !self.chromosomes.contains_key(chromosome) {
            return TrackLookup::UnknownChromosome;
        }

        let found = if is_reference {
            self.reference.get(chromosome)
        } else {
            self.tracks.get(&TrackKey::new(genome, allele, chromosome))
        };
        match found {
            Some(list) => TrackLookup::Found(list),
            None => TrackLookup::Failed(TrackKey::new(genome, allele, chromosome)),
        }
    }
}
