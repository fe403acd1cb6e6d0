use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::offset::{Offset, OffsetList, OffsetOrderError};

/// Identifies one (genome, allele, chromosome) track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackKey {
    /// Genome name.
    pub genome: Arc<str>,
    /// 0-based allele (copy) index.
    pub allele: usize,
    /// Chromosome name.
    pub chromosome: Arc<str>,
}

impl TrackKey {
    /// Construct a key.
    pub fn new(genome: impl Into<Arc<str>>, allele: usize, chromosome: impl Into<Arc<str>>) -> Self {
        Self {
            genome: genome.into(),
            allele,
            chromosome: chromosome.into(),
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}:{}", self.genome, self.allele, self.chromosome)
    }
}

/// Raw offsets gathered during collection.
///
/// Holds one list per track and one reference aggregate per chromosome.
#[derive(Debug, Clone, Default)]
pub struct OffsetStore {
    tracks: HashMap<TrackKey, OffsetList>,
    reference: HashMap<Arc<str>, OffsetList>,
}

impl OffsetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw list of a track, if any offset was collected for it.
    pub fn track(&self, key: &TrackKey) -> Option<&OffsetList> {
        self.tracks.get(key)
    }

    /// Reference aggregate of a chromosome.
    pub fn reference(&self, chromosome: &str) -> Option<&OffsetList> {
        self.reference.get(chromosome)
    }

    /// Number of tracks holding at least one offset.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Iterate tracks in arbitrary order.
    pub fn tracks(&self) -> impl Iterator<Item = (&TrackKey, &OffsetList)> {
        self.tracks.iter()
    }

    /// Whether `offset` could be appended to the track without breaking order.
    pub(crate) fn check_push(&self, key: &TrackKey, offset: Offset) -> Result<(), OffsetOrderError> {
        match self.tracks.get(key).and_then(|list| list.as_slice().last()) {
            Some(last) if offset.position <= last.position => Err(OffsetOrderError {
                previous: last.position,
                position: offset.position,
            }),
            _ => Ok(()),
        }
    }

    /// Append an offset to a track's raw list.
    pub fn push_track(&mut self, key: TrackKey, offset: Offset) -> Result<(), OffsetOrderError> {
        self.tracks.entry(key).or_default().push(offset)
    }

    /// Record an insertion in the reference aggregate of a chromosome.
    pub fn record_reference_insertion(&mut self, chromosome: &Arc<str>, offset: Offset) {
        self.reference
            .entry(Arc::clone(chromosome))
            .or_default()
            .insert_widest(offset);
    }

    /// Move every list of `other` into this store.
    ///
    /// Reference aggregates are unioned (widest insertion per locus).
    /// A track present in both stores is rejected and nothing is moved.
    pub fn absorb(&mut self, other: OffsetStore) -> Result<(), TrackKey> {
        if let Some(key) = other.tracks.keys().find(|key| self.tracks.contains_key(*key)) {
            return Err(key.clone());
        }

        self.tracks.extend(other.tracks);
        for (chromosome, list) in other.reference {
            match self.reference.get_mut(&chromosome) {
                Some(existing) => existing.union_widest(&list),
                None => {
                    self.reference.insert(chromosome, list);
                }
            }
        }
        Ok(())
    }

    pub(crate) fn into_parts(self) -> (HashMap<TrackKey, OffsetList>, HashMap<Arc<str>, OffsetList>) {
        (self.tracks, self.reference)
    }

    /// Assemble a store from lists built elsewhere (tests, persistence).
    pub fn from_parts(
        tracks: HashMap<TrackKey, OffsetList>,
        reference: HashMap<Arc<str>, OffsetList>,
    ) -> Self {
        Self { tracks, reference }
    }
}
