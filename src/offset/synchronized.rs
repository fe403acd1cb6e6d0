use std::fmt;

/// Closed boundary of a synchronized list.
///
/// Genome positions from `position` up to the next boundary map to
/// `target + (genome_position - position)` on the meta-genome axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    /// First genome-axis position governed by this boundary.
    pub position: u64,
    /// Meta-genome coordinate of `position`.
    pub target: u64,
}

impl Boundary {
    /// Construct a boundary.
    pub fn new(position: u64, target: u64) -> Self {
        Self { position, target }
    }

    /// Meta-genome minus genome coordinate from this boundary on.
    ///
    /// Saturates at 0 for a malformed boundary whose target lies before
    /// its position.
    pub fn shift(&self) -> u64 {
        self.target.saturating_sub(self.position)
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.position, self.target)
    }
}

/// Translation table of one track, produced by the merger.
///
/// Boundaries are strictly increasing in both position and target and
/// every boundary increases the shift.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynchronizedOffsetList {
    boundaries: Vec<Boundary>,
    genome_length: Option<u64>,
    meta_length: Option<u64>,
}

impl SynchronizedOffsetList {
    /// Empty table: identity translation.
    pub fn identity() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        boundaries: Vec<Boundary>,
        genome_length: Option<u64>,
        meta_length: Option<u64>,
    ) -> Self {
        Self {
            boundaries,
            genome_length,
            meta_length,
        }
    }

    /// Boundaries in ascending order.
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Number of boundaries.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Whether no shift applies anywhere.
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Chromosome length on the genome axis, when the reference length was known.
    pub fn genome_length(&self) -> Option<u64> {
        self.genome_length
    }

    /// Chromosome length on the meta-genome axis, when the reference length was known.
    pub fn meta_length(&self) -> Option<u64> {
        self.meta_length
    }
}
