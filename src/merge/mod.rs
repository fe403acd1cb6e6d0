//! Offset merger: reconciles one allele's raw offsets with the reference
//! aggregate of the same chromosome.
//!
//! The sweep walks both ascending lists together. Insertions this allele
//! shares at full width only lengthen the pending run; everything that
//! changes the meta-genome minus genome shift opens a boundary, which is
//! closed once the sweep has passed the reference bases it covers.
//!
//! For a boundary opened at locus `p`, with the anchor of the previous
//! boundary at reference base `r0` (genome `g0`, meta `m0`):
//!
//! ```text
//! genome = p - r0 + g0 + pending + own_insertion + 1
//! meta   = next_ref - r0 + m0 + pending + widest_insertion
//! ```
//!
//! where `next_ref` is the first reference base after the variant. The
//! `+ 1` puts the boundary on the base after the variant, never on it.
//! An allele insertion anchored inside its own deleted span splits the
//! boundary: the inserted bases start on the first slot column.

use std::fmt;

use thiserror::Error;
use tracing::warn;

use crate::offset::{Boundary, Offset, OffsetList, OffsetOrderError, SynchronizedOffsetList};

/// Which input list of a merge is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
    /// Reference aggregate list.
    Reference,
    /// Allele list.
    Allele,
}

impl fmt::Display for ListRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListRole::Reference => f.write_str("reference"),
            ListRole::Allele => f.write_str("allele"),
        }
    }
}

/// Internal-consistency failure detected by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// An input list is not strictly ascending.
    #[error("{role} offsets are not ascending: {source}")]
    Unordered {
        /// List that broke the invariant.
        role: ListRole,
        /// Offending pair of positions.
        source: OffsetOrderError,
    },
}

/// Merge an allele's offsets against the reference aggregate.
pub fn merge(
    reference: &OffsetList,
    allele: &OffsetList,
) -> Result<SynchronizedOffsetList, MergeError> {
    merge_inner(reference, allele, None)
}

/// Same as [`merge`], also recording the chromosome's length on both axes.
pub fn merge_with_length(
    reference: &OffsetList,
    allele: &OffsetList,
    reference_length: u64,
) -> Result<SynchronizedOffsetList, MergeError> {
    merge_inner(reference, allele, Some(reference_length))
}

fn merge_inner(
    reference: &OffsetList,
    allele: &OffsetList,
    reference_length: Option<u64>,
) -> Result<SynchronizedOffsetList, MergeError> {
    reference
        .check_ascending()
        .map_err(|source| MergeError::Unordered {
            role: ListRole::Reference,
            source,
        })?;
    allele
        .check_ascending()
        .map_err(|source| MergeError::Unordered {
            role: ListRole::Allele,
            source,
        })?;

    let mut sweep = Sweep::new();
    let mut refs = reference.iter().copied().peekable();
    let mut own = allele.iter().copied().peekable();

    loop {
        match (refs.peek().copied(), own.peek().copied()) {
            (Some(r), Some(a)) if r.position == a.position => {
                refs.next();
                own.next();
                sweep.step(r.position, Some(r), Some(a));
            }
            (Some(r), Some(a)) if a.position < r.position => {
                own.next();
                sweep.step(a.position, None, Some(a));
            }
            (Some(r), _) => {
                refs.next();
                sweep.step(r.position, Some(r), None);
            }
            (None, Some(a)) => {
                own.next();
                sweep.step(a.position, None, Some(a));
            }
            (None, None) => break,
        }
    }

    Ok(sweep.finish(reference_length))
}

/// Coordinates of the first reference base after the last closed boundary.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    reference: u64,
    genome: u64,
    meta: u64,
}

/// Boundary whose reference span may still grow.
#[derive(Debug, Clone, Copy)]
struct OpenBoundary {
    locus: u64,
    /// Last reference base lacking a genome base before the boundary.
    span_end: u64,
    own_insertion: u64,
    widest_insertion: u64,
}

#[derive(Debug)]
struct Sweep {
    anchor: Anchor,
    pending_length: u64,
    open: Option<OpenBoundary>,
    boundaries: Vec<Boundary>,
}

impl Sweep {
    fn new() -> Self {
        Self {
            anchor: Anchor {
                reference: 0,
                genome: 0,
                meta: 0,
            },
            pending_length: 0,
            open: None,
            boundaries: Vec::new(),
        }
    }

    /// Process every offset found at one reference locus.
    fn step(&mut self, locus: u64, reference: Option<Offset>, allele: Option<Offset>) {
        let own_insertion = allele.map_or(0, |a| a.inserted_len());
        let own_deletion = allele.map_or(0, |a| a.deleted_len());
        let widest = reference.map_or(0, |r| r.inserted_len()).max(own_insertion);

        if let Some(open) = self.open.as_mut() {
            if locus <= open.span_end {
                if own_insertion > 0 {
                    self.split_at_insertion(locus, own_insertion, widest);
                    return;
                }
                if let Some(a) = allele {
                    warn!(
                        offset = %a,
                        deleted_through = open.span_end,
                        "allele deletion overlaps a deleted span; extending boundary"
                    );
                }
                open.span_end = open.span_end.max(locus + own_deletion);
                open.widest_insertion += widest;
                return;
            }
            self.close();
        }

        if own_deletion == 0 && widest == own_insertion {
            self.pending_length += own_insertion;
            return;
        }

        self.open = Some(OpenBoundary {
            locus,
            span_end: locus + own_deletion,
            own_insertion,
            widest_insertion: widest,
        });
    }

    /// Own insertion anchored on a base this allele deleted.
    ///
    /// The open boundary is closed on the first insertion slot so the
    /// inserted bases occupy the slot columns, then the rest of the deleted
    /// span (and any slots this allele leaves empty) reopens at `locus`.
    fn split_at_insertion(&mut self, locus: u64, own_insertion: u64, widest: u64) {
        let Some(open) = self.open.take() else {
            return;
        };
        let span_end = open.span_end;
        self.open = Some(OpenBoundary {
            span_end: locus,
            ..open
        });
        self.close();

        if span_end > locus || widest > own_insertion {
            self.open = Some(OpenBoundary {
                locus,
                span_end,
                own_insertion,
                widest_insertion: widest,
            });
        } else {
            self.pending_length += own_insertion;
        }
    }

    fn close(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let anchor = self.anchor;
        let next_ref = open.span_end + 1;

        // After a split the anchor lies one past `open.locus`.
        let genome = open.locus + anchor.genome + self.pending_length + open.own_insertion + 1
            - anchor.reference;
        let meta =
            next_ref + anchor.meta + self.pending_length + open.widest_insertion - anchor.reference;

        self.boundaries.push(Boundary::new(genome, meta));
        self.anchor = Anchor {
            reference: next_ref,
            genome,
            meta,
        };
        self.pending_length = 0;
    }

    fn finish(mut self, reference_length: Option<u64>) -> SynchronizedOffsetList {
        self.close();

        let (genome_length, meta_length) = match reference_length {
            Some(length) => {
                let (genome_length, meta_length) = self.axis_lengths(length);
                (Some(genome_length), Some(meta_length))
            }
            None => (None, None),
        };

        SynchronizedOffsetList::new(self.boundaries, genome_length, meta_length)
    }

    /// Lengths of the chromosome on the genome and meta-genome axes.
    ///
    /// Both follow from where the base right after the chromosome end lands.
    fn axis_lengths(&self, reference_length: u64) -> (u64, u64) {
        let end = reference_length + 1;
        let anchor = self.anchor;
        let (genome_end, meta_end) = if end >= anchor.reference {
            let run = end - anchor.reference + self.pending_length;
            (anchor.genome + run, anchor.meta + run)
        } else {
            // A deletion ran past the chromosome end.
            (anchor.genome, anchor.meta - (anchor.reference - end))
        };
        (genome_end.saturating_sub(1), meta_end.saturating_sub(1))
    }
}
