//! Offset entries and ordered offset lists
//!
//! An offset marks a reference position from which a coordinate shift
//! applies. Lists are kept strictly ascending by position.

mod synchronized;

pub use synchronized::{Boundary, SynchronizedOffsetList};

use std::fmt;

use thiserror::Error;

/// Shift introduced by one indel at a reference position.
///
/// Positive values are insertions placed after the anchor base,
/// negative values delete `|value|` reference bases after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Offset {
    /// 1-based reference position of the anchor base.
    pub position: u64,
    /// Signed length of the shift.
    pub value: i64,
}

impl Offset {
    /// Construct a new offset.
    pub fn new(position: u64, value: i64) -> Self {
        Self { position, value }
    }

    /// Whether the offset describes inserted bases.
    pub fn is_insertion(&self) -> bool {
        self.value > 0
    }

    /// Whether the offset describes deleted bases.
    pub fn is_deletion(&self) -> bool {
        self.value < 0
    }

    /// Number of reference bases removed (0 unless a deletion).
    pub fn deleted_len(&self) -> u64 {
        if self.value < 0 {
            self.value.unsigned_abs()
        } else {
            0
        }
    }

    /// Number of bases inserted (0 unless an insertion).
    pub fn inserted_len(&self) -> u64 {
        if self.value > 0 {
            self.value as u64
        } else {
            0
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:+}", self.position, self.value)
    }
}

/// Ordering violation detected while appending to an [`OffsetList`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("offset at position {position} does not follow previous position {previous}")]
pub struct OffsetOrderError {
    /// Position of the last entry already in the list.
    pub previous: u64,
    /// Position that was rejected.
    pub position: u64,
}

/// Ascending, duplicate-free list of offsets for one chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetList {
    entries: Vec<Offset>,
}

impl OffsetList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap entries without checking their order.
    ///
    /// Meant for lists restored from storage; the merger re-validates them.
    pub fn from_unchecked(entries: Vec<Offset>) -> Self {
        Self { entries }
    }

    /// Build a list, rejecting any entry that is not strictly ascending.
    pub fn from_sorted(entries: Vec<Offset>) -> Result<Self, OffsetOrderError> {
        let list = Self::from_unchecked(entries);
        list.check_ascending()?;
        Ok(list)
    }

    /// Append an offset that must lie strictly after the current tail.
    pub fn push(&mut self, offset: Offset) -> Result<(), OffsetOrderError> {
        if let Some(last) = self.entries.last() {
            if offset.position <= last.position {
                return Err(OffsetOrderError {
                    previous: last.position,
                    position: offset.position,
                });
            }
        }
        self.entries.push(offset);
        Ok(())
    }

    /// Record an insertion, keeping the widest value per position.
    ///
    /// Entries may arrive from several genomes in any order.
    pub fn insert_widest(&mut self, offset: Offset) {
        let tail = self.entries.last().map(|last| last.position);
        if tail.map_or(true, |position| position < offset.position) {
            self.entries.push(offset);
            return;
        }

        match self
            .entries
            .binary_search_by_key(&offset.position, |entry| entry.position)
        {
            Ok(idx) => {
                let entry = &mut self.entries[idx];
                entry.value = entry.value.max(offset.value);
            }
            Err(idx) => self.entries.insert(idx, offset),
        }
    }

    /// Fold another list into this one with [`OffsetList::insert_widest`].
    pub fn union_widest(&mut self, other: &OffsetList) {
        for offset in other.iter() {
            self.insert_widest(*offset);
        }
    }

    /// Verify the strictly-ascending invariant.
    pub fn check_ascending(&self) -> Result<(), OffsetOrderError> {
        match self
            .entries
            .windows(2)
            .find(|pair| pair[1].position <= pair[0].position)
        {
            Some(pair) => Err(OffsetOrderError {
                previous: pair[0].position,
                position: pair[1].position,
            }),
            None => Ok(()),
        }
    }

    /// Number of offsets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list has no offsets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate offsets in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Offset> {
        self.entries.iter()
    }

    /// Borrow the entries as a slice.
    pub fn as_slice(&self) -> &[Offset] {
        &self.entries
    }

    /// Sum of all signed values (net length change on the genome axis).
    pub fn net_shift(&self) -> i64 {
        self.entries.iter().map(|entry| entry.value).sum()
    }
}

impl<'a> IntoIterator for &'a OffsetList {
    type Item = &'a Offset;
    type IntoIter = std::slice::Iter<'a, Offset>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rejects_non_ascending_positions() {
        let mut list = OffsetList::new();
        list.push(Offset::new(10, 2)).unwrap();
        list.push(Offset::new(20, -1)).unwrap();

        let err = list.push(Offset::new(20, 3)).unwrap_err();
        assert_eq!(
            err,
            OffsetOrderError {
                previous: 20,
                position: 20
            }
        );
        assert!(list.push(Offset::new(5, 1)).is_err());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn insert_widest_keeps_order_and_maximum() {
        let mut list = OffsetList::new();
        list.insert_widest(Offset::new(50, 2));
        list.insert_widest(Offset::new(10, 4));
        list.insert_widest(Offset::new(50, 7));
        list.insert_widest(Offset::new(30, 1));
        list.insert_widest(Offset::new(10, 3));

        let positions: Vec<_> = list.iter().map(|o| (o.position, o.value)).collect();
        assert_eq!(positions, vec![(10, 4), (30, 1), (50, 7)]);
        assert!(list.check_ascending().is_ok());
    }

    #[test]
    fn from_sorted_reports_first_violation() {
        let err = OffsetList::from_sorted(vec![
            Offset::new(1, 1),
            Offset::new(9, 1),
            Offset::new(4, 1),
        ])
        .unwrap_err();
        assert_eq!(err.previous, 9);
        assert_eq!(err.position, 4);
    }

    #[test]
    fn offset_lengths() {
        let ins = Offset::new(3, 4);
        let del = Offset::new(3, -2);
        assert_eq!((ins.inserted_len(), ins.deleted_len()), (4, 0));
        assert_eq!((del.inserted_len(), del.deleted_len()), (0, 2));
        assert_eq!(del.to_string(), "3:-2");
    }
}
