//! Splice records and how to apply them.

use serde::{Deserialize, Serialize};

use crate::error::DiffError;

/// One contiguous edit region of a sequence diff.
///
/// `index` is a position in the *new* sequence. `removed` holds the elements
/// of the *old* sequence that were taken out at that position and
/// `added_count` says how many elements of the new sequence replaced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Splice<T> {
    pub index: usize,
    pub removed: Vec<T>,
    pub added_count: usize,
}

impl<T> Splice<T> {
    /// An empty splice at `index`, filled in while coalescing edit operations.
    pub(crate) fn open(index: usize) -> Self {
        Self {
            index,
            removed: Vec::new(),
            added_count: 0,
        }
    }

    /// Number of single-element insertions and deletions this splice stands for.
    pub fn cost(&self) -> usize {
        self.removed.len() + self.added_count
    }

    /// Range of the new sequence covered by the added elements.
    pub fn added_range(&self) -> std::ops::Range<usize> {
        self.index..self.index + self.added_count
    }
}

/// Total edit cost of a splice list.
pub fn edit_cost<T>(splices: &[Splice<T>]) -> usize {
    splices.iter().map(Splice::cost).sum()
}

/// Patch `target` (the old sequence) in place so that it equals `source`.
///
/// `splices` must come from diffing `source` against `target` and are applied
/// in ascending index order. Added elements are cloned out of `source`.
pub fn apply_splices<T: Clone>(
    target: &mut Vec<T>,
    splices: &[Splice<T>],
    source: &[T],
) -> Result<(), DiffError> {
    for splice in splices {
        let remove_end = splice.index + splice.removed.len();
        if remove_end > target.len() {
            return Err(DiffError::SpliceOutOfBounds {
                end: remove_end,
                len: target.len(),
            });
        }
        let added = splice.added_range();
        if added.end > source.len() {
            return Err(DiffError::SpliceOutOfBounds {
                end: added.end,
                len: source.len(),
            });
        }
        target.splice(splice.index..remove_end, source[added].iter().cloned());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_counts_removed_and_added() {
        let splice = Splice {
            index: 2,
            removed: vec!['a', 'b'],
            added_count: 1,
        };
        assert_eq!(splice.cost(), 3);
        assert_eq!(splice.added_range(), 2..3);
        assert_eq!(edit_cost(&[splice.clone(), splice]), 6);
    }

    #[test]
    fn apply_rebuilds_new_sequence() {
        let mut old = vec![1, 2, 3, 4];
        let new = [1, 9, 3, 5, 6];
        let splices = [
            Splice {
                index: 1,
                removed: vec![2],
                added_count: 1,
            },
            Splice {
                index: 3,
                removed: vec![4],
                added_count: 2,
            },
        ];

        apply_splices(&mut old, &splices, &new).unwrap();
        assert_eq!(old, new);
    }

    #[test]
    fn apply_rejects_out_of_bounds_splice() {
        let mut old = vec![1];
        let splices = [Splice {
            index: 0,
            removed: vec![1, 2],
            added_count: 0,
        }];

        let err = apply_splices(&mut old, &splices, &[]).unwrap_err();
        assert_eq!(err, DiffError::SpliceOutOfBounds { end: 2, len: 1 });
        assert_eq!(old, vec![1]);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let splice = Splice {
            index: 3,
            removed: Vec::<i32>::new(),
            added_count: 1,
        };
        let json = serde_json::to_value(&splice).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "index": 3, "removed": [], "addedCount": 1 })
        );
    }
}
