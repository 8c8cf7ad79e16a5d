//! Sequence Diff
//!
//! Computes the splices that turn an old ordered sequence into a new one.
//! Observers use this to tell a repeat binding exactly which items appeared
//! and disappeared instead of handing it a whole new list.
//!
//! # Algorithm
//!
//! 1. Trim the common prefix, then the common suffix (never past the prefix).
//! 2. If nothing is left on one side the answer is a single pure insertion or
//!    pure deletion.
//! 3. Otherwise fill an insert/delete edit-distance matrix over the trimmed
//!    ranges, backtrack from the bottom-right cell and coalesce the resulting
//!    script into splices.
//!
//! Equality is whatever `PartialEq` says for the element type. For
//! [`Value`](crate::reactive::Value) that is strict equality: lists and
//! objects compare by identity, never structurally.
//!
//! # Limits
//!
//! The matrix costs O(n·m) time and memory over the trimmed ranges. That is
//! fine for UI-sized lists. [`DiffConfig::max_matrix_cells`] caps it; past the
//! cap the whole trimmed range is reported as one replacement splice, which
//! still patches correctly but is no longer minimal.

mod edit;
mod splice;

pub use splice::{apply_splices, edit_cost, Splice};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DiffError;
use crate::reactive::Value;
use edit::{coalesce, shared_prefix, shared_suffix, EditMatrix};

/// Tuning for the diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Largest edit matrix (rows × columns) the engine will allocate.
    /// `None` removes the cap.
    pub max_matrix_cells: Option<usize>,
}

impl DiffConfig {
    pub const DEFAULT_MAX_MATRIX_CELLS: usize = 2048 * 2048;

    /// A configuration without a matrix cap.
    pub fn unbounded() -> Self {
        Self {
            max_matrix_cells: None,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_matrix_cells: Some(Self::DEFAULT_MAX_MATRIX_CELLS),
        }
    }
}

/// Diff `new` against `old` with the default configuration.
///
/// # Example
///
/// ```rust
/// use stitch_core::diff::{diff, Splice};
///
/// let splices = diff(&[1, 5, 3], &[1, 2, 3]);
/// assert_eq!(splices, vec![Splice { index: 1, removed: vec![2], added_count: 1 }]);
/// ```
pub fn diff<T>(new: &[T], old: &[T]) -> Vec<Splice<T>>
where
    T: PartialEq + Clone,
{
    diff_with(new, old, &DiffConfig::default())
}

/// Diff `new` against `old`.
pub fn diff_with<T>(new: &[T], old: &[T], config: &DiffConfig) -> Vec<Splice<T>>
where
    T: PartialEq + Clone,
{
    let prefix = shared_prefix(new, old);
    let suffix = shared_suffix(new, old, new.len().min(old.len()) - prefix);

    let new_end = new.len() - suffix;
    let old_end = old.len() - suffix;
    let new_range = &new[prefix..new_end];
    let old_range = &old[prefix..old_end];

    if new_range.is_empty() && old_range.is_empty() {
        return Vec::new();
    }

    if new_range.is_empty() || old_range.is_empty() || exceeds_limit(new_range, old_range, config)
    {
        return vec![Splice {
            index: prefix,
            removed: old_range.to_vec(),
            added_count: new_range.len(),
        }];
    }

    let matrix = EditMatrix::build(new_range, old_range);
    let ops = matrix.operations(new_range, old_range);
    coalesce(&ops, prefix, old)
}

fn exceeds_limit<T>(new: &[T], old: &[T], config: &DiffConfig) -> bool {
    let Some(max) = config.max_matrix_cells else {
        return false;
    };
    let cells = (new.len() + 1).saturating_mul(old.len() + 1);
    if cells > max {
        warn!(
            new_len = new.len(),
            old_len = old.len(),
            max_matrix_cells = max,
            "diff matrix limit exceeded, reporting a single replacement splice"
        );
        return true;
    }
    false
}

/// Diff two dynamic values, which must both be lists.
pub fn diff_values(new: &Value, old: &Value) -> Result<Vec<Splice<Value>>, DiffError> {
    diff_values_with(new, old, &DiffConfig::default())
}

/// [`diff_values`] with an explicit configuration.
pub fn diff_values_with(
    new: &Value,
    old: &Value,
    config: &DiffConfig,
) -> Result<Vec<Splice<Value>>, DiffError> {
    match (new.as_list(), old.as_list()) {
        (Some(new_items), Some(old_items)) => {
            let new_items = new_items.borrow();
            let old_items = old_items.borrow();
            Ok(diff_with(new_items.as_slice(), old_items.as_slice(), config))
        }
        _ => Err(DiffError::TypeMismatch {
            new: new.type_name(),
            old: old.type_name(),
        }),
    }
}

/// Insert/delete distance between two sequences, computed directly from the
/// full matrix without trimming.
pub fn edit_distance<T: PartialEq>(new: &[T], old: &[T]) -> usize {
    EditMatrix::build(new, old).distance()
}
