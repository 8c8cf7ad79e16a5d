//! Edit-distance matrix and backtracking.
//!
//! The matrix only knows insertions and deletions (cost 1 each); equal
//! elements move diagonally for free. An unequal diagonal step is reported as
//! an update, which counts as one deletion plus one insertion.

use super::splice::Splice;

/// One step of the edit script, in new-sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditOp {
    Leave,
    Update,
    Add,
    Delete,
}

/// Number of leading elements the two sequences share.
pub(crate) fn shared_prefix<T: PartialEq>(new: &[T], old: &[T]) -> usize {
    new.iter().zip(old).take_while(|(a, b)| a == b).count()
}

/// Number of trailing elements shared, looking at no more than `limit`.
pub(crate) fn shared_suffix<T: PartialEq>(new: &[T], old: &[T], limit: usize) -> usize {
    new.iter()
        .rev()
        .zip(old.iter().rev())
        .take(limit)
        .take_while(|(a, b)| a == b)
        .count()
}

/// Row-major `(old.len() + 1) x (new.len() + 1)` distance table.
pub(crate) struct EditMatrix {
    columns: usize,
    cells: Vec<usize>,
}

impl EditMatrix {
    pub(crate) fn build<T: PartialEq>(new: &[T], old: &[T]) -> Self {
        let rows = old.len() + 1;
        let columns = new.len() + 1;
        let mut cells = vec![0; rows * columns];

        for i in 0..rows {
            cells[i * columns] = i;
        }
        for (j, cell) in cells.iter_mut().enumerate().take(columns) {
            *cell = j;
        }

        for i in 1..rows {
            for j in 1..columns {
                cells[i * columns + j] = if new[j - 1] == old[i - 1] {
                    cells[(i - 1) * columns + j - 1]
                } else {
                    let north = cells[(i - 1) * columns + j];
                    let west = cells[i * columns + j - 1];
                    north.min(west) + 1
                };
            }
        }

        Self { columns, cells }
    }

    fn at(&self, row: usize, column: usize) -> usize {
        self.cells[row * self.columns + column]
    }

    /// The insert/delete distance between the two whole sequences.
    pub(crate) fn distance(&self) -> usize {
        self.cells.last().copied().unwrap_or(0)
    }

    /// Walk back from the bottom-right cell and return the edit script in
    /// forward order.
    ///
    /// Only moves that account exactly for the cell's cost are taken, so the
    /// script is always minimal. Among those, diagonal beats horizontal
    /// (add) beats vertical (delete).
    pub(crate) fn operations<T: PartialEq>(&self, new: &[T], old: &[T]) -> Vec<EditOp> {
        let mut i = old.len();
        let mut j = new.len();
        let mut ops = Vec::with_capacity(i + j);

        while i > 0 || j > 0 {
            if i == 0 {
                ops.push(EditOp::Add);
                j -= 1;
                continue;
            }
            if j == 0 {
                ops.push(EditOp::Delete);
                i -= 1;
                continue;
            }

            let current = self.at(i, j);
            let diagonal = self.at(i - 1, j - 1);

            if new[j - 1] == old[i - 1] {
                ops.push(EditOp::Leave);
                i -= 1;
                j -= 1;
            } else if diagonal + 2 == current {
                ops.push(EditOp::Update);
                i -= 1;
                j -= 1;
            } else if self.at(i, j - 1) + 1 == current {
                ops.push(EditOp::Add);
                j -= 1;
            } else {
                ops.push(EditOp::Delete);
                i -= 1;
            }
        }

        ops.reverse();
        ops
    }
}

/// Fold an edit script into splices.
///
/// `start` is where the script begins in both sequences (the shared prefix
/// length); `old` is the full old sequence.
pub(crate) fn coalesce<T: Clone>(ops: &[EditOp], start: usize, old: &[T]) -> Vec<Splice<T>> {
    let mut splices = Vec::new();
    let mut open: Option<Splice<T>> = None;
    let mut index = start;
    let mut old_index = start;

    for op in ops {
        match op {
            EditOp::Leave => {
                if let Some(splice) = open.take() {
                    splices.push(splice);
                }
                index += 1;
                old_index += 1;
            }
            EditOp::Update => {
                let splice = open.get_or_insert_with(|| Splice::open(index));
                splice.added_count += 1;
                splice.removed.push(old[old_index].clone());
                index += 1;
                old_index += 1;
            }
            EditOp::Add => {
                let splice = open.get_or_insert_with(|| Splice::open(index));
                splice.added_count += 1;
                index += 1;
            }
            EditOp::Delete => {
                let splice = open.get_or_insert_with(|| Splice::open(index));
                splice.removed.push(old[old_index].clone());
                old_index += 1;
            }
        }
    }

    splices.extend(open);
    splices
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::EditOp::*;

    #[test]
    fn prefix_and_suffix_do_not_overlap() {
        let new = [1, 2, 1];
        let old = [1, 2, 2, 1];
        let prefix = shared_prefix(&new, &old);
        assert_eq!(prefix, 2);
        let suffix = shared_suffix(&new, &old, new.len().min(old.len()) - prefix);
        assert_eq!(suffix, 1);
    }

    #[test]
    fn matrix_holds_insert_delete_distance() {
        let matrix = EditMatrix::build(&['x', 'a'], &['a', 'y']);
        assert_eq!(matrix.distance(), 2);

        let matrix = EditMatrix::build(&['k', 'i', 't'], &['s', 'i', 't']);
        assert_eq!(matrix.distance(), 2);
    }

    #[test]
    fn unequal_single_elements_become_an_update() {
        let matrix = EditMatrix::build(&[5], &[2]);
        assert_eq!(matrix.operations(&[5], &[2]), vec![Update]);
    }

    #[test]
    fn backtracking_prefers_single_moves_when_cheaper() {
        // Shift by one: dropping `y` and adding `x` costs 2, updating both
        // positions would cost 4.
        let new = ['x', 'a'];
        let old = ['a', 'y'];
        let ops = EditMatrix::build(&new, &old).operations(&new, &old);
        assert_eq!(ops, vec![Add, Leave, Delete]);
    }

    #[test]
    fn coalesce_groups_runs_between_leaves() {
        let ops = [Update, Leave, Add, Delete, Leave, Delete];
        let old = ['a', 'b', 'c', 'd', 'e'];
        let splices = coalesce(&ops, 0, &old);

        assert_eq!(
            splices,
            vec![
                Splice {
                    index: 0,
                    removed: vec!['a'],
                    added_count: 1
                },
                Splice {
                    index: 2,
                    removed: vec!['c'],
                    added_count: 1
                },
                Splice {
                    index: 4,
                    removed: vec!['e'],
                    added_count: 0
                },
            ]
        );
    }
}
