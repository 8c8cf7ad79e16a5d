//! Property-based tests for the sequence diff.
//!
//! 1. Round-trip: applying `diff(new, old)` to `old` yields `new`
//! 2. Idempotence: a sequence diffed against itself has no splices
//! 3. Minimality: the splices cost exactly the insert/delete edit distance
//! 4. Splices are ascending and non-overlapping
//! 5. The matrix cap never breaks round-trip correctness

use proptest::prelude::*;
use stitch_core::diff::{apply_splices, diff, diff_with, edit_cost, DiffConfig, Splice};

// ── Helpers ──────────────────────────────────────────────────────────

/// Small alphabet so that sequences share plenty of elements.
fn arb_seq() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..5, 0..=24)
}

/// Insert/delete distance via longest common subsequence, independent of
/// the engine's own matrix.
fn lcs_distance(a: &[u8], b: &[u8]) -> usize {
    let mut lcs = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            lcs[i][j] = if a[i] == b[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }
    a.len() + b.len() - 2 * lcs[0][0]
}

fn patched(old: &[u8], splices: &[Splice<u8>], new: &[u8]) -> Vec<u8> {
    let mut target = old.to_vec();
    apply_splices(&mut target, splices, new).expect("splices fit the sequences");
    target
}

// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn round_trip(new in arb_seq(), old in arb_seq()) {
        let splices = diff(&new, &old);
        prop_assert_eq!(patched(&old, &splices, &new), new);
    }

    #[test]
    fn identical_sequences_need_no_splices(seq in arb_seq()) {
        prop_assert!(diff(&seq, &seq).is_empty());
    }

    #[test]
    fn splices_are_minimal(new in arb_seq(), old in arb_seq()) {
        let splices = diff(&new, &old);
        prop_assert_eq!(edit_cost(&splices), lcs_distance(&new, &old));
        prop_assert_eq!(edit_cost(&splices), stitch_core::diff::edit_distance(&new, &old));
    }

    #[test]
    fn splices_are_ordered_and_disjoint(new in arb_seq(), old in arb_seq()) {
        let splices = diff(&new, &old);
        for pair in splices.windows(2) {
            prop_assert!(pair[0].index + pair[0].added_count < pair[1].index);
        }
        for splice in &splices {
            prop_assert!(splice.cost() > 0);
        }
    }

    #[test]
    fn capped_matrix_still_round_trips(new in arb_seq(), old in arb_seq(), cap in 1usize..64) {
        let config = DiffConfig { max_matrix_cells: Some(cap) };
        let splices = diff_with(&new, &old, &config);
        prop_assert_eq!(patched(&old, &splices, &new), new);
    }
}

#[test]
fn documented_examples() {
    let s = |index, removed: Vec<i32>, added_count| Splice {
        index,
        removed,
        added_count,
    };

    assert_eq!(diff(&[1, 2, 3, 9], &[1, 2, 3]), vec![s(3, vec![], 1)]);
    assert_eq!(diff(&[1, 2], &[1, 2, 3]), vec![s(2, vec![3], 0)]);
    assert_eq!(diff(&[1, 5, 3], &[1, 2, 3]), vec![s(1, vec![2], 1)]);
    assert!(diff::<i32>(&[], &[]).is_empty());
    assert!(diff(&[7], &[7]).is_empty());
}
