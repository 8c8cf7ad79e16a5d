//! Error types for the change detection engine.
//!
//! Diffing can only fail on a type mismatch and applying splices only on a
//! splice that does not fit the sequence. Every chain operation checks its
//! structural preconditions before touching a link, so an `Err` always leaves
//! the arena exactly as it was.

use thiserror::Error;

use crate::chain::{ChainId, ObserverId};

/// Convenience alias for callers that handle diff and chain failures together.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of the sequence diff entry point for dynamic values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("both values for a sequence diff must be lists (got {new} and {old})")]
    TypeMismatch {
        new: &'static str,
        old: &'static str,
    },

    #[error("splice reaches index {end} of a sequence with {len} elements")]
    SpliceOutOfBounds { end: usize, len: usize },
}

/// A violated precondition of a chain operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain {0:?} does not exist in this arena")]
    UnknownChain(ChainId),

    #[error("observer {0:?} does not exist in this arena")]
    UnknownObserver(ObserverId),

    #[error("chain {chain:?} is already attached to {parent:?}")]
    AlreadyAttached { chain: ChainId, parent: ChainId },

    #[error("chain {0:?} is not attached to a parent")]
    NotAttached(ChainId),

    #[error("chain {0:?} must be removed from its parent before it is disposed")]
    StillAttached(ChainId),

    #[error("observer {anchor:?} is not part of chain {parent:?}")]
    AnchorOutsideParent { parent: ChainId, anchor: ObserverId },

    #[error("observer {anchor:?} lies inside attached chain {chain:?} but is not its tail")]
    AnchorInsideChild { chain: ChainId, anchor: ObserverId },

    #[error("chain {0:?} has no observers to insert into")]
    EmptyParent(ChainId),

    #[error("chain {chain:?} cannot be inserted into its own descendant {parent:?}")]
    Cycle { parent: ChainId, chain: ChainId },
}

/// Any error produced by this crate.
///
/// Nothing in the crate returns it directly; it lets callers mix diff and
/// chain operations behind a single `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}
