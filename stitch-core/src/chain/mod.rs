//! Observer Chains
//!
//! Every view owns a chain of observers, one per binding. Chains nest: a
//! view created by a conditional or repeat binding gets its own chain, which
//! is spliced into the enclosing view's chain right after the binding that
//! created it.
//!
//! # Overview
//!
//! All observers of all attached chains form one flat doubly-linked list.
//! A chain is just a `head`/`tail` window onto that list plus a link to its
//! parent chain. Walking `head → next` until `tail` visits exactly the
//! chain's own observers and those of the chains attached inside it, in
//! document order.
//!
//! # Design Decisions
//!
//! 1. Observers and chains live in an [`ObserverArena`] and refer to each
//!    other by id. The list is cyclic in the ownership sense (every node
//!    points both ways), which ids express without reference counting.
//!
//! 2. When a chain is inserted at or removed from the end of its parent, the
//!    parent's tail moves, and so does every ancestor's tail that pointed at
//!    the same observer. The same goes for heads at the start. This keeps
//!    every chain's window contiguous at every nesting level without any
//!    chain knowing about its siblings.
//!
//! 3. Evaluation is a single sequential pass that re-reads links after each
//!    callback, because callbacks are exactly what attaches and detaches
//!    child chains.
//!
//! # Lifecycle
//!
//! ```text
//! create_chain ──▶ Detached ──insert_chain──▶ Attached
//!                     ▲  │                       │
//!                     │  └──dispose_chain──▶ ✕   │
//!                     └──────remove_chain────────┘
//! ```

mod arena;
mod node;

pub use arena::ObserverArena;
pub use node::{ChainId, EvaluationStats, InsertAfter, ObserverId};
