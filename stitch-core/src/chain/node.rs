//! Chain Nodes
//!
//! This module defines the records that live in the observer arena.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::reactive::Observer;

/// Unique identifier for an observer slot in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Generate a new unique observer ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Unique identifier for a chain in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    /// Generate a new unique chain ID.
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// An observer plus its place in the shared linked list.
#[derive(Debug)]
pub(crate) struct ObserverNode {
    /// `None` only while the observer is checked out for evaluation.
    pub(crate) observer: Option<Observer>,

    /// The chain this observer was created in.
    pub(crate) chain: ChainId,

    pub(crate) prev: Option<ObserverId>,
    pub(crate) next: Option<ObserverId>,
}

impl ObserverNode {
    pub(crate) fn new(observer: Observer, chain: ChainId, prev: Option<ObserverId>) -> Self {
        Self {
            observer: Some(observer),
            chain,
            prev,
            next: None,
        }
    }
}

/// Head/tail bounds of one chain within the shared list.
///
/// `head` and `tail` are both `None` only for a chain created without
/// observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ChainRecord {
    pub(crate) parent: Option<ChainId>,
    pub(crate) head: Option<ObserverId>,
    pub(crate) tail: Option<ObserverId>,
}

/// Where [`insert_chain`](super::ObserverArena::insert_chain) splices a chain in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAfter {
    /// Before the parent's current head.
    Start,

    /// Directly after this observer, which must lie within the parent's range.
    Node(ObserverId),
}

impl From<ObserverId> for InsertAfter {
    fn from(id: ObserverId) -> Self {
        InsertAfter::Node(id)
    }
}

/// Counters from one chain walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvaluationStats {
    /// Observers evaluated.
    pub visited: usize,

    /// Observers whose callback fired.
    pub changed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ObserverId::new(), ObserverId::new());
        assert_ne!(ChainId::new(), ChainId::new());
    }

    #[test]
    fn observer_id_converts_to_anchor() {
        let id = ObserverId::new();
        assert_eq!(InsertAfter::from(id), InsertAfter::Node(id));
    }
}
