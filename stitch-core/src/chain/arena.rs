//! Observer Arena
//!
//! The arena owns every observer and every chain. Links between observers
//! and the parent links between chains are ids into the arena, so the
//! doubly-linked structure has no ownership cycles and every splice is O(1)
//! apart from the ancestor walk for head/tail propagation.

use std::collections::{HashMap, HashSet};

use tracing::{debug, debug_span, trace, warn};

use super::node::{ChainId, ChainRecord, EvaluationStats, InsertAfter, ObserverId, ObserverNode};
use crate::diff::DiffConfig;
use crate::error::ChainError;
use crate::reactive::Observer;

/// Owner of all observers and chains.
///
/// # Example
///
/// ```rust
/// use stitch_core::chain::{InsertAfter, ObserverArena};
/// use stitch_core::reactive::{Observer, Value};
///
/// let mut arena = ObserverArena::new();
/// let root = arena.create_chain([Observer::new([], |_| Value::from(1), |_, _| {})]);
/// let child = arena.create_chain([Observer::new([], |_| Value::from(2), |_, _| {})]);
///
/// let anchor = arena.chain_tail(root).unwrap().unwrap();
/// arena.insert_chain(root, child, InsertAfter::Node(anchor)).unwrap();
///
/// let stats = arena.evaluate_chain(root).unwrap();
/// assert_eq!(stats.visited, 2);
/// ```
#[derive(Debug, Default)]
pub struct ObserverArena {
    observers: HashMap<ObserverId, ObserverNode>,
    chains: HashMap<ChainId, ChainRecord>,
    config: DiffConfig,
}

impl ObserverArena {
    /// Create an empty arena with the default diff configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty arena that diffs lists with `config`.
    pub fn with_config(config: DiffConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The configuration observers in this arena diff with.
    pub fn diff_config(&self) -> &DiffConfig {
        &self.config
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Link `observers` into a new, detached chain in the given order.
    pub fn create_chain<I>(&mut self, observers: I) -> ChainId
    where
        I: IntoIterator<Item = Observer>,
    {
        let chain = ChainId::new();
        let mut record = ChainRecord::default();

        for observer in observers {
            let id = ObserverId::new();
            self.observers
                .insert(id, ObserverNode::new(observer, chain, record.tail));
            match record.tail {
                Some(tail) => self.set_next(tail, Some(id)),
                None => record.head = Some(id),
            }
            record.tail = Some(id);
        }

        self.chains.insert(chain, record);
        debug!(chain = chain.raw(), "chain.create");
        chain
    }

    // ------------------------------------------------------------------------
    // Structural splicing
    // ------------------------------------------------------------------------

    /// Splice `chain` into `parent`'s range at `after`.
    ///
    /// If the anchor was the parent's tail, the parent's tail and every
    /// ancestor tail that pointed at the same observer move to `chain`'s tail.
    /// Inserting at [`InsertAfter::Start`] moves heads the same way.
    pub fn insert_chain(
        &mut self,
        parent: ChainId,
        chain: ChainId,
        after: InsertAfter,
    ) -> Result<(), ChainError> {
        let parent_record = *self.chain(parent)?;
        let record = *self.chain(chain)?;

        if let Some(current) = record.parent {
            return Err(ChainError::AlreadyAttached {
                chain,
                parent: current,
            });
        }
        if self.is_within(parent, chain) {
            return Err(ChainError::Cycle { parent, chain });
        }
        let Some(parent_head) = parent_record.head else {
            return Err(ChainError::EmptyParent(parent));
        };
        if let InsertAfter::Node(anchor) = after {
            self.check_anchor(parent, anchor)?;
        }

        self.set_parent(chain, Some(parent));

        let (Some(head), Some(tail)) = (record.head, record.tail) else {
            debug!(parent = parent.raw(), chain = chain.raw(), "chain.insert empty");
            return Ok(());
        };

        let (prev, next) = match after {
            InsertAfter::Start => (self.prev_of(parent_head), Some(parent_head)),
            InsertAfter::Node(anchor) => (Some(anchor), self.next_of(anchor)),
        };

        self.set_prev(head, prev);
        self.set_next(tail, next);
        if let Some(prev) = prev {
            self.set_next(prev, Some(head));
        }
        if let Some(next) = next {
            self.set_prev(next, Some(tail));
        }

        match after {
            InsertAfter::Node(anchor) => {
                self.propagate(parent, |r| &mut r.tail, Some(anchor), Some(tail));
            }
            InsertAfter::Start => {
                self.propagate(parent, |r| &mut r.head, Some(parent_head), Some(head));
            }
        }

        debug!(
            parent = parent.raw(),
            chain = chain.raw(),
            ?after,
            "chain.insert"
        );
        Ok(())
    }

    /// Unlink `chain` from its parent, bridging the gap it leaves.
    ///
    /// Ancestor tails that pointed at `chain`'s tail regress to the observer
    /// before it; ancestor heads that pointed at `chain`'s head advance to
    /// the observer after it.
    pub fn remove_chain(&mut self, chain: ChainId) -> Result<(), ChainError> {
        let record = *self.chain(chain)?;
        let Some(parent) = record.parent else {
            return Err(ChainError::NotAttached(chain));
        };

        self.set_parent(chain, None);

        let (Some(head), Some(tail)) = (record.head, record.tail) else {
            debug!(parent = parent.raw(), chain = chain.raw(), "chain.remove empty");
            return Ok(());
        };

        let prev = self.prev_of(head);
        let next = self.next_of(tail);

        self.set_prev(head, None);
        self.set_next(tail, None);
        if let Some(prev) = prev {
            self.set_next(prev, next);
        }
        if let Some(next) = next {
            self.set_prev(next, prev);
        }

        self.propagate(parent, |r| &mut r.tail, Some(tail), prev);
        self.propagate(parent, |r| &mut r.head, Some(head), next);

        debug!(parent = parent.raw(), chain = chain.raw(), "chain.remove");
        Ok(())
    }

    /// Drop a detached chain together with its observers and every chain
    /// still attached somewhere beneath it.
    pub fn dispose_chain(&mut self, chain: ChainId) -> Result<(), ChainError> {
        let record = *self.chain(chain)?;
        if record.parent.is_some() {
            return Err(ChainError::StillAttached(chain));
        }

        let nodes = self.walk(record);
        let mut descendants: HashSet<ChainId> = nodes
            .iter()
            .filter_map(|id| self.observers.get(id).map(|node| node.chain))
            .collect();
        descendants.insert(chain);

        // Chains without observers never show up in the walk. Nothing can be
        // inserted into them, so they hang directly off a walked owner.
        let empty: Vec<ChainId> = self
            .chains
            .iter()
            .filter(|(_, r)| r.head.is_none())
            .filter(|(_, r)| r.parent.is_some_and(|p| descendants.contains(&p)))
            .map(|(&id, _)| id)
            .collect();
        descendants.extend(empty);

        for id in &nodes {
            self.observers.remove(id);
        }
        for id in &descendants {
            self.chains.remove(id);
        }

        debug!(
            chain = chain.raw(),
            observers = nodes.len(),
            chains = descendants.len(),
            "chain.dispose"
        );
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Evaluate a single observer in place. Returns whether its callback fired.
    ///
    /// An observer whose own callback is currently running is skipped.
    pub fn evaluate(&mut self, id: ObserverId) -> Result<bool, ChainError> {
        let node = self
            .observers
            .get_mut(&id)
            .ok_or(ChainError::UnknownObserver(id))?;
        let Some(mut observer) = node.observer.take() else {
            warn!(observer = id.raw(), "observer is already being evaluated, skipping");
            return Ok(false);
        };

        let changed = observer.evaluate_as(self, Some(id));
        if changed {
            trace!(observer = id.raw(), "observer.changed");
        }

        // The callback may have disposed this observer's chain.
        if let Some(node) = self.observers.get_mut(&id) {
            node.observer = Some(observer);
        }
        Ok(changed)
    }

    /// Evaluate every observer from `chain`'s head to its tail, in order.
    ///
    /// Callbacks may restructure the list while the walk is in progress, so
    /// the next observer and the chain's tail are read again after every
    /// evaluation instead of being collected up front:
    ///
    /// - a chain inserted after the current observer is visited before the
    ///   walk ends, even when it extends `chain`'s tail;
    /// - an observer removed before the walk reaches it is not visited;
    /// - if the current observer itself leaves `chain`, the walk continues
    ///   after the last observer that was still in range once evaluated, or
    ///   from the head if that one has left too;
    /// - if `chain` is disposed, the walk stops.
    pub fn evaluate_chain(&mut self, chain: ChainId) -> Result<EvaluationStats, ChainError> {
        let span = debug_span!("chain.evaluate", chain = chain.raw());
        let _guard = span.enter();

        let mut cursor = self.chain(chain)?.head;
        let mut pivot: Option<ObserverId> = None;
        let mut stats = EvaluationStats::default();

        while let Some(id) = cursor {
            if self.evaluate(id)? {
                stats.changed += 1;
            }
            stats.visited += 1;

            let Some(&ChainRecord { head, tail, .. }) = self.chains.get(&chain) else {
                debug!("chain disposed during evaluation");
                break;
            };

            if self.in_range(id, chain) {
                pivot = Some(id);
            } else if pivot.is_some_and(|p| !self.in_range(p, chain)) {
                pivot = None;
            }

            cursor = match pivot {
                Some(p) if Some(p) == tail => None,
                Some(p) => self.next_of(p),
                None => head,
            };
        }

        debug!(visited = stats.visited, changed = stats.changed, "chain.evaluated");
        Ok(stats)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    pub fn chain_head(&self, chain: ChainId) -> Result<Option<ObserverId>, ChainError> {
        Ok(self.chain(chain)?.head)
    }

    pub fn chain_tail(&self, chain: ChainId) -> Result<Option<ObserverId>, ChainError> {
        Ok(self.chain(chain)?.tail)
    }

    pub fn chain_parent(&self, chain: ChainId) -> Result<Option<ChainId>, ChainError> {
        Ok(self.chain(chain)?.parent)
    }

    pub fn is_attached(&self, chain: ChainId) -> Result<bool, ChainError> {
        Ok(self.chain(chain)?.parent.is_some())
    }

    /// The chain an observer was created in.
    pub fn owner(&self, id: ObserverId) -> Result<ChainId, ChainError> {
        Ok(self.node(id)?.chain)
    }

    /// Observers from `chain`'s head to its tail, attached descendants included.
    pub fn observers(&self, chain: ChainId) -> Result<Vec<ObserverId>, ChainError> {
        Ok(self.walk(*self.chain(chain)?))
    }

    pub fn chain_len(&self, chain: ChainId) -> Result<usize, ChainError> {
        self.observers(chain).map(|ids| ids.len())
    }

    /// Borrow an observer. `None` while its own callback is running.
    pub fn observer(&self, id: ObserverId) -> Option<&Observer> {
        self.observers.get(&id).and_then(|n| n.observer.as_ref())
    }

    pub fn observer_mut(&mut self, id: ObserverId) -> Option<&mut Observer> {
        self.observers.get_mut(&id).and_then(|n| n.observer.as_mut())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn chain(&self, id: ChainId) -> Result<&ChainRecord, ChainError> {
        self.chains.get(&id).ok_or(ChainError::UnknownChain(id))
    }

    fn set_parent(&mut self, id: ChainId, parent: Option<ChainId>) {
        if let Some(record) = self.chains.get_mut(&id) {
            record.parent = parent;
        }
    }

    fn node(&self, id: ObserverId) -> Result<&ObserverNode, ChainError> {
        self.observers
            .get(&id)
            .ok_or(ChainError::UnknownObserver(id))
    }

    fn prev_of(&self, id: ObserverId) -> Option<ObserverId> {
        self.observers.get(&id).and_then(|n| n.prev)
    }

    fn next_of(&self, id: ObserverId) -> Option<ObserverId> {
        self.observers.get(&id).and_then(|n| n.next)
    }

    fn set_next(&mut self, id: ObserverId, next: Option<ObserverId>) {
        if let Some(node) = self.observers.get_mut(&id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: ObserverId, prev: Option<ObserverId>) {
        if let Some(node) = self.observers.get_mut(&id) {
            node.prev = prev;
        }
    }

    /// Whether `chain` is `ancestor` or attached somewhere beneath it.
    fn is_within(&self, chain: ChainId, ancestor: ChainId) -> bool {
        let mut cursor = Some(chain);
        while let Some(c) = cursor {
            if c == ancestor {
                return true;
            }
            cursor = self.chains.get(&c).and_then(|r| r.parent);
        }
        false
    }

    /// An anchor must be one of `parent`'s own observers, or the tail of
    /// every chain between its owner and `parent`. Anything else would link
    /// the new chain inside a descendant's range.
    fn check_anchor(&self, parent: ChainId, anchor: ObserverId) -> Result<(), ChainError> {
        let mut owner = self.node(anchor)?.chain;
        while owner != parent {
            let record = self.chain(owner)?;
            let Some(up) = record.parent else {
                return Err(ChainError::AnchorOutsideParent { parent, anchor });
            };
            if record.tail != Some(anchor) {
                // Only reported once the anchor is known to sit under `parent`.
                if !self.is_within(up, parent) {
                    return Err(ChainError::AnchorOutsideParent { parent, anchor });
                }
                return Err(ChainError::AnchorInsideChild {
                    chain: owner,
                    anchor,
                });
            }
            owner = up;
        }
        Ok(())
    }

    /// Whether observer `id` currently lies within `chain`'s range.
    fn in_range(&self, id: ObserverId, chain: ChainId) -> bool {
        self.observers
            .get(&id)
            .is_some_and(|node| self.is_within(node.chain, chain))
    }

    /// Starting at `from`, replace the bound selected by `bound` with `to`
    /// for as long as it still equals `old`, moving up through parents.
    fn propagate<F>(
        &mut self,
        from: ChainId,
        bound: F,
        old: Option<ObserverId>,
        to: Option<ObserverId>,
    ) where
        F: Fn(&mut ChainRecord) -> &mut Option<ObserverId>,
    {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let Some(record) = self.chains.get_mut(&id) else {
                break;
            };
            let slot = bound(record);
            if *slot != old {
                break;
            }
            *slot = to;
            cursor = record.parent;
        }
    }

    fn walk(&self, record: ChainRecord) -> Vec<ObserverId> {
        let mut ids = Vec::new();
        let mut cursor = record.head;
        while let Some(id) = cursor {
            ids.push(id);
            if Some(id) == record.tail {
                break;
            }
            cursor = self.next_of(id);
        }
        ids
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
