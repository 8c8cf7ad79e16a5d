//! Observer Implementation
//!
//! An Observer is a single unit of change detection. It pairs a getter with a
//! callback and remembers what the getter returned last time.
//!
//! # How Observers Work
//!
//! 1. On evaluation, the getter runs with the observer's scope arguments.
//!
//! 2. If the new and previous values are both lists, they are diffed. A
//!    non-empty splice list means the value changed.
//!
//! 3. Otherwise the two values are compared with strict equality.
//!
//! 4. Only a change updates the remembered value and fires the callback.
//!    Unchanged dependencies never trigger downstream work.
//!
//! # Callbacks
//!
//! The callback receives the [`ObserverArena`] the observer lives in, so a
//! conditional or repeat binding can attach and detach child chains while the
//! chain walk is in progress.

use std::fmt;

use smallvec::SmallVec;

use super::value::Value;
use crate::chain::{ObserverArena, ObserverId};
use crate::diff::{diff_with, Splice};

/// Scope arguments passed to a getter: the data object, plus loop locals
/// inside repeat bindings.
pub type Args = SmallVec<[Value; 2]>;

/// Reads the current value through the observer's scope arguments.
pub type Getter = Box<dyn Fn(&[Value]) -> Value>;

/// Invoked when the observed value changes.
pub type Callback = Box<dyn FnMut(&mut ObserverArena, &Change<'_>)>;

/// What a callback learns about a change.
#[derive(Debug, Clone, Copy)]
pub struct Change<'a> {
    /// The arena slot of the observer that changed, when it was evaluated as
    /// part of an arena.
    pub observer: Option<ObserverId>,

    /// The value the getter just returned.
    pub value: &'a Value,

    /// The value remembered from the previous change.
    pub old_value: &'a Value,

    /// Set when both values are lists.
    pub splices: Option<&'a [Splice<Value>]>,
}

/// A getter/callback pair plus the last value it saw.
///
/// # Example
///
/// ```rust
/// use stitch_core::chain::ObserverArena;
/// use stitch_core::reactive::{Observer, Value};
///
/// let data = Value::object([("title", Value::from("Hello"))]);
///
/// let mut observer = Observer::new(
///     [data.clone()],
///     |args| args[0].get("title"),
///     |_, change| println!("title is now {:?}", change.value),
/// );
///
/// let mut arena = ObserverArena::new();
/// assert!(observer.evaluate(&mut arena));
/// assert!(!observer.evaluate(&mut arena));
/// ```
pub struct Observer {
    args: Args,
    getter: Getter,
    callback: Callback,
    last_value: Value,
}

impl Observer {
    /// Create an observer. Its last value starts out as `Undefined`.
    pub fn new<A, G, C>(args: A, getter: G, callback: C) -> Self
    where
        A: IntoIterator<Item = Value>,
        G: Fn(&[Value]) -> Value + 'static,
        C: FnMut(&mut ObserverArena, &Change<'_>) + 'static,
    {
        Self {
            args: args.into_iter().collect(),
            getter: Box::new(getter),
            callback: Box::new(callback),
            last_value: Value::Undefined,
        }
    }

    /// The scope arguments the getter is called with.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Replace the scope arguments, e.g. when a pooled view is reused for a
    /// different list item. The remembered value is kept.
    pub fn set_args<A>(&mut self, args: A)
    where
        A: IntoIterator<Item = Value>,
    {
        self.args = args.into_iter().collect();
    }

    /// The value remembered from the last change.
    pub fn last_value(&self) -> &Value {
        &self.last_value
    }

    /// Run the getter without comparing or remembering anything.
    pub fn current_value(&self) -> Value {
        (self.getter)(&self.args)
    }

    /// Evaluate the getter and fire the callback if the value changed.
    ///
    /// Returns whether the callback fired.
    pub fn evaluate(&mut self, arena: &mut ObserverArena) -> bool {
        self.evaluate_as(arena, None)
    }

    pub(crate) fn evaluate_as(
        &mut self,
        arena: &mut ObserverArena,
        observer: Option<ObserverId>,
    ) -> bool {
        let value = self.current_value();

        let splices = match (value.as_list(), self.last_value.as_list()) {
            (Some(new_items), Some(old_items)) => {
                let splices = diff_with(
                    new_items.borrow().as_slice(),
                    old_items.borrow().as_slice(),
                    arena.diff_config(),
                );
                if splices.is_empty() {
                    return false;
                }
                Some(splices)
            }
            _ => {
                if value.strict_eq(&self.last_value) {
                    return false;
                }
                None
            }
        };

        let old_value = std::mem::replace(&mut self.last_value, value.snapshot());
        let change = Change {
            observer,
            value: &value,
            old_value: &old_value,
            splices: splices.as_deref(),
        };
        (self.callback)(arena, &change);
        true
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("args", &self.args)
            .field("last_value", &self.last_value)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
