//! Reactive Primitives
//!
//! This module holds the per-dependency half of change detection: the
//! dynamic [`Value`] a getter produces and the [`Observer`] that remembers it.
//!
//! # Concepts
//!
//! ## Values
//!
//! Application data is read through [`Value`]s. Scalars compare by value;
//! lists and objects are shared references that compare by identity, except
//! that an observer looks inside lists to report splices.
//!
//! ## Observers
//!
//! An Observer is pull-based: nothing happens until someone evaluates it.
//! Evaluation re-runs the getter and fires the callback only when the result
//! differs from the previous one. Observers are normally evaluated in bulk by
//! walking an observer chain (see [`crate::chain`]).

mod observer;
mod value;

pub use observer::{Args, Callback, Change, Getter, Observer};
pub use value::{List, Object, Value};
