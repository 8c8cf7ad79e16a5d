//! Stitch Core
//!
//! This crate provides the change detection and reconciliation engine for
//! the Stitch view library. It implements:
//!
//! - A sequence diff that reports the minimal splices between two lists
//! - Observers that re-run a getter and fire a callback only on change
//! - Nestable observer chains that views splice in and out as they are
//!   created and destroyed
//!
//! Template compilation, DOM patching and component lifecycles live outside
//! this crate; they consume the splices and change notifications produced
//! here.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `diff`: Sequence diff and splice application
//! - `reactive`: Dynamic values and the observer primitive
//! - `chain`: The observer arena, chain splicing and the update walk
//! - `binding`: Template binding descriptors that build a view's chain
//!
//! Everything is single-threaded and pull-based: nothing runs until a driver
//! calls [`chain::ObserverArena::evaluate_chain`].
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use stitch_core::chain::ObserverArena;
//! use stitch_core::reactive::{Observer, Value};
//!
//! # fn main() -> stitch_core::Result<()> {
//! let todos = Value::list([Value::from("write"), Value::from("test")]);
//! let data = Value::object([("todos", todos.clone())]);
//! let patches = Rc::new(RefCell::new(Vec::new()));
//!
//! let mut arena = ObserverArena::new();
//! let sink = patches.clone();
//! let view = arena.create_chain([Observer::new(
//!     [data],
//!     |args| args[0].get("todos"),
//!     move |_, change| {
//!         if let Some(splices) = change.splices {
//!             sink.borrow_mut().extend(splices.iter().cloned());
//!         }
//!     },
//! )]);
//!
//! arena.evaluate_chain(view)?;
//! todos.as_list().unwrap().borrow_mut().push(Value::from("ship"));
//! arena.evaluate_chain(view)?;
//!
//! assert_eq!(patches.borrow().len(), 1);
//! assert_eq!(patches.borrow()[0].index, 2);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod chain;
pub mod diff;
pub mod error;
pub mod reactive;

pub use error::{ChainError, DiffError, Error, Result};
