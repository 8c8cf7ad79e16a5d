//! Template Bindings
//!
//! A compiled template describes its bindings once; every view stamped out
//! of the template gets its own observers for them. This module is the seam
//! between the two: a [`TemplateBinding`] is a plain descriptor, and
//! [`TemplateBinding::instantiate`] copies its getter and update handler into
//! a fresh [`Observer`] scoped to one view's arguments.
//!
//! What a binding actually does to the view (set text, toggle a fragment,
//! patch a list) lives in its update handler and is up to the caller.

use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::chain::{ChainId, ObserverArena};
use crate::reactive::{Change, Observer, Value};

/// Getter shared by every view created from a template.
pub type SharedGetter = Rc<dyn Fn(&[Value]) -> Value>;

/// Update handler shared by every view created from a template.
pub type SharedUpdate = Rc<dyn Fn(&mut ObserverArena, &Change<'_>)>;

/// What kind of binding a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Text,
    Attribute,
    Conditional,
    Repeat,
    /// Event listeners have no getter and never produce an observer.
    Event,
}

/// A binding as the compiled template describes it.
#[derive(Clone)]
pub struct TemplateBinding {
    kind: BindingKind,
    getter: Option<SharedGetter>,
    update: Option<SharedUpdate>,
}

impl TemplateBinding {
    pub fn new(kind: BindingKind) -> Self {
        Self {
            kind,
            getter: None,
            update: None,
        }
    }

    /// Set the getter that reads this binding's value from the view's args.
    pub fn with_getter<G>(mut self, getter: G) -> Self
    where
        G: Fn(&[Value]) -> Value + 'static,
    {
        self.getter = Some(Rc::new(getter));
        self
    }

    /// Set the handler run when the value changes.
    pub fn on_update<U>(mut self, update: U) -> Self
    where
        U: Fn(&mut ObserverArena, &Change<'_>) + 'static,
    {
        self.update = Some(Rc::new(update));
        self
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    /// Whether views created from this binding get an observer.
    pub fn is_observed(&self) -> bool {
        self.getter.is_some()
    }

    /// Build this binding's observer for one view.
    ///
    /// Returns `None` for bindings without a getter.
    pub fn instantiate(&self, args: &[Value]) -> Option<Observer> {
        let getter = self.getter.clone()?;
        let update = self.update.clone();

        Some(Observer::new(
            args.iter().cloned(),
            move |args| getter(args),
            move |arena, change| {
                if let Some(update) = &update {
                    update(arena, change);
                }
            },
        ))
    }
}

impl fmt::Debug for TemplateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateBinding")
            .field("kind", &self.kind)
            .field("observed", &self.is_observed())
            .field("has_update", &self.update.is_some())
            .finish()
    }
}

/// The bindings of one compiled template, in document order.
#[derive(Debug, Clone, Default)]
pub struct ViewTemplate {
    bindings: Vec<TemplateBinding>,
}

impl ViewTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, binding: TemplateBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn bindings(&self) -> &[TemplateBinding] {
        &self.bindings
    }

    /// Create a view's observer chain from this template.
    ///
    /// The chain starts out detached; attach it with
    /// [`ObserverArena::insert_chain`] or evaluate it directly as a root.
    pub fn create_view(&self, arena: &mut ObserverArena, args: &[Value]) -> ChainId {
        let chain = arena.create_chain(
            self.bindings
                .iter()
                .filter_map(|binding| binding.instantiate(args)),
        );
        debug!(
            chain = chain.raw(),
            bindings = self.bindings.len(),
            "view.create"
        );
        chain
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn event_bindings_produce_no_observer() {
        let binding = TemplateBinding::new(BindingKind::Event);
        assert!(!binding.is_observed());
        assert!(binding.instantiate(&[Value::Null]).is_none());
    }

    #[test]
    fn instances_share_getter_but_not_state() {
        let binding =
            TemplateBinding::new(BindingKind::Text).with_getter(|args| args[0].get("label"));
        let mut arena = ObserverArena::new();

        let first = Value::object([("label", Value::from("one"))]);
        let second = Value::object([("label", Value::from("two"))]);
        let mut a = binding.instantiate(&[first]).unwrap();
        let mut b = binding.instantiate(&[second]).unwrap();

        assert!(a.evaluate(&mut arena));
        assert!(b.evaluate(&mut arena));
        assert_eq!(a.last_value(), &Value::from("one"));
        assert_eq!(b.last_value(), &Value::from("two"));
    }

    #[test]
    fn view_chain_follows_binding_order() {
        let seen: Rc<RefCell<Vec<BindingKind>>> = Rc::default();
        let record = |kind: BindingKind| {
            let seen = seen.clone();
            TemplateBinding::new(kind)
                .with_getter(|args| args[0].clone())
                .on_update(move |_, _| seen.borrow_mut().push(kind))
        };

        let template = ViewTemplate::new()
            .with_binding(record(BindingKind::Attribute))
            .with_binding(TemplateBinding::new(BindingKind::Event))
            .with_binding(record(BindingKind::Text));
        assert_eq!(template.bindings().len(), 3);

        let mut arena = ObserverArena::new();
        let view = template.create_view(&mut arena, &[Value::from(1)]);
        assert_eq!(arena.chain_len(view).unwrap(), 2);

        arena.evaluate_chain(view).unwrap();
        assert_eq!(
            *seen.borrow(),
            vec![BindingKind::Attribute, BindingKind::Text]
        );
    }
}
