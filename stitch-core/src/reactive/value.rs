//! Dynamic Values
//!
//! Getters read application state through their scope arguments and hand back
//! a [`Value`]. Scalars compare by value. Lists and objects are shared,
//! mutable references (like the data a binding layer reads from), so two of
//! them are strictly equal only when they are the same allocation.
//!
//! # Lists
//!
//! A list is the one kind of value the engine looks inside: when an observer
//! sees a list before and after an evaluation it diffs the two element by
//! element instead of comparing references. Because a list can be mutated in
//! place, the observer keeps a [`Value::snapshot`] as its baseline rather than
//! the live list.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Shared, mutable list storage.
pub type List = Rc<RefCell<Vec<Value>>>;

/// Shared, mutable object storage. Keys keep insertion order.
pub type Object = Rc<RefCell<IndexMap<String, Value>>>;

/// A value produced by a getter.
#[derive(Clone, Default)]
pub enum Value {
    /// Nothing has been observed yet. This is every observer's initial baseline.
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    List(List),
    Object(Object),
}

impl Value {
    /// Create a list value from the given elements.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Value::List(Rc::new(RefCell::new(items.into_iter().collect())))
    }

    /// Create an object value from key/value pairs.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(Rc::new(RefCell::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        )))
    }

    /// Strict equality.
    ///
    /// Scalars and strings compare by value (`NaN` is never equal to itself),
    /// lists and objects by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// A copy that is safe to keep as a comparison baseline.
    ///
    /// Lists get a fresh allocation holding the same elements, so later
    /// mutation of the original list does not show through. Everything else
    /// is returned as is.
    pub fn snapshot(&self) -> Value {
        match self {
            Value::List(items) => Value::list(items.borrow().iter().cloned()),
            other => other.clone(),
        }
    }

    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(_) => "object",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&**s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Truthiness as a conditional binding sees it.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Object(_) => true,
        }
    }

    /// Read a field of an object. Anything else yields `Undefined`.
    pub fn get(&self, key: &str) -> Value {
        self.as_object()
            .and_then(|fields| fields.borrow().get(key).cloned())
            .unwrap_or_default()
    }

    /// Write a field of an object in place. Returns `false` if this is not an object.
    pub fn set(&self, key: impl Into<String>, value: Value) -> bool {
        match self.as_object() {
            Some(fields) => {
                fields.borrow_mut().insert(key.into(), value);
                true
            }
            None => false,
        }
    }

    /// Number of elements if this is a list.
    pub fn len(&self) -> Option<usize> {
        self.as_list().map(|items| items.borrow().len())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items.borrow().iter()).finish(),
            Value::Object(fields) => f.debug_map().entries(fields.borrow().iter()).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            // Every JSON number fits an f64, possibly with precision loss for
            // integers beyond 2^53.
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

/// `Undefined` serializes as a unit (`null` in JSON).
///
/// Lists and objects are walked recursively; a value that contains itself
/// will not terminate.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined => serializer.serialize_unit(),
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let fields = fields.borrow();
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
