//! Dynamic value model compared by the structural comparator.
//!
//! Primitive values are held inline. Compound values live behind an
//! [`Object`] handle: cloning the handle shares the same object, and handle
//! identity is what "reference-identical" means to the comparator. Records
//! and sequences can be mutated through the handle after construction,
//! which is how cyclic structures are built.

use chrono::{DateTime, FixedOffset};
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Constructor tag of a compound value, e.g. `Array`, `Set`, or the name of
/// a subclass. Two compounds of the same category but different species are
/// never equal.
pub type Species = Rc<str>;

/// Element type of a fixed-width numeric buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypedArrayKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

/// A value the comparator understands.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Object(Object),
}

/// The payload of a compound value.
pub enum Compound {
    /// Ordered sequence.
    Array { species: Species, items: Vec<Value> },
    /// Fixed-width numeric buffer.
    TypedArray {
        kind: TypedArrayKind,
        items: Vec<f64>,
    },
    /// Instant with the UTC offset it was recorded in.
    Date(DateTime<FixedOffset>),
    /// Regular-expression-like pattern.
    Pattern {
        species: Species,
        source: String,
        flags: String,
    },
    /// Unordered collection, unique under same-value-zero.
    Set { species: Species, items: Vec<Value> },
    /// Keyed collection in insertion order, keys unique under
    /// same-value-zero.
    Map {
        species: Species,
        entries: Vec<(Value, Value)>,
    },
    /// Plain record with fields in insertion order.
    Record(Vec<(String, Value)>),
    /// Externally owned handle, such as a UI element. Only equal to itself.
    Handle { kind: String },
    /// Any other object shape. Unsupported by the comparator unless the two
    /// operands are the same object.
    Opaque { class: String },
}

impl Compound {
    /// Short description used in diagnostics and errors.
    pub fn describe(&self) -> String {
        match self {
            Compound::Array { species, .. } => species.to_string(),
            Compound::TypedArray { kind, .. } => format!("{kind:?}Array"),
            Compound::Date(_) => "Date".to_string(),
            Compound::Pattern { species, .. } => species.to_string(),
            Compound::Set { species, .. } => species.to_string(),
            Compound::Map { species, .. } => species.to_string(),
            Compound::Record(_) => "Object".to_string(),
            Compound::Handle { kind } => kind.clone(),
            Compound::Opaque { class } => class.clone(),
        }
    }
}

/// Shared handle to a compound value.
#[derive(Clone)]
pub struct Object(Rc<RefCell<Compound>>);

impl Object {
    pub fn new(compound: Compound) -> Self {
        Self(Rc::new(RefCell::new(compound)))
    }

    /// Borrow the compound payload.
    pub fn borrow(&self) -> Ref<'_, Compound> {
        self.0.borrow()
    }

    /// Whether both handles refer to the same object.
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Set a record field, replacing an existing field of the same name.
    /// Returns `false` if this object is not a record.
    pub fn set_field(&self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        match &mut *self.0.borrow_mut() {
            Compound::Record(fields) => {
                match fields.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, slot)) => *slot = value,
                    None => fields.push((key, value)),
                }
                true
            }
            _ => false,
        }
    }

    /// Read a record field.
    pub fn field(&self, key: &str) -> Option<Value> {
        match &*self.0.borrow() {
            Compound::Record(fields) => fields
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Append to a sequence. Returns `false` if this object is not one.
    pub fn push(&self, value: Value) -> bool {
        match &mut *self.0.borrow_mut() {
            Compound::Array { items, .. } => {
                items.push(value);
                true
            }
            _ => false,
        }
    }

    /// Look a key up in a keyed map using same-value-zero.
    pub fn get(&self, key: &Value) -> Option<Value> {
        match &*self.0.borrow() {
            Compound::Map { entries, .. } => entries
                .iter()
                .find(|(k, _)| same_value_zero(k, key))
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }
}

impl fmt::Debug for Object {
    // Never recurse: objects may be cyclic.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(compound) => write!(f, "Object({}@{:#x})", compound.describe(), self.address()),
            Err(_) => write!(f, "Object(<borrowed>@{:#x})", self.address()),
        }
    }
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array(items: impl IntoIterator<Item = Value>) -> Self {
        Self::array_of("Array", items)
    }

    /// Sequence with an explicit species tag.
    pub fn array_of(species: &str, items: impl IntoIterator<Item = Value>) -> Self {
        Value::Object(Object::new(Compound::Array {
            species: Rc::from(species),
            items: items.into_iter().collect(),
        }))
    }

    pub fn typed_array(kind: TypedArrayKind, items: impl IntoIterator<Item = f64>) -> Self {
        Value::Object(Object::new(Compound::TypedArray {
            kind,
            items: items.into_iter().collect(),
        }))
    }

    pub fn date(instant: DateTime<FixedOffset>) -> Self {
        Value::Object(Object::new(Compound::Date(instant)))
    }

    pub fn pattern(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Value::Object(Object::new(Compound::Pattern {
            species: Rc::from("RegExp"),
            source: source.into(),
            flags: flags.into(),
        }))
    }

    /// Set of `items`; later duplicates under same-value-zero are dropped.
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        let mut unique: Vec<Value> = Vec::new();
        for item in items {
            if !unique.iter().any(|u| same_value_zero(u, &item)) {
                unique.push(item);
            }
        }
        Value::Object(Object::new(Compound::Set {
            species: Rc::from("Set"),
            items: unique,
        }))
    }

    /// Keyed map of `entries`; a repeated key overwrites the earlier value
    /// but keeps its original position.
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut unique: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match unique.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
                Some((_, slot)) => *slot = value,
                None => unique.push((key, value)),
            }
        }
        Value::Object(Object::new(Compound::Map {
            species: Rc::from("Map"),
            entries: unique,
        }))
    }

    pub fn record<K: Into<String>>(fields: impl IntoIterator<Item = (K, Value)>) -> Self {
        let object = Object::new(Compound::Record(Vec::new()));
        for (key, value) in fields {
            object.set_field(key, value);
        }
        Value::Object(object)
    }

    pub fn handle(kind: impl Into<String>) -> Self {
        Value::Object(Object::new(Compound::Handle { kind: kind.into() }))
    }

    pub fn opaque(class: impl Into<String>) -> Self {
        Value::Object(Object::new(Compound::Opaque {
            class: class.into(),
        }))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short description of the value's type.
    pub fn type_name(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(_) => "boolean".to_string(),
            Value::Number(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::Object(object) => object.borrow().describe(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(Rc::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

fn numbers_same_value(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b && a.is_sign_negative() == b.is_sign_negative()
}

/// Identity equality: `NaN` equals `NaN`, `+0` does not equal `-0`, and
/// objects are equal only to themselves.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => numbers_same_value(*x, *y),
        _ => identical_otherwise(a, b),
    }
}

/// Membership equality of sets and map keys: like [`same_value`] except
/// `+0` equals `-0`.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => (x.is_nan() && y.is_nan()) || x == y,
        _ => identical_otherwise(a, b),
    }
}

fn identical_otherwise(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}
