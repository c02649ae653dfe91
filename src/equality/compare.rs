//! Deep structural equality with cycle protection.
//!
//! Two compound values are compared by the first [`Strategy`] in
//! [`Strategy::PRIORITY`] that accepts both of them. The order is a strict
//! precedence list; a pair no strategy accepts is equal only if identical,
//! and otherwise fails with [`EqualityError::UnsupportedType`].

use super::value::{same_value, same_value_zero, Compound, Object, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised by the comparator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EqualityError {
    #[error("unsupported type(s) of objects: {left} and {right}")]
    UnsupportedType { left: String, right: String },
}

/// Comparator behavior switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualityOptions {
    /// Also require equal modifier flags when comparing patterns. Off by
    /// default: patterns compare by species and source text only.
    pub compare_pattern_flags: bool,
}

/// Comparison strategy for one category of compound values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Sequence,
    NumericBuffer,
    Date,
    Pattern,
    Set,
    KeyedMap,
    Record,
    Handle,
}

impl Strategy {
    /// Precedence order; the first strategy accepting both operands wins.
    pub const PRIORITY: [Strategy; 8] = [
        Strategy::Sequence,
        Strategy::NumericBuffer,
        Strategy::Date,
        Strategy::Pattern,
        Strategy::Set,
        Strategy::KeyedMap,
        Strategy::Record,
        Strategy::Handle,
    ];

    fn accepts(self, compound: &Compound) -> bool {
        matches!(
            (self, compound),
            (Strategy::Sequence, Compound::Array { .. })
                | (Strategy::NumericBuffer, Compound::TypedArray { .. })
                | (Strategy::Date, Compound::Date(_))
                | (Strategy::Pattern, Compound::Pattern { .. })
                | (Strategy::Set, Compound::Set { .. })
                | (Strategy::KeyedMap, Compound::Map { .. })
                | (Strategy::Record, Compound::Record(_))
                | (Strategy::Handle, Compound::Handle { .. })
        )
    }

    /// Select the strategy for a pair of compounds, if any accepts both.
    pub fn select(a: &Compound, b: &Compound) -> Option<Strategy> {
        Self::PRIORITY
            .into_iter()
            .find(|strategy| strategy.accepts(a) && strategy.accepts(b))
    }
}

/// Object pairs currently assumed equal while their contents are compared.
#[derive(Default)]
struct Visited(HashSet<(usize, usize)>);

impl Visited {
    /// Record the pair `(a, b)`. Returns `true` if it was already recorded,
    /// meaning the comparison has come full circle.
    fn enter(&mut self, a: &Object, b: &Object) -> bool {
        !self.0.insert((a.address(), b.address()))
    }
}

/// Structural comparator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator {
    options: EqualityOptions,
}

impl Comparator {
    pub fn new(options: EqualityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> EqualityOptions {
        self.options
    }

    /// Compare two values structurally.
    ///
    /// Fails with [`EqualityError::UnsupportedType`] when no strategy
    /// accepts both operands and they are not the same object. This covers
    /// objects outside every category as well as pairs from two different
    /// categories.
    pub fn equals(&self, a: &Value, b: &Value) -> Result<bool, EqualityError> {
        self.compare(a, b, &mut Visited::default())
    }

    fn compare(&self, a: &Value, b: &Value, visited: &mut Visited) -> Result<bool, EqualityError> {
        let (Value::Object(x), Value::Object(y)) = (a, b) else {
            return Ok(same_value(a, b));
        };

        let (ca, cb) = (x.borrow(), y.borrow());
        let Some(strategy) = Strategy::select(&ca, &cb) else {
            return Self::fallback(x, &ca, y, &cb);
        };
        tracing::trace!(?strategy, "comparing compound values");

        match (strategy, &*ca, &*cb) {
            (
                Strategy::Sequence,
                Compound::Array { species: sa, items: ia },
                Compound::Array { species: sb, items: ib },
            ) => {
                if sa != sb || ia.len() != ib.len() {
                    return Ok(false);
                }
                if visited.enter(x, y) {
                    return Ok(true);
                }
                self.all_pairs(ia.iter().zip(ib), visited)
            }
            (
                Strategy::NumericBuffer,
                Compound::TypedArray { kind: ka, items: ia },
                Compound::TypedArray { kind: kb, items: ib },
            ) => Ok(ka == kb
                && ia.len() == ib.len()
                && ia
                    .iter()
                    .zip(ib)
                    .all(|(p, q)| same_value(&Value::Number(*p), &Value::Number(*q)))),
            (Strategy::Date, Compound::Date(da), Compound::Date(db)) => {
                Ok(da.offset() == db.offset() && da.timestamp_millis() == db.timestamp_millis())
            }
            (
                Strategy::Pattern,
                Compound::Pattern {
                    species: sa,
                    source: pa,
                    flags: fa,
                },
                Compound::Pattern {
                    species: sb,
                    source: pb,
                    flags: fb,
                },
            ) => Ok(sa == sb && pa == pb && (!self.options.compare_pattern_flags || fa == fb)),
            (
                Strategy::Set,
                Compound::Set { species: sa, items: ia },
                Compound::Set { species: sb, items: ib },
            ) => Ok(sa == sb
                && ia.len() == ib.len()
                && ia
                    .iter()
                    .all(|item| ib.iter().any(|other| same_value_zero(item, other)))),
            (
                Strategy::KeyedMap,
                Compound::Map {
                    species: sa,
                    entries: ea,
                },
                Compound::Map {
                    species: sb,
                    entries: eb,
                },
            ) => {
                if sa != sb || ea.len() != eb.len() {
                    return Ok(false);
                }
                if visited.enter(x, y) {
                    return Ok(true);
                }
                for (key, value) in ea {
                    let other = eb
                        .iter()
                        .find(|(k, _)| same_value_zero(k, key))
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    if !self.compare(value, &other, visited)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Strategy::Record, Compound::Record(fa), Compound::Record(fb)) => {
                if visited.enter(x, y) {
                    return Ok(true);
                }
                for (key, value) in fa {
                    let other = fb
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default();
                    if !self.compare(value, &other, visited)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            (Strategy::Handle, Compound::Handle { .. }, Compound::Handle { .. }) => Ok(x.ptr_eq(y)),
            _ => Self::fallback(x, &ca, y, &cb),
        }
    }

    fn all_pairs<'a>(
        &self,
        pairs: impl Iterator<Item = (&'a Value, &'a Value)>,
        visited: &mut Visited,
    ) -> Result<bool, EqualityError> {
        for (p, q) in pairs {
            if !self.compare(p, q, visited)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Identity, else an error: no strategy knows how to relate the pair.
    fn fallback(
        x: &Object,
        ca: &Compound,
        y: &Object,
        cb: &Compound,
    ) -> Result<bool, EqualityError> {
        if x.ptr_eq(y) {
            return Ok(true);
        }
        Err(EqualityError::UnsupportedType {
            left: ca.describe(),
            right: cb.describe(),
        })
    }
}

/// Compare two values with the default options.
///
/// # Example
///
/// ```rust
/// use tilelock::equality::{equals, Value};
///
/// let a = Value::array([Value::from(1), Value::from(2)]);
/// let b = Value::array([Value::from(1), Value::from(2)]);
///
/// assert!(equals(&a, &b).unwrap());
/// assert!(equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)).unwrap());
/// assert!(!equals(&Value::Number(0.0), &Value::Number(-0.0)).unwrap());
/// ```
pub fn equals(a: &Value, b: &Value) -> Result<bool, EqualityError> {
    Comparator::default().equals(a, b)
}
