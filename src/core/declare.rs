//! Runtime enumeration declarations.
//!
//! [`declare_enum`] mints a closed set of opaque [`Symbol`]s from a list of
//! key names known only at runtime. Every rule of a declaration is checked
//! and ALL violations are reported together, using Stillwater's
//! `Validation` to accumulate them instead of stopping at the first one.

use crate::core::enumeration::Label;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

static NEXT_DECLARATION: AtomicU64 = AtomicU64::new(1);

/// A single rule broken by an enumeration declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationViolation {
    #[error("must specify type name")]
    EmptyTypeName,

    #[error("must specify at least one key")]
    NoKeys,

    #[error("key at position {index} must not be empty")]
    EmptyKey { index: usize },

    #[error("duplicate key '{key}'")]
    DuplicateKey { key: String },
}

/// An enumeration declaration was rejected; the enumeration was not created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid declaration of enumeration '{type_name}': {}", summarize(.violations))]
pub struct DeclarationError {
    pub type_name: String,
    pub violations: Vec<DeclarationViolation>,
}

impl DeclarationError {
    /// Check whether a specific violation was reported.
    pub fn has(&self, violation: &DeclarationViolation) -> bool {
        self.violations.contains(violation)
    }
}

fn summarize(violations: &[DeclarationViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type Check = Validation<(), NonEmptyVec<DeclarationViolation>>;

fn check_type_name(type_name: &str) -> Check {
    if type_name.is_empty() {
        Validation::fail(DeclarationViolation::EmptyTypeName)
    } else {
        Validation::success(())
    }
}

fn check_keys_present(keys: &[String]) -> Check {
    if keys.is_empty() {
        Validation::fail(DeclarationViolation::NoKeys)
    } else {
        Validation::success(())
    }
}

fn check_key_not_empty(index: usize, key: &str) -> Check {
    if key.is_empty() {
        Validation::fail(DeclarationViolation::EmptyKey { index })
    } else {
        Validation::success(())
    }
}

fn duplicate_checks(keys: &[String]) -> Vec<Check> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut checks = Vec::new();
    for key in keys.iter().filter(|key| !key.is_empty()) {
        if !seen.insert(key.as_str()) && reported.insert(key.as_str()) {
            checks.push(Validation::fail(DeclarationViolation::DuplicateKey {
                key: key.clone(),
            }));
        }
    }
    checks
}

/// Validate a declaration, accumulating every violation.
fn validate(type_name: &str, keys: &[String]) -> Check {
    let mut checks = vec![check_type_name(type_name), check_keys_present(keys)];
    checks.extend(
        keys.iter()
            .enumerate()
            .map(|(index, key)| check_key_not_empty(index, key)),
    );
    checks.extend(duplicate_checks(keys));

    Validation::all_vec(checks).map(|_| ())
}

/// Declare a closed enumeration at runtime.
///
/// Fails when the type name is empty, no keys are given, any key is empty,
/// or keys are not pairwise distinct. Every violation is reported.
///
/// # Example
///
/// ```rust
/// use tilelock::core::declare_enum;
///
/// let state = declare_enum("STATE", ["up", "down"]).unwrap();
/// let up = state.symbol("up").unwrap();
///
/// assert_eq!(state.key_of(&up), Some("up"));
/// assert_eq!(up.to_string(), "STATE.up");
/// assert!(declare_enum("STATE", ["a", "a"]).is_err());
/// ```
pub fn declare_enum<I, K>(type_name: &str, keys: I) -> Result<DeclaredEnum, DeclarationError>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();

    match validate(type_name, &keys) {
        Validation::Success(()) => {
            let declaration = NEXT_DECLARATION.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(type_name, keys = keys.len(), "declared enumeration");
            Ok(DeclaredEnum {
                declaration,
                type_name: Rc::from(type_name),
                keys: keys.into_iter().map(Rc::from).collect(),
            })
        }
        Validation::Failure(errors) => Err(DeclarationError {
            type_name: type_name.to_string(),
            violations: errors.iter().cloned().collect(),
        }),
    }
}

/// A closed set of symbols created by [`declare_enum`].
///
/// Immutable after declaration. Symbols from different declarations never
/// compare equal, even when type and key names coincide.
#[derive(Debug, Clone)]
pub struct DeclaredEnum {
    declaration: u64,
    type_name: Rc<str>,
    keys: Vec<Rc<str>>,
}

impl DeclaredEnum {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always `false`; a declaration holds at least one key.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Forward lookup: key name to symbol.
    pub fn symbol(&self, key: &str) -> Option<Symbol> {
        self.keys
            .iter()
            .position(|k| k.as_ref() == key)
            .map(|index| self.symbol_at(index))
    }

    /// Reverse lookup: symbol to key name, if the symbol belongs here.
    pub fn key_of(&self, symbol: &Symbol) -> Option<&str> {
        if symbol.declaration != self.declaration {
            return None;
        }
        self.keys.get(symbol.index).map(AsRef::as_ref)
    }

    /// All symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.keys.len()).map(|index| self.symbol_at(index))
    }

    fn symbol_at(&self, index: usize) -> Symbol {
        Symbol {
            declaration: self.declaration,
            index,
            type_name: Rc::clone(&self.type_name),
            key: Rc::clone(&self.keys[index]),
        }
    }
}

/// Opaque identifier minted by a runtime declaration.
///
/// Equality and hashing use only the declaration identity and position; the
/// names are carried for display.
#[derive(Clone)]
pub struct Symbol {
    declaration: u64,
    index: usize,
    type_name: Rc<str>,
    key: Rc<str>,
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.declaration == other.declaration && self.index == other.index
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaration.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}.{})", self.type_name, self.key)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.key)
    }
}

impl Label for Symbol {
    fn label(&self) -> &str {
        &self.key
    }
}
