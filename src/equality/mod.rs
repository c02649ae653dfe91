//! Deep structural equality.
//!
//! - [`Value`]: the dynamic value model (primitives plus shared compound
//!   objects, which may form cycles)
//! - [`Comparator`]: prioritized, cycle-guarded structural comparison
//! - [`SuppressUnlessChanged`]: skips calls whose arguments did not change

mod compare;
mod suppress;
mod value;

pub use compare::{equals, Comparator, EqualityError, EqualityOptions, Strategy};
pub use suppress::{suppress_unless_changed, Arguments, SuppressUnlessChanged};
pub use value::{
    same_value, same_value_zero, Compound, Object, Species, TypedArrayKind, Value,
};
