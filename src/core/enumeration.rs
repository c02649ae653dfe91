//! Closed enumerations used as states and transition keys.
//!
//! States and transition keys are members of closed sets declared once.
//! In Rust the natural representation is a fieldless enum: the compiler
//! guarantees the set is non-empty, names are unique, and matches over it
//! are exhaustive. The [`enumeration!`](crate::enumeration) macro generates
//! such an enum together with its name table.

use std::fmt::Debug;

/// A value that can describe itself for diagnostics and error messages.
///
/// The state machine only needs to compare states and keys and print them
/// when a transition is rejected, so this is its only bound on both.
pub trait Label: Clone + PartialEq + Debug {
    /// Display name of this member.
    fn label(&self) -> &str;
}

/// A closed, statically declared set of named members.
///
/// Provides the bidirectional mapping between members and their names:
/// [`name`](Enumeration::name) for forward display and
/// [`from_name`](Enumeration::from_name) for reverse lookup.
///
/// # Example
///
/// ```rust
/// use tilelock::core::Enumeration;
/// use tilelock::enumeration;
///
/// enumeration! {
///     pub enum Light {
///         Red,
///         Green,
///     }
/// }
///
/// assert_eq!(Light::TYPE_NAME, "Light");
/// assert_eq!(Light::ALL, &[Light::Red, Light::Green]);
/// assert_eq!(Light::from_name("Green"), Some(Light::Green));
/// assert_eq!(Light::Red.qualified_name(), "Light.Red");
/// ```
pub trait Enumeration: Label + Copy + Eq + std::hash::Hash + 'static {
    /// Name of the enumeration type.
    const TYPE_NAME: &'static str;

    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Name of this member.
    fn name(&self) -> &'static str;

    /// Reverse lookup by member name.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|member| member.name() == name)
    }

    /// `TYPE.member`, the form used when debugging.
    fn qualified_name(&self) -> String {
        format!("{}.{}", Self::TYPE_NAME, self.name())
    }

    /// Position of this member in declaration order.
    fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|member| member == self)
            .unwrap_or_default()
    }
}
