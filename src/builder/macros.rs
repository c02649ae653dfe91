//! Macros for declaring closed enumerations.

/// Declare a closed enumeration and implement [`Enumeration`] and [`Label`]
/// for it.
///
/// At least one member is required, and member names are Rust identifiers,
/// so an empty set, an empty name or a duplicated name is rejected by the
/// compiler rather than at runtime. Use
/// [`declare_enum`](crate::core::declare_enum) when the member names are only
/// known at runtime.
///
/// # Example
///
/// ```
/// use tilelock::enumeration;
/// use tilelock::core::Enumeration;
///
/// enumeration! {
///     pub enum Door {
///         Open,
///         Closed,
///     }
/// }
///
/// assert_eq!(Door::Closed.name(), "Closed");
/// ```
///
/// [`Enumeration`]: crate::core::Enumeration
/// [`Label`]: crate::core::Label
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),+
        }

        impl $crate::core::Label for $name {
            fn label(&self) -> &str {
                $crate::core::Enumeration::name(self)
            }
        }

        impl $crate::core::Enumeration for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant)),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::Enumeration::name(self))
            }
        }
    };
}
