//! Newtype IDs for type-safe entity references.
//!
//! Every table in the store uses a `SERIAL` primary key, so all ids wrap an
//! `i32`. Distinct types keep a `VariantId` from being passed where a
//! `ProductId` is expected.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
/// - a transparent `sqlx::Type` (with the `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use store_manager_core::define_id;
/// define_id!(
///     /// Identity of a shelf.
///     ShelfId
/// );
///
/// let shelf = ShelfId::new(7);
/// assert_eq!(shelf.as_i32(), 7);
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identity of a catalog product.
    ProductId
);
define_id!(
    /// Identity of a size/color variant row. Reassigned on every product replace.
    VariantId
);
define_id!(
    /// Identity of a recorded sale.
    SaleId
);
define_id!(
    /// Identity of a credential record.
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(ProductId::new(42).to_string(), "42");
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&VariantId::new(9)).unwrap_or_default();
        assert_eq!(json, "9");

        let parsed: Option<SaleId> = serde_json::from_str("13").ok();
        assert_eq!(parsed, Some(SaleId::new(13)));
    }

    #[test]
    fn test_ordering_follows_inner_value() {
        let mut ids = vec![ProductId::new(3), ProductId::new(1), ProductId::new(2)];
        ids.sort();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2), ProductId::new(3)]);
    }

    #[test]
    fn test_i32_conversions() {
        let id: UserId = 5.into();
        let raw: i32 = id.into();
        assert_eq!(raw, 5);
    }
}
