//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use caspian_core::define_id;
/// define_id!(ProductId);
/// define_id!(VariationId);
///
/// let product_id = ProductId::new(1);
/// let variation_id = VariationId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = variation_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
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
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(VariationId);
define_id!(CategoryId);

/// Identifier of an attribute facet (a group of mutually exclusive choices,
/// e.g. Color or Size).
///
/// The upstream API is inconsistent about this field: some payloads carry it
/// as a JSON number, others as a numeric string. Deserialization accepts
/// both; serialization always emits a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AttributeTypeId(i64);

impl AttributeTypeId {
    /// Create a new facet ID from an i64 value.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the underlying i64 value.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for AttributeTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for AttributeTypeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<AttributeTypeId> for i64 {
    fn from(id: AttributeTypeId) -> Self {
        id.0
    }
}

impl<'de> Deserialize<'de> for AttributeTypeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TypeIdVisitor;

        impl serde::de::Visitor<'_> for TypeIdVisitor {
            type Value = AttributeTypeId;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("an integer or a numeric string")
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AttributeTypeId(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(v).map(AttributeTypeId).map_err(E::custom)
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse::<i64>().map(AttributeTypeId).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(TypeIdVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ProductId::new(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(ProductId::from(42), id);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id: VariationId = serde_json::from_str("7").unwrap();
        assert_eq!(id, VariationId::new(7));
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_attribute_type_id_from_number() {
        let id: AttributeTypeId = serde_json::from_str("2").unwrap();
        assert_eq!(id, AttributeTypeId::new(2));
    }

    #[test]
    fn test_attribute_type_id_from_string() {
        let id: AttributeTypeId = serde_json::from_str("\"2\"").unwrap();
        assert_eq!(id, AttributeTypeId::new(2));
    }

    #[test]
    fn test_attribute_type_id_rejects_garbage() {
        let result: Result<AttributeTypeId, _> = serde_json::from_str("\"colour\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_attribute_type_id_serializes_as_number() {
        let id = AttributeTypeId::new(2);
        assert_eq!(serde_json::to_string(&id).unwrap(), "2");
    }
}
