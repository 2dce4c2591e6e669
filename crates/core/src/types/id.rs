//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.
//!
//! The marketplace API is loosely typed: the same ID may arrive as a JSON
//! number in one response and as a numeric string in another. Numeric IDs
//! accept both on the way in and always serialize as numbers. Opaque IDs
//! ([`AddressId`], [`OrderId`]) keep whatever text the API sent.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe numeric ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize` as a plain number
/// - `Deserialize` from a number or a numeric string
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Display`, `FromStr`
/// - Conversion methods: `new()`, `as_i64()`
///
/// # Example
///
/// ```rust
/// # use facet_core::define_id;
/// define_id!(UserId);
/// define_id!(VendorId);
///
/// let user_id = UserId::new(1);
/// let vendor_id = VendorId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: UserId = vendor_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ::serde::Serialize)]
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

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
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

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::LooseId::deserialize(deserializer)?
                    .into_i64()
                    .map(Self)
                    .map_err(::serde::de::Error::custom)
            }
        }
    };
}

/// Wire representation of an ID that may be sent as a number or a string.
#[doc(hidden)]
#[derive(Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    /// Normalize to an `i64`.
    ///
    /// # Errors
    ///
    /// Returns a message if a string ID is not a valid integer.
    pub fn into_i64(self) -> Result<i64, String> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid numeric id: {s:?}")),
        }
    }

    /// Normalize to the ID's textual form.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::Empty`] for a blank string.
    pub fn into_text(self) -> Result<String, IdError> {
        match self {
            Self::Number(n) => Ok(n.to_string()),
            Self::Text(s) => non_blank(&s),
        }
    }
}

/// Errors that can occur when parsing an opaque ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("id cannot be empty")]
    Empty,
}

fn non_blank(s: &str) -> Result<String, IdError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        Err(IdError::Empty)
    } else {
        Ok(trimmed.to_owned())
    }
}

// Define standard entity IDs
define_id!(ProductId);

/// Identifier of a saved shipping address.
///
/// Opaque to the client. Older endpoints send integers (`12`), newer ones
/// send document keys (`"65f1c0ab2e"`); both are kept in textual form and
/// used verbatim in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AddressId(String);

impl AddressId {
    /// Create an address ID from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for AddressId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl FromStr for AddressId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        non_blank(s).map(Self)
    }
}

impl<'de> Deserialize<'de> for AddressId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        LooseId::deserialize(deserializer)?
            .into_text()
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Identifier of a placed order.
///
/// Order identifiers are opaque: the API returns them as strings
/// (`"ORD-2024-0042"`) or numbers depending on the endpoint version, so they
/// are normalized to their textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Create an order ID from its textual form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
