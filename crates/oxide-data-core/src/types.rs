//! Logical property types.
//!
//! Aggregate properties carry a [`PropertyType`]. Dialects use it to decide
//! whether a property maps to a single column and which array element type
//! backs an array column.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical type of a mapped property.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    #[serde(rename = "uint8")]
    UInt8,
    #[serde(rename = "uint16")]
    UInt16,
    #[serde(rename = "uint32")]
    UInt32,
    #[serde(rename = "uint64")]
    UInt64,
    Float32,
    Float64,
    Decimal,
    Text,
    Char,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimestampTz,
    /// A type only some vendors store in a single column.
    Vendor(VendorType),
    /// An array of another property type.
    Array(Box<PropertyType>),
    /// A user-defined type the mapping layer knows nothing about.
    Other(String),
}

/// Vendor-specific column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorType {
    Uuid,
    Json,
    Inet,
    Interval,
    Xml,
}

impl PropertyType {
    /// Returns whether this is a character type (LIKE-able).
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text | Self::Char)
    }

    /// Returns whether this is a boolean.
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Returns whether this is an array type.
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns whether every dialect stores this type in a single column.
    ///
    /// Vendor types depend on the dialect and user types never qualify.
    #[must_use]
    pub fn is_standard_store_type(&self) -> bool {
        match self {
            Self::Vendor(_) | Self::Other(_) => false,
            Self::Array(element) => element.is_standard_store_type(),
            _ => true,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor(v) => write!(f, "{v:?}"),
            Self::Array(element) => write!(f, "Array<{element}>"),
            Self::Other(name) => write!(f, "{name}"),
            other => write!(f, "{other:?}"),
        }
    }
}
