//! Native array column support.

use std::fmt;

use crate::types::PropertyType;

/// Array strategy of a dialect.
#[derive(Clone, Copy)]
pub struct ArrayColumns {
    element_type: Option<fn(&PropertyType) -> Option<&'static str>>,
}

impl ArrayColumns {
    /// The dialect has no array columns.
    pub const UNSUPPORTED: Self = Self { element_type: None };

    /// The dialect stores arrays; `element_type` maps a logical element
    /// type to the SQL type name of the array elements.
    #[must_use]
    pub const fn supported(element_type: fn(&PropertyType) -> Option<&'static str>) -> Self {
        Self {
            element_type: Some(element_type),
        }
    }

    /// Returns whether array columns are available.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        self.element_type.is_some()
    }

    /// Maps a logical element type onto the dialect's element type.
    ///
    /// Returns `None` when arrays are unsupported, when the element is
    /// itself an array, or when the vendor has no array of that type.
    #[must_use]
    pub fn resolve_element_type(&self, element: &PropertyType) -> Option<&'static str> {
        if element.is_array() {
            return None;
        }
        self.element_type.and_then(|resolve| resolve(element))
    }
}

impl fmt::Debug for ArrayColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayColumns")
            .field("supported", &self.is_supported())
            .finish()
    }
}
