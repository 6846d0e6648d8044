//! Bind parameter markers.

/// Placeholder style of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindMarkers {
    /// Every parameter is `?`; position is implied by order.
    Anonymous,
    /// Parameters are numbered, e.g. `$1`, `$2`.
    Indexed {
        /// Marker prefix.
        prefix: &'static str,
        /// Number of the first parameter.
        base: usize,
    },
}

impl BindMarkers {
    /// Postgres style `$1`, `$2`, ...
    pub const DOLLAR: Self = Self::Indexed {
        prefix: "$",
        base: 1,
    };

    /// Marker for the parameter at zero-based `index`.
    #[must_use]
    pub fn marker(&self, index: usize) -> String {
        match self {
            Self::Anonymous => String::from("?"),
            Self::Indexed { prefix, base } => format!("{prefix}{}", base + index),
        }
    }
}
