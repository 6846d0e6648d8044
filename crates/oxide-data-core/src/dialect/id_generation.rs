//! Identifier generation after inserts.

use std::fmt;

use crate::identifier::IdentifierProcessing;

/// How generated keys are retrieved on a dialect.
#[derive(Clone, Copy)]
pub struct IdGeneration {
    driver_requires_key_column_names: bool,
    supported_for_batch_operations: bool,
    sequence_query: Option<fn(&str) -> String>,
}

impl IdGeneration {
    /// Drivers return generated keys on their own; batches are fine; no
    /// sequences.
    pub const DEFAULT: Self = Self {
        driver_requires_key_column_names: false,
        supported_for_batch_operations: true,
        sequence_query: None,
    };

    /// The driver must be told which columns hold generated keys.
    #[must_use]
    pub const fn requiring_key_column_names(mut self) -> Self {
        self.driver_requires_key_column_names = true;
        self
    }

    /// Generated keys cannot be read back from batched inserts.
    #[must_use]
    pub const fn without_batch_support(mut self) -> Self {
        self.supported_for_batch_operations = false;
        self
    }

    /// Sequences are available through the given query template.
    #[must_use]
    pub const fn with_sequences(mut self, query: fn(&str) -> String) -> Self {
        self.sequence_query = Some(query);
        self
    }

    /// Returns whether insert statements must name the key columns.
    #[must_use]
    pub const fn driver_requires_key_column_names(&self) -> bool {
        self.driver_requires_key_column_names
    }

    /// Returns whether generated keys can be read from batch inserts.
    #[must_use]
    pub const fn supported_for_batch_operations(&self) -> bool {
        self.supported_for_batch_operations
    }

    /// Returns whether the dialect has sequences.
    #[must_use]
    pub const fn sequences_supported(&self) -> bool {
        self.sequence_query.is_some()
    }

    /// Column name handed to the driver for key retrieval.
    ///
    /// Drivers compare these names against the stored (case-folded) names,
    /// so they are folded but never quoted.
    #[must_use]
    pub fn key_column_name(&self, column: &str, processing: &IdentifierProcessing) -> String {
        processing.standardize_letter_case(column)
    }

    /// Query returning the next value of `sequence`, if supported.
    #[must_use]
    pub fn sequence_query(&self, sequence: &str) -> Option<String> {
        self.sequence_query.map(|query| query(sequence))
    }
}

impl fmt::Debug for IdGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGeneration")
            .field(
                "driver_requires_key_column_names",
                &self.driver_requires_key_column_names,
            )
            .field(
                "supported_for_batch_operations",
                &self.supported_for_batch_operations,
            )
            .field("sequences_supported", &self.sequences_supported())
            .finish()
    }
}
