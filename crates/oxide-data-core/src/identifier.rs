//! Identifier quoting and letter casing.
//!
//! Databases disagree on how unquoted identifiers are folded (`PERSON` on
//! H2, `person` on Postgres) and on the quote characters they accept. An
//! [`IdentifierProcessing`] captures both rules for one dialect.

use serde::{Deserialize, Serialize};

/// Quote characters wrapped around an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quoting {
    prefix: &'static str,
    suffix: &'static str,
}

impl Quoting {
    /// ANSI double quotes.
    pub const ANSI: Self = Self::symmetric("\"");

    /// MySQL-style backticks.
    pub const BACKTICK: Self = Self::symmetric("`");

    /// SQL Server style square brackets.
    pub const BRACKETS: Self = Self::new("[", "]");

    /// No quoting at all.
    pub const NONE: Self = Self::symmetric("");

    /// Creates quoting with distinct prefix and suffix.
    #[must_use]
    pub const fn new(prefix: &'static str, suffix: &'static str) -> Self {
        Self { prefix, suffix }
    }

    /// Creates quoting with the same string on both sides.
    #[must_use]
    pub const fn symmetric(quote: &'static str) -> Self {
        Self::new(quote, quote)
    }

    /// Maps a driver-reported quote string onto a known quoting.
    ///
    /// Drivers report a single space when quoting is not supported.
    #[must_use]
    pub fn from_quote_string(quote: &str) -> Self {
        match quote.trim() {
            "\"" => Self::ANSI,
            "`" => Self::BACKTICK,
            "[" | "[]" => Self::BRACKETS,
            _ => Self::NONE,
        }
    }

    /// Wraps `identifier` in the quote characters, doubling any embedded
    /// suffix so the identifier cannot terminate the quotes early.
    #[must_use]
    pub fn apply(&self, identifier: &str) -> String {
        if self.suffix.is_empty() {
            return identifier.to_string();
        }
        let doubled = format!("{}{}", self.suffix, self.suffix);
        format!(
            "{}{}{}",
            self.prefix,
            identifier.replace(self.suffix, &doubled),
            self.suffix
        )
    }

    /// Returns the opening quote.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }
}

/// How a database folds the case of identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetterCasing {
    /// Identifiers are stored upper case (ANSI, H2, Oracle, DB2).
    UpperCase,
    /// Identifiers are stored lower case (Postgres, MySQL).
    LowerCase,
    /// Identifiers are stored as written.
    AsIs,
}

impl LetterCasing {
    /// Applies the casing rule.
    #[must_use]
    pub fn apply(self, identifier: &str) -> String {
        match self {
            Self::UpperCase => identifier.to_uppercase(),
            Self::LowerCase => identifier.to_lowercase(),
            Self::AsIs => identifier.to_string(),
        }
    }
}

/// Quoting and casing rules of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierProcessing {
    quoting: Quoting,
    casing: LetterCasing,
}

impl IdentifierProcessing {
    /// ANSI quoting with upper case folding.
    pub const ANSI: Self = Self::new(Quoting::ANSI, LetterCasing::UpperCase);

    /// Creates identifier processing from its two rules.
    #[must_use]
    pub const fn new(quoting: Quoting, casing: LetterCasing) -> Self {
        Self { quoting, casing }
    }

    /// Returns the quoting rule.
    #[must_use]
    pub const fn quoting(&self) -> Quoting {
        self.quoting
    }

    /// Returns the letter casing rule.
    #[must_use]
    pub const fn casing(&self) -> LetterCasing {
        self.casing
    }

    /// Quotes an identifier without changing its case.
    #[must_use]
    pub fn quote(&self, identifier: &str) -> String {
        self.quoting.apply(identifier)
    }

    /// Folds the identifier to the dialect's storage case.
    #[must_use]
    pub fn standardize_letter_case(&self, identifier: &str) -> String {
        self.casing.apply(identifier)
    }

    /// Renders an identifier for SQL text.
    ///
    /// Quoted identifiers are case-folded first so that a quoted name
    /// matches the unquoted DDL that created it.
    #[must_use]
    pub fn render(&self, identifier: &str, quoted: bool) -> String {
        if quoted {
            self.quote(&self.standardize_letter_case(identifier))
        } else {
            identifier.to_string()
        }
    }
}
