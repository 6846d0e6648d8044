//! Escaping of LIKE patterns.

/// Escapes LIKE wildcards in user supplied values.
///
/// Derived queries wrap values with `%` themselves; a `%` or `_` typed by a
/// user must match literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeEscaper {
    escape: char,
    special: &'static [char],
    explicit_clause: bool,
}

impl LikeEscaper {
    /// Backslash escaping of `%` and `_`, relying on backslash being the
    /// dialect's default LIKE escape character.
    pub const DEFAULT: Self = Self {
        escape: '\\',
        special: &['%', '_'],
        explicit_clause: false,
    };

    /// Same as [`Self::DEFAULT`] but with an explicit `ESCAPE` clause, for
    /// dialects that have no default escape character.
    pub const EXPLICIT: Self = Self {
        escape: '\\',
        special: &['%', '_'],
        explicit_clause: true,
    };

    /// SQL Server also treats `[` as a pattern character.
    pub const SQL_SERVER: Self = Self {
        escape: '\\',
        special: &['%', '_', '['],
        explicit_clause: true,
    };

    /// Escapes wildcards and the escape character itself.
    #[must_use]
    pub fn escape(&self, value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            if c == self.escape || self.special.contains(&c) {
                escaped.push(self.escape);
            }
            escaped.push(c);
        }
        escaped
    }

    /// Suffix appended after the LIKE operand, if any.
    #[must_use]
    pub fn escape_clause(&self) -> Option<String> {
        self.explicit_clause
            .then(|| format!(" ESCAPE '{}'", self.escape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_wildcards() {
        assert_eq!(LikeEscaper::DEFAULT.escape("50%_off"), "50\\%\\_off");
        assert_eq!(LikeEscaper::DEFAULT.escape("a\\b"), "a\\\\b");
        assert_eq!(LikeEscaper::DEFAULT.escape("plain"), "plain");
    }

    #[test]
    fn test_sql_server_brackets() {
        assert_eq!(LikeEscaper::SQL_SERVER.escape("[x]"), "\\[x]");
        assert_eq!(LikeEscaper::DEFAULT.escape("[x]"), "[x]");
    }

    #[test]
    fn test_escape_clause() {
        assert_eq!(LikeEscaper::DEFAULT.escape_clause(), None);
        assert_eq!(
            LikeEscaper::EXPLICIT.escape_clause().as_deref(),
            Some(" ESCAPE '\\'")
        );
    }
}
