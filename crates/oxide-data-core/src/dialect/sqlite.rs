//! SQLite dialect.

use super::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::Sqlite,
    identifier_processing: IdentifierProcessing::new(Quoting::ANSI, LetterCasing::AsIs),
    limit_clause: LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy),
    // Locking is per database file.
    lock_clause: LockClause::NONE,
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT,
    simple_types: &[],
    like_escaper: LikeEscaper::EXPLICIT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

fn limit(limit: u64) -> String {
    format!("LIMIT {limit}")
}

fn offset(offset: u64) -> String {
    format!("LIMIT -1 OFFSET {offset}")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    format!("LIMIT {limit} OFFSET {offset}")
}
