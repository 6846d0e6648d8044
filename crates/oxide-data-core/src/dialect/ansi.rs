//! ANSI SQL:2008 dialect.
//!
//! Also the base of the Oracle dialect and the fallback for configuration
//! that names no vendor.

use super::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    LockMode, LockPosition, NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;

pub(super) const LIMIT_CLAUSE: LimitClause =
    LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy);

pub(super) const LOCK_CLAUSE: LockClause = LockClause::new(lock, LockPosition::AfterOrderBy);

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::Ansi,
    identifier_processing: IdentifierProcessing::ANSI,
    limit_clause: LIMIT_CLAUSE,
    lock_clause: LOCK_CLAUSE,
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT,
    simple_types: &[],
    like_escaper: LikeEscaper::EXPLICIT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

pub(super) fn limit(limit: u64) -> String {
    format!("FETCH FIRST {limit} ROWS ONLY")
}

pub(super) fn offset(offset: u64) -> String {
    format!("OFFSET {offset} ROWS")
}

pub(super) fn limit_offset(limit: u64, offset: u64) -> String {
    format!("OFFSET {offset} ROWS FETCH FIRST {limit} ROWS ONLY")
}

// ANSI has no shared row lock; both modes lock for update.
pub(super) fn lock(_: LockMode, _: &str) -> String {
    String::from("FOR UPDATE")
}
