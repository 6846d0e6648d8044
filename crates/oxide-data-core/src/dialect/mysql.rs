//! MySQL dialect.
//!
//! Identifier quoting and casing are defaults only. The resolver replaces
//! them with what the server reports, since `lower_case_table_names` varies
//! between installations.

use super::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    LockMode, LockPosition, NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};
use crate::types::VendorType;

/// MySQL has no OFFSET without LIMIT; the documented workaround is the
/// largest unsigned 64 bit row count.
const ALL_ROWS: u64 = u64::MAX;

pub(super) const IDENTIFIER_PROCESSING: IdentifierProcessing =
    IdentifierProcessing::new(Quoting::BACKTICK, LetterCasing::LowerCase);

pub(super) const LIMIT_CLAUSE: LimitClause =
    LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy);

pub(super) const LOCK_CLAUSE: LockClause = LockClause::new(lock, LockPosition::AfterOrderBy);

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::MySql,
    identifier_processing: IDENTIFIER_PROCESSING,
    limit_clause: LIMIT_CLAUSE,
    lock_clause: LOCK_CLAUSE,
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT,
    simple_types: &[VendorType::Json],
    like_escaper: LikeEscaper::DEFAULT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::Unsupported,
};

fn limit(limit: u64) -> String {
    format!("LIMIT {limit}")
}

fn offset(offset: u64) -> String {
    format!("LIMIT {offset}, {ALL_ROWS}")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    format!("LIMIT {offset}, {limit}")
}

fn lock(mode: LockMode, _: &str) -> String {
    match mode {
        LockMode::PessimisticRead => String::from("LOCK IN SHARE MODE"),
        LockMode::PessimisticWrite => String::from("FOR UPDATE"),
    }
}
