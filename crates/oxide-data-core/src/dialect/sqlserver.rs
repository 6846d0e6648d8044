//! Microsoft SQL Server dialect.

use super::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    LockMode, LockPosition, NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};
use crate::types::VendorType;

/// `FETCH NEXT 0 ROWS` is rejected by the server; offsetting past any
/// possible row selects nothing instead.
const PAST_THE_END: u64 = 9_223_372_036_854_775_807;

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::SqlServer,
    identifier_processing: IdentifierProcessing::new(Quoting::ANSI, LetterCasing::AsIs),
    limit_clause: LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy)
        .with_synthetic_order_by("ORDER BY (SELECT 1)"),
    lock_clause: LockClause::new(lock, LockPosition::AfterFromTable),
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT
        .without_batch_support()
        .with_sequences(next_value),
    simple_types: &[VendorType::Uuid, VendorType::Xml],
    like_escaper: LikeEscaper::SQL_SERVER,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::Unsupported,
};

fn limit(limit: u64) -> String {
    limit_offset(limit, 0)
}

fn offset(offset: u64) -> String {
    format!("OFFSET {offset} ROWS")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    if limit == 0 {
        format!("OFFSET {PAST_THE_END} ROWS")
    } else {
        format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
    }
}

fn lock(mode: LockMode, _: &str) -> String {
    match mode {
        LockMode::PessimisticRead => String::from("WITH (HOLDLOCK, ROWLOCK)"),
        LockMode::PessimisticWrite => String::from("WITH (UPDLOCK, ROWLOCK)"),
    }
}

fn next_value(sequence: &str) -> String {
    format!("SELECT NEXT VALUE FOR {sequence}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clause() {
        let clause = DIALECT.limit_clause();
        assert_eq!(clause.limit(10), "OFFSET 0 ROWS FETCH NEXT 10 ROWS ONLY");
        assert_eq!(clause.offset(5), "OFFSET 5 ROWS");
        assert_eq!(
            clause.limit_offset(10, 5),
            "OFFSET 5 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(clause.synthetic_order_by(), Some("ORDER BY (SELECT 1)"));
    }

    #[test]
    fn test_zero_limit() {
        assert_eq!(
            DIALECT.limit_clause().limit(0),
            "OFFSET 9223372036854775807 ROWS"
        );
    }

    #[test]
    fn test_table_hint_lock() {
        let clause = DIALECT.lock_clause();
        assert_eq!(
            clause.lock(LockMode::PessimisticWrite, "\"Person\""),
            "WITH (UPDLOCK, ROWLOCK)"
        );
        assert_eq!(clause.position(), LockPosition::AfterFromTable);
    }

    #[test]
    fn test_no_batch_key_retrieval() {
        assert!(!DIALECT.id_generation().supported_for_batch_operations());
        assert_eq!(
            DIALECT.identifier_processing().render("Person", true),
            "\"Person\""
        );
    }
}
