//! IBM DB2 dialect.

use super::{
    ansi, ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition,
    LockClause, LockMode, LockPosition, NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;
use crate::types::VendorType;

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::Db2,
    identifier_processing: IdentifierProcessing::ANSI,
    limit_clause: LimitClause::new(
        ansi::limit,
        ansi::offset,
        ansi::limit_offset,
        LimitPosition::AfterOrderBy,
    ),
    lock_clause: LockClause::new(lock, LockPosition::AfterOrderBy),
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT.with_sequences(next_value),
    simple_types: &[VendorType::Xml],
    like_escaper: LikeEscaper::EXPLICIT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

fn lock(mode: LockMode, _: &str) -> String {
    match mode {
        LockMode::PessimisticRead => {
            String::from("FOR READ ONLY WITH RS USE AND KEEP SHARE LOCKS")
        }
        LockMode::PessimisticWrite => {
            String::from("FOR UPDATE WITH RS USE AND KEEP UPDATE LOCKS")
        }
    }
}

fn next_value(sequence: &str) -> String {
    format!("VALUES NEXT VALUE FOR {sequence}")
}
