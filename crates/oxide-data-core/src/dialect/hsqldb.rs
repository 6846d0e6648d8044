//! HyperSQL dialect.

use super::{
    ansi, h2, ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition,
    NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;
use crate::types::VendorType;

/// HSQLDB treats `LIMIT 0` as "no limit". Skipping past the largest row
/// count it can address yields an empty result instead.
const PAST_THE_END: u64 = 2_147_483_647;

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::HsqlDb,
    identifier_processing: IdentifierProcessing::ANSI,
    limit_clause: LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy),
    lock_clause: ansi::LOCK_CLAUSE,
    array_columns: ArrayColumns::supported(h2::element_type),
    id_generation: IdGeneration::DEFAULT.with_sequences(next_value),
    simple_types: &[VendorType::Uuid, VendorType::Interval],
    like_escaper: LikeEscaper::EXPLICIT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

fn limit(limit: u64) -> String {
    if limit == 0 {
        format!("OFFSET {PAST_THE_END} LIMIT 1")
    } else {
        format!("LIMIT {limit}")
    }
}

fn offset(offset: u64) -> String {
    format!("OFFSET {offset}")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    if limit == 0 {
        self::limit(0)
    } else {
        format!("OFFSET {offset} LIMIT {limit}")
    }
}

fn next_value(sequence: &str) -> String {
    format!("CALL NEXT VALUE FOR {sequence}")
}
