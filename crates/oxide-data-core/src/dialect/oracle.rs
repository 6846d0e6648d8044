//! Oracle dialect.

use super::{ansi, ArrayColumns, Dialect, DialectKind, IdGeneration, NullPrecedence};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;
use crate::types::VendorType;

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::Oracle,
    identifier_processing: IdentifierProcessing::ANSI,
    limit_clause: ansi::LIMIT_CLAUSE,
    lock_clause: ansi::LOCK_CLAUSE,
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT
        .requiring_key_column_names()
        .with_sequences(next_value),
    simple_types: &[VendorType::Interval, VendorType::Xml],
    like_escaper: LikeEscaper::EXPLICIT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

fn next_value(sequence: &str) -> String {
    format!("SELECT {sequence}.nextval FROM DUAL")
}
