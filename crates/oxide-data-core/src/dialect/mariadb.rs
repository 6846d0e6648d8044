//! MariaDB dialect: MySQL plus sequences.

use super::{mysql, ArrayColumns, Dialect, DialectKind, IdGeneration, NullPrecedence};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::types::VendorType;

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::MariaDb,
    identifier_processing: mysql::IDENTIFIER_PROCESSING,
    limit_clause: mysql::LIMIT_CLAUSE,
    lock_clause: mysql::LOCK_CLAUSE,
    array_columns: ArrayColumns::UNSUPPORTED,
    id_generation: IdGeneration::DEFAULT.with_sequences(next_value),
    simple_types: &[VendorType::Json],
    like_escaper: LikeEscaper::DEFAULT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::Unsupported,
};

fn next_value(sequence: &str) -> String {
    format!("SELECT NEXTVAL({sequence})")
}
