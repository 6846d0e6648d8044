//! H2 dialect.

use super::{
    ansi, ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition,
    NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::IdentifierProcessing;
use crate::types::{PropertyType, VendorType};

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::H2,
    identifier_processing: IdentifierProcessing::ANSI,
    limit_clause: LimitClause::new(
        limit,
        offset,
        ansi::limit_offset,
        LimitPosition::AfterOrderBy,
    ),
    lock_clause: ansi::LOCK_CLAUSE,
    array_columns: ArrayColumns::supported(element_type),
    id_generation: IdGeneration::DEFAULT.with_sequences(next_value),
    simple_types: &[VendorType::Uuid, VendorType::Json, VendorType::Interval],
    like_escaper: LikeEscaper::DEFAULT,
    bind_markers: BindMarkers::Anonymous,
    null_precedence: NullPrecedence::SqlStandard,
};

fn limit(limit: u64) -> String {
    format!("LIMIT {limit}")
}

fn offset(offset: u64) -> String {
    format!("OFFSET {offset}")
}

fn next_value(sequence: &str) -> String {
    format!("SELECT NEXT VALUE FOR {sequence}")
}

/// H2 accepts arrays of any standard type; element types follow the DDL
/// names of the column types.
pub(super) fn element_type(element: &PropertyType) -> Option<&'static str> {
    match element {
        PropertyType::Bool => Some("BOOLEAN"),
        PropertyType::Int8 => Some("TINYINT"),
        PropertyType::Int16 | PropertyType::UInt8 => Some("SMALLINT"),
        PropertyType::Int32 | PropertyType::UInt16 => Some("INTEGER"),
        PropertyType::Int64 | PropertyType::UInt32 => Some("BIGINT"),
        PropertyType::UInt64 | PropertyType::Decimal => Some("NUMERIC"),
        PropertyType::Float32 => Some("REAL"),
        PropertyType::Float64 => Some("DOUBLE PRECISION"),
        PropertyType::Text => Some("VARCHAR"),
        PropertyType::Char => Some("CHAR"),
        PropertyType::Bytes => Some("VARBINARY"),
        PropertyType::Date => Some("DATE"),
        PropertyType::Time => Some("TIME"),
        PropertyType::Timestamp => Some("TIMESTAMP"),
        PropertyType::TimestampTz => Some("TIMESTAMP WITH TIME ZONE"),
        PropertyType::Vendor(VendorType::Uuid) => Some("UUID"),
        PropertyType::Vendor(VendorType::Interval) => Some("INTERVAL"),
        _ => None,
    }
}
