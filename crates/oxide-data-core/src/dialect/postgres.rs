//! PostgreSQL dialect.

use super::{
    ArrayColumns, Dialect, DialectKind, IdGeneration, LimitClause, LimitPosition, LockClause,
    LockMode, LockPosition, NullPrecedence,
};
use crate::bind::BindMarkers;
use crate::escape::LikeEscaper;
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};
use crate::types::{PropertyType, VendorType};

pub(super) const DIALECT: Dialect = Dialect {
    kind: DialectKind::Postgres,
    identifier_processing: IdentifierProcessing::new(Quoting::ANSI, LetterCasing::LowerCase),
    limit_clause: LimitClause::new(limit, offset, limit_offset, LimitPosition::AfterOrderBy),
    lock_clause: LockClause::new(lock, LockPosition::AfterOrderBy),
    array_columns: ArrayColumns::supported(element_type),
    id_generation: IdGeneration::DEFAULT
        .requiring_key_column_names()
        .with_sequences(next_value),
    simple_types: &[
        VendorType::Uuid,
        VendorType::Json,
        VendorType::Inet,
        VendorType::Interval,
        VendorType::Xml,
    ],
    like_escaper: LikeEscaper::DEFAULT,
    bind_markers: BindMarkers::DOLLAR,
    null_precedence: NullPrecedence::SqlStandard,
};

fn limit(limit: u64) -> String {
    format!("LIMIT {limit}")
}

fn offset(offset: u64) -> String {
    format!("OFFSET {offset}")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    format!("LIMIT {limit} OFFSET {offset}")
}

fn lock(mode: LockMode, table: &str) -> String {
    match mode {
        LockMode::PessimisticRead => format!("FOR SHARE OF {table}"),
        LockMode::PessimisticWrite => format!("FOR UPDATE OF {table}"),
    }
}

fn next_value(sequence: &str) -> String {
    format!("SELECT nextval('{sequence}')")
}

fn element_type(element: &PropertyType) -> Option<&'static str> {
    match element {
        PropertyType::Bool => Some("boolean"),
        // No single byte integer.
        PropertyType::Int8 | PropertyType::Int16 | PropertyType::UInt8 => Some("smallint"),
        PropertyType::Int32 | PropertyType::UInt16 => Some("integer"),
        PropertyType::Int64 | PropertyType::UInt32 => Some("bigint"),
        PropertyType::UInt64 | PropertyType::Decimal => Some("numeric"),
        PropertyType::Float32 => Some("real"),
        PropertyType::Float64 => Some("double precision"),
        PropertyType::Text => Some("text"),
        PropertyType::Char => Some("bpchar"),
        PropertyType::Bytes => Some("bytea"),
        PropertyType::Date => Some("date"),
        PropertyType::Time => Some("time"),
        PropertyType::Timestamp => Some("timestamp"),
        PropertyType::TimestampTz => Some("timestamptz"),
        PropertyType::Vendor(VendorType::Uuid) => Some("uuid"),
        PropertyType::Vendor(VendorType::Json) => Some("jsonb"),
        PropertyType::Vendor(VendorType::Inet) => Some("inet"),
        PropertyType::Vendor(VendorType::Interval) => Some("interval"),
        PropertyType::Vendor(VendorType::Xml) => Some("xml"),
        PropertyType::Array(_) | PropertyType::Other(_) => None,
    }
}
