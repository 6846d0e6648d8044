//! Clause fragments of every dialect.

use oxide_data_core::{
    Dialect, DialectKind, LimitPosition, LockMode, LockPosition, NullPrecedence, PropertyType,
    VendorType,
};

fn dialect(kind: DialectKind) -> Dialect {
    Dialect::of(kind)
}

#[test]
fn limit_offset_per_dialect() {
    let expected = [
        (DialectKind::Ansi, "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"),
        (DialectKind::H2, "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"),
        (DialectKind::HsqlDb, "OFFSET 20 LIMIT 10"),
        (DialectKind::Postgres, "LIMIT 10 OFFSET 20"),
        (DialectKind::MySql, "LIMIT 20, 10"),
        (DialectKind::MariaDb, "LIMIT 20, 10"),
        (
            DialectKind::SqlServer,
            "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
        (DialectKind::Oracle, "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"),
        (DialectKind::Db2, "OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY"),
        (DialectKind::Sqlite, "LIMIT 10 OFFSET 20"),
    ];
    for (kind, sql) in expected {
        assert_eq!(dialect(kind).limit_clause().limit_offset(10, 20), sql, "{kind}");
    }
}

#[test]
fn every_dialect_limits_after_order_by() {
    for kind in DialectKind::ALL {
        assert_eq!(
            dialect(kind).limit_clause().position(),
            LimitPosition::AfterOrderBy,
            "{kind}"
        );
    }
}

#[test]
fn zero_limit_never_means_unlimited() {
    for kind in DialectKind::ALL {
        let fragment = dialect(kind).limit_clause().limit(0);
        assert!(!fragment.is_empty(), "{kind}");
        let skips_everything = fragment.contains(" 0 ") || fragment.ends_with(" 0");
        let past_the_end = fragment.starts_with("OFFSET ") && !fragment.contains("FETCH");
        assert!(skips_everything || past_the_end, "{kind}: {fragment}");
    }
}

#[test]
fn limit_values_are_literals() {
    for kind in DialectKind::ALL {
        let d = dialect(kind);
        let clause = d.limit_clause();
        for fragment in [clause.limit(7), clause.offset(7), clause.limit_offset(7, 9)] {
            assert!(!fragment.contains('?'), "{kind}: {fragment}");
            assert!(!fragment.contains('$'), "{kind}: {fragment}");
        }
    }
}

#[test]
fn lock_fragments() {
    let cases = [
        (DialectKind::H2, "FOR UPDATE", "FOR UPDATE"),
        (
            DialectKind::Postgres,
            "FOR SHARE OF t",
            "FOR UPDATE OF t",
        ),
        (DialectKind::MySql, "LOCK IN SHARE MODE", "FOR UPDATE"),
        (
            DialectKind::SqlServer,
            "WITH (HOLDLOCK, ROWLOCK)",
            "WITH (UPDLOCK, ROWLOCK)",
        ),
        (DialectKind::Sqlite, "", ""),
    ];
    for (kind, read, write) in cases {
        let d = dialect(kind);
        let clause = d.lock_clause();
        assert_eq!(clause.lock(LockMode::PessimisticRead, "t"), read, "{kind}");
        assert_eq!(clause.lock(LockMode::PessimisticWrite, "t"), write, "{kind}");
    }
    assert_eq!(
        dialect(DialectKind::SqlServer).lock_clause().position(),
        LockPosition::AfterFromTable
    );
}

#[test]
fn array_support() {
    let supported = [DialectKind::H2, DialectKind::HsqlDb, DialectKind::Postgres];
    for kind in DialectKind::ALL {
        assert_eq!(
            dialect(kind).array_support().is_supported(),
            supported.contains(&kind),
            "{kind}"
        );
    }
}

#[test]
fn simple_vendor_types() {
    let json = PropertyType::Vendor(VendorType::Json);
    assert!(dialect(DialectKind::MySql).is_simple_type(&json));
    assert!(dialect(DialectKind::Postgres).is_simple_type(&json));
    assert!(!dialect(DialectKind::Oracle).is_simple_type(&json));
    assert!(!dialect(DialectKind::Sqlite).is_simple_type(&json));
}

#[test]
fn null_precedence() {
    for kind in [DialectKind::MySql, DialectKind::MariaDb, DialectKind::SqlServer] {
        assert_eq!(dialect(kind).null_precedence(), NullPrecedence::Unsupported);
    }
    assert_eq!(
        dialect(DialectKind::Postgres).null_precedence(),
        NullPrecedence::SqlStandard
    );
}

#[test]
fn sequence_support() {
    let with_sequences = [
        DialectKind::H2,
        DialectKind::HsqlDb,
        DialectKind::Postgres,
        DialectKind::MariaDb,
        DialectKind::SqlServer,
        DialectKind::Oracle,
        DialectKind::Db2,
    ];
    for kind in DialectKind::ALL {
        assert_eq!(
            dialect(kind).create_sequence_query("seq").is_ok(),
            with_sequences.contains(&kind),
            "{kind}"
        );
    }
}
