mod common;

use common::{book, person, query, render};
use oxide_data_core::{
    DataConfig, Dialect, DialectError, DialectKind, LimitClause, LimitPosition, LockMode,
    PropertyType, SqlArray, SqlValue,
};
use oxide_data_repository::mapping::{EntityMetadata, PersistentProperty};
use oxide_data_repository::method::{Argument, QueryMethod, ReturnKind};
use oxide_data_repository::paging::{Limit, NullHandling, Order, Pageable, Sort};
use oxide_data_repository::{RepositoryError, RepositoryQuery, StatementRenderer};

fn find_by_title_paged() -> QueryMethod {
    QueryMethod::new("findByTitle", ReturnKind::Many)
        .param("title")
        .pageable()
}

#[test]
fn paged_selects_per_dialect() {
    let book = book();
    let method = find_by_title_paged();
    let args = [Argument::value("Dune"), Argument::from(Pageable::of(2, 10))];

    let expected = [
        (
            DialectKind::Postgres,
            "SELECT \"book\".\"id\", \"book\".\"title\" FROM \"book\" WHERE \"book\".\"title\" = $1 LIMIT 10 OFFSET 20",
        ),
        (
            DialectKind::H2,
            "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY",
        ),
        (
            DialectKind::HsqlDb,
            "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? OFFSET 20 LIMIT 10",
        ),
        (
            DialectKind::MySql,
            "SELECT `book`.`id`, `book`.`title` FROM `book` WHERE `book`.`title` = ? LIMIT 20, 10",
        ),
        (
            DialectKind::MariaDb,
            "SELECT `book`.`id`, `book`.`title` FROM `book` WHERE `book`.`title` = ? LIMIT 20, 10",
        ),
        (
            DialectKind::SqlServer,
            "SELECT \"book\".\"id\", \"book\".\"title\" FROM \"book\" WHERE \"book\".\"title\" = ? ORDER BY (SELECT 1) OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY",
        ),
        (
            DialectKind::Oracle,
            "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY",
        ),
        (
            DialectKind::Db2,
            "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY",
        ),
        (
            DialectKind::Ansi,
            "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? OFFSET 20 ROWS FETCH FIRST 10 ROWS ONLY",
        ),
        (
            DialectKind::Sqlite,
            "SELECT \"book\".\"id\", \"book\".\"title\" FROM \"book\" WHERE \"book\".\"title\" = ? LIMIT 10 OFFSET 20",
        ),
    ];
    for (kind, sql) in expected {
        let statement = render(&book, kind, &method, &args);
        assert_eq!(statement.sql, sql, "{kind}");
        assert_eq!(
            statement.parameters,
            vec![SqlValue::Text(String::from("Dune"))],
            "{kind}"
        );
    }
}

#[test]
fn sorted_sql_server_pages_skip_the_synthetic_order() {
    let book = book();
    let method = find_by_title_paged();
    let args = [
        Argument::value("Dune"),
        Argument::from(Pageable::of(0, 5).with_sort(Sort::by(&["title"]))),
    ];
    let statement = render(&book, DialectKind::SqlServer, &method, &args);
    assert!(
        statement
            .sql
            .ends_with("ORDER BY \"book\".\"title\" ASC OFFSET 0 ROWS FETCH NEXT 5 ROWS ONLY"),
        "{}",
        statement.sql
    );
    assert!(!statement.sql.contains("(SELECT 1)"));
}

#[test]
fn zero_limits_select_nothing() {
    let book = book();
    let method = QueryMethod::new("findByTitle", ReturnKind::Many)
        .param("title")
        .limit();
    let args = [Argument::value("Dune"), Argument::from(Limit::of(0))];

    let hsqldb = render(&book, DialectKind::HsqlDb, &method, &args);
    assert!(hsqldb.sql.ends_with("OFFSET 2147483647 LIMIT 1"), "{}", hsqldb.sql);

    let sqlserver = render(&book, DialectKind::SqlServer, &method, &args);
    assert!(
        sqlserver
            .sql
            .ends_with("ORDER BY (SELECT 1) OFFSET 9223372036854775807 ROWS"),
        "{}",
        sqlserver.sql
    );

    let postgres = render(&book, DialectKind::Postgres, &method, &args);
    assert!(postgres.sql.ends_with("LIMIT 0"));
}

#[test]
fn first_caps_dynamic_limits() {
    let book = book();
    let method = QueryMethod::new("findFirst3ByTitle", ReturnKind::Many)
        .param("title")
        .limit();
    let statement = render(
        &book,
        DialectKind::Postgres,
        &method,
        &[Argument::value("Dune"), Argument::from(Limit::of(10))],
    );
    assert!(statement.sql.ends_with("LIMIT 3"), "{}", statement.sql);

    let statement = render(
        &book,
        DialectKind::Postgres,
        &method,
        &[Argument::value("Dune"), Argument::from(Limit::unlimited())],
    );
    assert!(statement.sql.ends_with("LIMIT 3"), "{}", statement.sql);
}

#[test]
fn single_results_probe_for_a_second_row() {
    let book = book();
    let method = QueryMethod::new("findByTitle", ReturnKind::One).param("title");
    let statement = render(&book, DialectKind::Sqlite, &method, &[Argument::value("Dune")]);
    assert!(statement.sql.ends_with("LIMIT 2"), "{}", statement.sql);

    let method = QueryMethod::new("findFirstByTitle", ReturnKind::One).param("title");
    let statement = render(&book, DialectKind::Sqlite, &method, &[Argument::value("Dune")]);
    assert!(statement.sql.ends_with("LIMIT 1"), "{}", statement.sql);
}

#[test]
fn lock_placement() {
    let book = book();
    let write = QueryMethod::new("findByTitle", ReturnKind::Many)
        .param("title")
        .with_lock(LockMode::PessimisticWrite);
    let read = QueryMethod::new("findByTitle", ReturnKind::Many)
        .param("title")
        .with_lock(LockMode::PessimisticRead);
    let args = [Argument::value("Dune")];

    assert!(render(&book, DialectKind::Postgres, &write, &args)
        .sql
        .ends_with("WHERE \"book\".\"title\" = $1 FOR UPDATE OF \"book\""));
    assert!(render(&book, DialectKind::Postgres, &read, &args)
        .sql
        .ends_with("FOR SHARE OF \"book\""));
    assert!(render(&book, DialectKind::SqlServer, &write, &args)
        .sql
        .ends_with("FROM \"book\" WITH (UPDLOCK, ROWLOCK) WHERE \"book\".\"title\" = ?"));
    assert!(render(&book, DialectKind::SqlServer, &read, &args)
        .sql
        .contains("WITH (HOLDLOCK, ROWLOCK)"));
    assert!(render(&book, DialectKind::MySql, &write, &args)
        .sql
        .ends_with("FOR UPDATE"));
    assert!(render(&book, DialectKind::MySql, &read, &args)
        .sql
        .ends_with("LOCK IN SHARE MODE"));

    let sqlite = render(&book, DialectKind::Sqlite, &write, &args);
    assert!(sqlite.sql.ends_with("WHERE \"book\".\"title\" = ?"), "{}", sqlite.sql);
}

#[test]
fn locks_follow_the_limit() {
    let book = book();
    let method = find_by_title_paged().with_lock(LockMode::PessimisticWrite);
    let statement = render(
        &book,
        DialectKind::Postgres,
        &method,
        &[Argument::value("Dune"), Argument::from(Pageable::of(0, 1))],
    );
    assert!(
        statement.sql.ends_with("LIMIT 1 OFFSET 0 FOR UPDATE OF \"book\""),
        "{}",
        statement.sql
    );
}

#[test]
fn null_hints_are_dropped_without_vendor_syntax() {
    let person = person();
    let method = QueryMethod::new("findByActiveTrue", ReturnKind::Many).sort();
    let sort: Sort = [Order::asc("age").with_null_handling(NullHandling::NullsLast)]
        .into_iter()
        .collect();
    let args = [Argument::from(sort)];

    let postgres = render(&person, DialectKind::Postgres, &method, &args);
    assert!(
        postgres
            .sql
            .ends_with("WHERE \"person\".\"active\" = $1 ORDER BY \"person\".\"age\" ASC NULLS LAST"),
        "{}",
        postgres.sql
    );
    let mysql = render(&person, DialectKind::MySql, &method, &args);
    assert!(
        mysql.sql.ends_with("ORDER BY `person`.`age` ASC"),
        "{}",
        mysql.sql
    );
}

#[test]
fn static_sort_precedes_dynamic_sort() {
    let person = person();
    let method = QueryMethod::new("findByActiveTrueOrderByLastNameDesc", ReturnKind::Many).sort();
    let statement = render(
        &person,
        DialectKind::Sqlite,
        &method,
        &[Argument::from(Sort::by(&["firstName"]))],
    );
    assert!(
        statement.sql.ends_with(
            "ORDER BY \"person\".\"last_name\" DESC, \"person\".\"first_name\" ASC"
        ),
        "{}",
        statement.sql
    );
}

#[test]
fn dynamic_sort_on_unknown_property_fails() {
    let person = person();
    let method = QueryMethod::new("findByActiveTrue", ReturnKind::Many).sort();
    let query = query(&person, DialectKind::Sqlite, &method);
    let err = query
        .statement(&[Argument::from(Sort::by(&["nickname"]))])
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidDerivation { .. }), "{err:?}");
}

fn article() -> EntityMetadata {
    EntityMetadata::new("Article", "article")
        .with_property(PersistentProperty::simple("id", PropertyType::Int64).id())
        .with_property(PersistentProperty::simple(
            "tags",
            PropertyType::Array(Box::new(PropertyType::Text)),
        ))
}

#[test]
fn array_arguments_need_array_columns() {
    let article = article();
    let method = QueryMethod::new("findByTags", ReturnKind::Many).param("tags");
    let args = [Argument::list(["rust", "sql"])];

    let statement = render(&article, DialectKind::Postgres, &method, &args);
    assert!(statement.sql.ends_with("WHERE \"article\".\"tags\" = $1"));
    assert_eq!(
        statement.parameters,
        vec![SqlValue::Array(SqlArray {
            element_type: "text",
            values: vec![
                SqlValue::Text(String::from("rust")),
                SqlValue::Text(String::from("sql")),
            ],
        })]
    );

    let err = query(&article, DialectKind::MySql, &method)
        .statement(&args)
        .unwrap_err();
    assert!(
        matches!(
            err,
            RepositoryError::Dialect(DialectError::UnsupportedArrayType { .. })
        ),
        "{err:?}"
    );
}

#[test]
fn exists_fetches_one_row() {
    let book = book();
    let method = QueryMethod::new("existsByTitle", ReturnKind::Exists).param("title");
    let args = [Argument::value("Dune")];
    assert_eq!(
        render(&book, DialectKind::Postgres, &method, &args).sql,
        "SELECT 1 FROM \"book\" WHERE \"book\".\"title\" = $1 LIMIT 1"
    );
    assert_eq!(
        render(&book, DialectKind::Oracle, &method, &args).sql,
        "SELECT 1 FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? FETCH FIRST 1 ROWS ONLY"
    );
}

#[test]
fn count_and_delete_ignore_windows() {
    let book = book();
    let count = QueryMethod::new("countByTitle", ReturnKind::Count).param("title");
    let delete = QueryMethod::new("deleteByTitle", ReturnKind::Deleted).param("title");
    let args = [Argument::value("Dune")];
    assert_eq!(
        render(&book, DialectKind::MySql, &count, &args).sql,
        "SELECT COUNT(*) FROM `book` WHERE `book`.`title` = ?"
    );
    assert_eq!(
        render(&book, DialectKind::H2, &delete, &args).sql,
        "DELETE FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ?"
    );
}

#[test]
fn sql_server_escapes_brackets() {
    let book = book();
    let method = QueryMethod::new("findByTitleStartingWith", ReturnKind::Many).param("prefix");
    let statement = render(&book, DialectKind::SqlServer, &method, &[Argument::value("[a]")]);
    assert!(statement.sql.ends_with("LIKE ? ESCAPE '\\'"), "{}", statement.sql);
    assert_eq!(
        statement.parameters,
        vec![SqlValue::Text(String::from("\\[a]%"))]
    );
}

#[test]
fn unquoted_identifiers_are_left_alone() {
    let book = book();
    let method = QueryMethod::new("findByTitle", ReturnKind::Many).param("title");
    let dialect = Dialect::of(DialectKind::Oracle);
    let config = DataConfig {
        force_quote: false,
        ..DataConfig::default()
    };
    let query = RepositoryQuery::new(&method, &book, dialect, &config).unwrap();
    assert_eq!(
        query.statement(&[Argument::value("Dune")]).unwrap().sql,
        "SELECT book.id, book.title FROM book WHERE book.title = ?"
    );
}

fn limit(limit: u64) -> String {
    format!("LIMIT {limit}")
}

fn offset(offset: u64) -> String {
    format!("OFFSET {offset}")
}

fn limit_offset(limit: u64, offset: u64) -> String {
    format!("LIMIT {limit} OFFSET {offset}")
}

#[test]
fn limits_placed_after_where_precede_the_order() {
    let book = book();
    let method = QueryMethod::new("findByTitleOrderByTitle", ReturnKind::Many)
        .param("title")
        .pageable();
    let dialect = Dialect::of(DialectKind::H2).with_limit_clause(LimitClause::new(
        limit,
        offset,
        limit_offset,
        LimitPosition::AfterWhere,
    ));
    let query = RepositoryQuery::new(&method, &book, dialect, &DataConfig::default()).unwrap();
    let statement = query
        .statement(&[Argument::value("Dune"), Argument::from(Pageable::of(2, 10))])
        .unwrap();
    assert_eq!(
        statement.sql,
        "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ? LIMIT 10 OFFSET 20 ORDER BY \"BOOK\".\"TITLE\" ASC"
    );
}

#[test]
fn dialects_without_limits_reject_pages() {
    let book = book();
    let dialect = Dialect::of(DialectKind::H2).with_limit_clause(LimitClause::UNSUPPORTED);
    let config = DataConfig::default();

    let paged = find_by_title_paged();
    let query = RepositoryQuery::new(&paged, &book, dialect, &config).unwrap();
    let err = query
        .statement(&[Argument::value("Dune"), Argument::from(Pageable::of(0, 10))])
        .unwrap_err();
    assert!(
        matches!(
            err,
            RepositoryError::Dialect(DialectError::PaginationUnsupported(DialectKind::H2))
        ),
        "{err:?}"
    );

    let plain = QueryMethod::new("findByTitle", ReturnKind::Many).param("title");
    let query = RepositoryQuery::new(&plain, &book, dialect, &config).unwrap();
    assert_eq!(
        query.statement(&[Argument::value("Dune")]).unwrap().sql,
        "SELECT \"BOOK\".\"ID\", \"BOOK\".\"TITLE\" FROM \"BOOK\" WHERE \"BOOK\".\"TITLE\" = ?"
    );
}

#[test]
fn pages_need_at_least_one_element() {
    let book = book();
    let method = find_by_title_paged();
    let err = query(&book, DialectKind::Postgres, &method)
        .statement(&[Argument::value("Dune"), Argument::from(Pageable::of(0, 0))])
        .unwrap_err();
    assert!(
        matches!(
            err,
            RepositoryError::InvalidArguments { ref reason, .. } if reason == "page size must be at least 1"
        ),
        "{err:?}"
    );
}

#[test]
fn prebuilt_arrays_are_rebound_per_dialect() {
    let article = article();
    let method = QueryMethod::new("findByTags", ReturnKind::Many).param("tags");
    let args = [Argument::value(SqlValue::Array(SqlArray {
        element_type: "varchar",
        values: vec![SqlValue::Text(String::from("rust"))],
    }))];

    let statement = render(&article, DialectKind::Postgres, &method, &args);
    assert_eq!(
        statement.parameters,
        vec![SqlValue::Array(SqlArray {
            element_type: "text",
            values: vec![SqlValue::Text(String::from("rust"))],
        })]
    );

    let err = query(&article, DialectKind::MySql, &method)
        .statement(&args)
        .unwrap_err();
    assert!(
        matches!(
            err,
            RepositoryError::Dialect(DialectError::UnsupportedArrayType { .. })
        ),
        "{err:?}"
    );

    let book = book();
    let by_title = QueryMethod::new("findByTitle", ReturnKind::Many).param("title");
    let err = query(&book, DialectKind::Postgres, &by_title)
        .statement(&args)
        .unwrap_err();
    assert!(matches!(err, RepositoryError::InvalidArguments { .. }), "{err:?}");
}

#[test]
fn generated_key_columns_follow_the_driver() {
    let book = book();
    let key_columns = |kind| StatementRenderer::new(&book, Dialect::of(kind)).key_columns();
    assert_eq!(key_columns(DialectKind::Postgres), vec![String::from("id")]);
    assert_eq!(key_columns(DialectKind::Oracle), vec![String::from("ID")]);
    assert!(key_columns(DialectKind::MySql).is_empty());
}

#[test]
fn distinct_selects_reject_case_insensitive_dynamic_sorts() {
    let book = book();
    let method = QueryMethod::new("findDistinctByTitle", ReturnKind::Many)
        .param("title")
        .sort();
    let query = query(&book, DialectKind::Postgres, &method);

    let sort = Sort::unsorted().and(Order::asc("title").ignoring_case());
    let err = query
        .statement(&[Argument::value("Dune"), Argument::from(sort)])
        .unwrap_err();
    assert!(
        matches!(err, RepositoryError::InvalidDerivation { ref reason, .. } if reason.contains("ignoring case")),
        "{err:?}"
    );

    let sort = Sort::unsorted().and(Order::asc("title"));
    let statement = query
        .statement(&[Argument::value("Dune"), Argument::from(sort)])
        .unwrap();
    assert!(statement.sql.starts_with("SELECT DISTINCT"), "{}", statement.sql);
}
