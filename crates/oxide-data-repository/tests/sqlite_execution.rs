mod common;

use common::{person, seeded_pool};
use oxide_data_core::{DataConfig, Dialect, DialectKind};
use oxide_data_repository::mapping::EntityMetadata;
use oxide_data_repository::method::{Argument, QueryMethod, ReturnKind};
use oxide_data_repository::paging::{Limit, Pageable};
use oxide_data_repository::sqlite::SqliteExecutor;
use oxide_data_repository::{QueryResult, RepositoryError, RepositoryQuery};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

async fn run(
    entity: &EntityMetadata,
    executor: &SqliteExecutor,
    method: &QueryMethod,
    args: &[Argument],
) -> oxide_data_repository::Result<QueryResult<SqliteRow>> {
    let query = RepositoryQuery::new(
        method,
        entity,
        Dialect::of(DialectKind::Sqlite),
        &DataConfig::default(),
    )?;
    query.execute(executor, args).await
}

fn ids(rows: &[SqliteRow]) -> Vec<i64> {
    rows.iter().map(|row| row.get::<i64, _>(0)).collect()
}

fn last_names(rows: &[SqliteRow]) -> Vec<String> {
    rows.iter().map(|row| row.get::<String, _>(2)).collect()
}

#[tokio::test]
async fn zero_limit_returns_no_rows() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findByActiveTrue", ReturnKind::Many).limit();

    let rows = run(&person, &executor, &method, &[Argument::from(Limit::of(0))])
        .await
        .unwrap()
        .into_rows();
    assert!(rows.is_empty());

    let rows = run(&person, &executor, &method, &[Argument::from(Limit::unlimited())])
        .await
        .unwrap()
        .into_rows();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn slices_probe_one_row_ahead() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findByActiveTrueOrderById", ReturnKind::Slice).pageable();

    let QueryResult::Slice(first) = run(&person, &executor, &method, &[Pageable::of(0, 2).into()])
        .await
        .unwrap()
    else {
        panic!("Expected a slice");
    };
    assert_eq!(ids(&first.content), vec![1, 3]);
    assert!(first.has_next);
    assert!(!first.has_previous());

    let QueryResult::Slice(second) = run(&person, &executor, &method, &[Pageable::of(1, 2).into()])
        .await
        .unwrap()
    else {
        panic!("Expected a slice");
    };
    assert_eq!(ids(&second.content), vec![5]);
    assert!(!second.has_next);
    assert!(second.has_previous());
}

#[tokio::test]
async fn pages_count_or_infer_the_total() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findByActiveTrueOrderById", ReturnKind::Page).pageable();

    for (page, expected) in [(0, vec![1, 3]), (1, vec![5]), (4, vec![])] {
        let QueryResult::Page(result) =
            run(&person, &executor, &method, &[Pageable::of(page, 2).into()])
                .await
                .unwrap()
        else {
            panic!("Expected a page");
        };
        assert_eq!(ids(&result.content), expected, "page {page}");
        assert_eq!(result.total, 3, "page {page}");
        assert_eq!(result.total_pages(), 2);
    }
}

#[tokio::test]
async fn first_caps_the_page_total() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findTop4ByAgeGreaterThanOrderByAge", ReturnKind::Page)
        .param("age")
        .pageable();

    let QueryResult::Page(result) = run(
        &person,
        &executor,
        &method,
        &[Argument::value(0), Pageable::of(1, 3).into()],
    )
    .await
    .unwrap() else {
        panic!("Expected a page");
    };
    // Ages in order: 36, 41, 72, 74, 85. Only four rows are visible.
    assert_eq!(ids(&result.content), vec![2]);
    assert_eq!(result.total, 4);
}

#[tokio::test]
async fn single_results_must_be_unique() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findByLastName", ReturnKind::One).param("last");

    let err = run(&person, &executor, &method, &[Argument::value("Lovelace")])
        .await
        .err().unwrap();
    assert!(
        matches!(err, RepositoryError::NonUniqueResult { ref method } if method == "findByLastName"),
        "{err:?}"
    );

    let QueryResult::One(Some(row)) =
        run(&person, &executor, &method, &[Argument::value("Turing")])
            .await
            .unwrap()
    else {
        panic!("Expected one row");
    };
    assert_eq!(row.get::<String, _>(1), "Alan");

    let result = run(&person, &executor, &method, &[Argument::value("Knuth")])
        .await
        .unwrap();
    assert!(matches!(result, QueryResult::One(None)));
}

#[tokio::test]
async fn count_and_exists() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);

    let count = QueryMethod::new("countByAddressCity", ReturnKind::Count).param("city");
    let result = run(&person, &executor, &count, &[Argument::value("London")])
        .await
        .unwrap();
    assert!(matches!(result, QueryResult::Count(2)));

    let exists = QueryMethod::new("existsByLastName", ReturnKind::Exists).param("last");
    let result = run(&person, &executor, &exists, &[Argument::value("Hopper")])
        .await
        .unwrap();
    assert!(matches!(result, QueryResult::Exists(true)));
    let result = run(&person, &executor, &exists, &[Argument::value("Knuth")])
        .await
        .unwrap();
    assert!(matches!(result, QueryResult::Exists(false)));
}

#[tokio::test]
async fn delete_reports_affected_rows() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);

    let delete = QueryMethod::new("deleteByActiveFalse", ReturnKind::Deleted);
    let result = run(&person, &executor, &delete, &[]).await.unwrap();
    assert!(matches!(result, QueryResult::Deleted(2)));

    let count = QueryMethod::new("countByActiveFalse", ReturnKind::Count);
    let result = run(&person, &executor, &count, &[]).await.unwrap();
    assert!(matches!(result, QueryResult::Count(0)));
}

#[tokio::test]
async fn wildcards_in_values_match_literally() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new("findByFirstNameContainingOrderById", ReturnKind::Many)
        .param("part");

    let rows = run(&person, &executor, &method, &[Argument::value("%")])
        .await
        .unwrap()
        .into_rows();
    assert!(rows.is_empty());

    let rows = run(&person, &executor, &method, &[Argument::value("a")])
        .await
        .unwrap()
        .into_rows();
    assert_eq!(ids(&rows), vec![1, 3, 4]);
}

#[tokio::test]
async fn ignore_case_in_and_first() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);

    let method = QueryMethod::new("findByLastNameIgnoreCase", ReturnKind::Many).param("last");
    let rows = run(&person, &executor, &method, &[Argument::value("TURING")])
        .await
        .unwrap()
        .into_rows();
    assert_eq!(last_names(&rows), vec!["Turing"]);

    let method = QueryMethod::new("findByAgeInOrderByAge", ReturnKind::Many).param("ages");
    let rows = run(&person, &executor, &method, &[Argument::list([36, 41, 99])])
        .await
        .unwrap()
        .into_rows();
    assert_eq!(ids(&rows), vec![1, 3]);

    let method = QueryMethod::new("findFirst2ByActiveTrueOrderByAgeDesc", ReturnKind::Many);
    let rows = run(&person, &executor, &method, &[]).await.unwrap().into_rows();
    assert_eq!(last_names(&rows), vec!["Dijkstra", "Turing"]);
}

#[tokio::test]
async fn embedded_and_or_criteria() {
    let person = person();
    let executor = SqliteExecutor::new(seeded_pool().await);
    let method = QueryMethod::new(
        "findByAddressCityAndActiveTrueOrAgeGreaterThanOrderById",
        ReturnKind::Many,
    )
    .param("city")
    .param("age");
    let rows = run(
        &person,
        &executor,
        &method,
        &[Argument::value("London"), Argument::value(80)],
    )
    .await
    .unwrap()
    .into_rows();
    assert_eq!(ids(&rows), vec![1, 4]);
}
