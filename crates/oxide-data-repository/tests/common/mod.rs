#![allow(dead_code)]

use oxide_data_core::{DataConfig, Dialect, DialectKind, PropertyType};
use oxide_data_repository::mapping::{EntityMetadata, PersistentProperty};
use oxide_data_repository::method::{Argument, QueryMethod};
use oxide_data_repository::{RenderedStatement, RepositoryError, RepositoryQuery};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

pub fn book() -> EntityMetadata {
    EntityMetadata::new("Book", "book")
        .with_property(PersistentProperty::simple("id", PropertyType::Int64).id())
        .with_property(PersistentProperty::simple("title", PropertyType::Text))
}

pub fn person() -> EntityMetadata {
    EntityMetadata::new("Person", "person")
        .with_property(PersistentProperty::simple("id", PropertyType::Int64).id())
        .with_property(PersistentProperty::simple("first_name", PropertyType::Text))
        .with_property(PersistentProperty::simple("last_name", PropertyType::Text))
        .with_property(PersistentProperty::simple("age", PropertyType::Int32))
        .with_property(PersistentProperty::simple("active", PropertyType::Bool))
        .with_property(PersistentProperty::embedded(
            "address",
            "address_",
            vec![
                PersistentProperty::simple("city", PropertyType::Text),
                PersistentProperty::simple("zip", PropertyType::Text),
            ],
        ))
        .with_property(PersistentProperty::reference("employer", "Company"))
        .with_property(PersistentProperty::collection("phones", "Phone"))
}

pub fn query<'a>(
    entity: &'a EntityMetadata,
    kind: DialectKind,
    method: &QueryMethod,
) -> RepositoryQuery<'a> {
    RepositoryQuery::new(method, entity, Dialect::of(kind), &DataConfig::default())
        .unwrap_or_else(|e| panic!("Failed to derive {}: {e}", method.name))
}

pub fn render(
    entity: &EntityMetadata,
    kind: DialectKind,
    method: &QueryMethod,
    args: &[Argument],
) -> RenderedStatement {
    query(entity, kind, method)
        .statement(args)
        .unwrap_or_else(|e| panic!("Failed to render {}: {e}", method.name))
}

pub fn derivation_error(entity: &EntityMetadata, method: &QueryMethod) -> String {
    match RepositoryQuery::new(
        method,
        entity,
        Dialect::of(DialectKind::H2),
        &DataConfig::default(),
    ) {
        Err(RepositoryError::InvalidDerivation { reason, .. }) => reason,
        Err(other) => panic!("Expected InvalidDerivation for {}, got {other:?}", method.name),
        Ok(_) => panic!("Expected derivation of {} to fail", method.name),
    }
}

/// An in-memory database with a `person` table and five rows.
pub async fn seeded_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();

    sqlx::query(
        "CREATE TABLE person (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            age INTEGER NOT NULL,
            active BOOLEAN NOT NULL,
            address_city TEXT,
            address_zip TEXT
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    let rows = [
        (1, "Ada", "Lovelace", 36, true, "London", "N1"),
        (2, "Byron", "Lovelace", 74, false, "London", "W1"),
        (3, "Alan", "Turing", 41, true, "Wilmslow", "SK9"),
        (4, "Grace", "Hopper", 85, false, "Arlington", "22201"),
        (5, "Edsger", "Dijkstra", 72, true, "Austin", "78701"),
    ];
    for (id, first, last, age, active, city, zip) in rows {
        sqlx::query("INSERT INTO person VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(first)
            .bind(last)
            .bind(age)
            .bind(active)
            .bind(city)
            .bind(zip)
            .execute(&pool)
            .await
            .unwrap();
    }
    pool
}
