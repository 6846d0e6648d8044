//! oxide-data CLI
//!
//! Command-line tool for inspecting dialects and derived repository queries.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use oxide_data_core::{DataConfig, Dialect, DialectKind, DialectResolver, LockMode, SqlValue};
use oxide_data_repository::mapping::EntityMetadata;
use oxide_data_repository::method::{Argument, QueryMethod, ReturnKind};
use oxide_data_repository::paging::{Limit, Pageable, Sort};
use oxide_data_repository::sqlite::SqliteMetadataSource;
use oxide_data_repository::RepositoryQuery;

/// Derived repository queries for many SQL dialects.
#[derive(Parser)]
#[command(name = "oxide-data")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Data source configuration (JSON).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the statement a query method derives to.
    Render {
        /// Aggregate mapping (JSON).
        #[arg(short, long)]
        entity: PathBuf,

        /// Target dialect.
        #[arg(short, long)]
        dialect: DialectKind,

        /// Method name, e.g. findByLastNameOrderByAgeDesc.
        method: String,

        /// Declared return type.
        #[arg(short, long, value_enum, default_value_t = Returns::Many)]
        returns: Returns,

        /// Arguments as a JSON array, one element per bindable parameter.
        /// Nested arrays are list arguments.
        #[arg(short, long, default_value = "[]")]
        args: String,

        /// Zero-based page number of a page request.
        #[arg(long, requires = "size")]
        page: Option<u64>,

        /// Page size of a page request.
        #[arg(long)]
        size: Option<u64>,

        /// Sort, comma separated; prefix with `-` for descending. Applied to
        /// the page request when one is given.
        #[arg(long)]
        sort: Option<String>,

        /// Dynamic result limit.
        #[arg(long, conflicts_with = "size")]
        limit: Option<u64>,

        /// Pessimistic lock on selected rows.
        #[arg(long, value_enum)]
        lock: Option<Lock>,
    },

    /// Show the clauses every dialect renders.
    Dialects,

    /// Resolve the dialect of a live SQLite database.
    Resolve {
        /// Database URL.
        #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite::memory:")]
        database: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Returns {
    One,
    Many,
    Stream,
    Slice,
    Page,
    Count,
    Exists,
    Deleted,
}

impl From<Returns> for ReturnKind {
    fn from(returns: Returns) -> Self {
        match returns {
            Returns::One => Self::One,
            Returns::Many => Self::Many,
            Returns::Stream => Self::Stream,
            Returns::Slice => Self::Slice,
            Returns::Page => Self::Page,
            Returns::Count => Self::Count,
            Returns::Exists => Self::Exists,
            Returns::Deleted => Self::Deleted,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Lock {
    Read,
    Write,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            entity,
            dialect,
            method,
            returns,
            args,
            page,
            size,
            sort,
            limit,
            lock,
        } => {
            let entity: EntityMetadata = serde_json::from_str(
                &std::fs::read_to_string(&entity)
                    .with_context(|| format!("reading {}", entity.display()))?,
            )
            .context("parsing aggregate mapping")?;

            let values: Vec<Value> =
                serde_json::from_str(&args).context("arguments must be a JSON array")?;
            let mut method = QueryMethod::new(method, returns.into());
            let mut arguments = Vec::new();
            for (i, value) in values.iter().enumerate() {
                method = method.param(format!("arg{i}"));
                arguments.push(to_argument(value)?);
            }
            if let Some(size) = size {
                method = method.pageable();
                let mut pageable = Pageable::of(page.unwrap_or_default(), size);
                if let Some(sort) = &sort {
                    pageable = pageable.with_sort(parse_sort(sort));
                }
                arguments.push(pageable.into());
            } else if let Some(sort) = &sort {
                method = method.sort();
                arguments.push(parse_sort(sort).into());
            }
            if let Some(limit) = limit {
                method = method.limit();
                arguments.push(Limit::of(limit).into());
            }
            if let Some(lock) = lock {
                method = method.with_lock(match lock {
                    Lock::Read => LockMode::PessimisticRead,
                    Lock::Write => LockMode::PessimisticWrite,
                });
            }

            let query = RepositoryQuery::new(&method, &entity, Dialect::of(dialect), &config)?;
            let statement = query.statement(&arguments)?;
            println!("{}", statement.sql);
            for (i, value) in statement.parameters.iter().enumerate() {
                println!("-- {}: {}", i + 1, value.to_sql_inline());
            }
        }

        Commands::Dialects => {
            println!(
                "{:<10} {:<48} {:<52} {:<7} {:<8} {}",
                "dialect", "limit 10 offset 20", "write lock", "arrays", "key", "sequence"
            );
            for kind in DialectKind::ALL {
                let dialect = Dialect::of(kind);
                let sequence = dialect
                    .create_sequence_query("seq")
                    .unwrap_or_else(|_| String::from("-"));
                let generation = dialect.id_generation();
                let key = if generation.driver_requires_key_column_names() {
                    generation.key_column_name("id", &dialect.identifier_processing())
                } else {
                    String::from("-")
                };
                println!(
                    "{:<10} {:<48} {:<52} {:<7} {:<8} {}",
                    kind.name(),
                    dialect.limit_clause().limit_offset(10, 20),
                    dialect
                        .lock_clause()
                        .lock(LockMode::PessimisticWrite, "t"),
                    dialect.array_support().is_supported(),
                    key,
                    sequence
                );
            }
        }

        Commands::Resolve { database } => {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect(&database)
                .await?;
            let resolver = DialectResolver::from_config(&config);
            info!(providers = ?resolver.provider_names(), "resolving dialect");
            let dialect = resolver.resolve(&SqliteMetadataSource::new(pool)).await?;
            println!("{}", dialect.kind());
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DataConfig> {
    let config = match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            DataConfig::from_json(&json)?
        }
        None => DataConfig::default(),
    };
    Ok(config.with_env_overrides()?)
}

fn parse_sort(spec: &str) -> Sort {
    let specs: Vec<&str> = spec.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();
    Sort::by(&specs)
}

fn to_argument(value: &Value) -> anyhow::Result<Argument> {
    Ok(match value {
        Value::Array(items) => Argument::List(items.iter().map(to_value).collect::<Result<_, _>>()?),
        other => Argument::Value(to_value(other)?),
    })
}

fn to_value(value: &Value) -> anyhow::Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Int(i),
            None => SqlValue::Float(n.as_f64().context("number out of range")?),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => bail!("unsupported argument {value}"),
    })
}
