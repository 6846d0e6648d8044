//! Dialect resolution from connection metadata.
//!
//! The resolver reads the driver metadata of a data source once and asks its
//! providers, in registration order, whether they recognise it. The first
//! provider that answers wins. When two providers would both accept the same
//! metadata, the earlier registration decides; no attempt is made to pick a
//! "better" match.
//!
//! Failing to find a dialect is fatal. There is no fallback dialect, since
//! pagination or locking rendered for the wrong vendor fails at runtime in
//! ways that are hard to trace back.

use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::dialect::{Dialect, DialectKind};
use crate::error::{DialectError, Result};
use crate::identifier::{IdentifierProcessing, LetterCasing, Quoting};

/// Driver metadata of a live connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionMetadata {
    /// Database product name, e.g. `H2` or `PostgreSQL`.
    pub product_name: String,
    /// Product version string as reported by the server.
    pub product_version: String,
    /// Connection URL, if known.
    pub url: Option<String>,
    /// Identifier quote string reported by the driver.
    pub identifier_quote: Option<String>,
    /// How unquoted identifiers are stored.
    pub identifier_casing: Option<LetterCasing>,
}

impl ConnectionMetadata {
    /// Creates metadata from a product name and version.
    pub fn new(product_name: impl Into<String>, product_version: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            product_version: product_version.into(),
            ..Self::default()
        }
    }

    /// Sets the identifier quote string.
    #[must_use]
    pub fn with_identifier_quote(mut self, quote: impl Into<String>) -> Self {
        self.identifier_quote = Some(quote.into());
        self
    }

    /// Sets the identifier casing.
    #[must_use]
    pub const fn with_identifier_casing(mut self, casing: LetterCasing) -> Self {
        self.identifier_casing = Some(casing);
        self
    }

    /// Sets the connection URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Leading numeric component of the product version.
    #[must_use]
    pub fn major_version(&self) -> Option<u32> {
        let digits: String = self
            .product_version
            .trim()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

/// Capability to read [`ConnectionMetadata`] from a data source.
///
/// Implementations acquire whatever connection they need inside
/// [`MetadataSource::metadata`] and release it before returning, whether the
/// probe succeeds or not.
#[allow(async_fn_in_trait)]
pub trait MetadataSource {
    /// Reads the metadata.
    async fn metadata(&self) -> Result<ConnectionMetadata>;
}

impl MetadataSource for ConnectionMetadata {
    async fn metadata(&self) -> Result<ConnectionMetadata> {
        Ok(self.clone())
    }
}

/// Inspects connection metadata and either produces a dialect or declines.
pub trait DialectProvider: std::fmt::Debug + Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Returns the dialect for `metadata`, or `None` to decline.
    fn dialect_for(&self, metadata: &ConnectionMetadata) -> Option<Dialect>;
}

/// Matches on a product name substring and an optional minimum version.
#[derive(Debug, Clone)]
pub struct ProductNameProvider {
    kind: DialectKind,
    product: String,
    min_major_version: Option<u32>,
    identifiers_from_metadata: bool,
}

impl ProductNameProvider {
    /// Matches product names containing `product` (case-insensitive).
    pub fn new(kind: DialectKind, product: impl Into<String>) -> Self {
        Self {
            kind,
            product: product.into().to_lowercase(),
            min_major_version: None,
            identifiers_from_metadata: false,
        }
    }

    /// The provider registered for `kind` by default.
    ///
    /// Returns `None` for [`DialectKind::Ansi`], which has no product to
    /// detect and can only be configured.
    #[must_use]
    pub fn builtin(kind: DialectKind) -> Option<Self> {
        let provider = match kind {
            DialectKind::Ansi => return None,
            DialectKind::HsqlDb => Self::new(kind, "hsql"),
            DialectKind::H2 => Self::new(kind, "h2"),
            DialectKind::MySql => Self::new(kind, "mysql").with_identifiers_from_metadata(),
            DialectKind::MariaDb => Self::new(kind, "mariadb").with_identifiers_from_metadata(),
            DialectKind::Postgres => Self::new(kind, "postgresql"),
            DialectKind::SqlServer => Self::new(kind, "microsoft"),
            DialectKind::Db2 => Self::new(kind, "db2"),
            DialectKind::Oracle => Self::new(kind, "oracle"),
            DialectKind::Sqlite => Self::new(kind, "sqlite"),
        };
        Some(provider)
    }

    /// Only matches servers of at least this major version.
    #[must_use]
    pub const fn with_min_major_version(mut self, version: u32) -> Self {
        self.min_major_version = Some(version);
        self
    }

    /// Takes identifier quoting and casing from the metadata when reported.
    #[must_use]
    pub const fn with_identifiers_from_metadata(mut self) -> Self {
        self.identifiers_from_metadata = true;
        self
    }

    fn identifier_processing(
        &self,
        dialect: &Dialect,
        metadata: &ConnectionMetadata,
    ) -> IdentifierProcessing {
        let defaults = dialect.identifier_processing();
        let quoting = metadata
            .identifier_quote
            .as_deref()
            .map_or(defaults.quoting(), Quoting::from_quote_string);
        let casing = metadata.identifier_casing.unwrap_or(defaults.casing());
        IdentifierProcessing::new(quoting, casing)
    }
}

impl DialectProvider for ProductNameProvider {
    fn name(&self) -> &str {
        &self.product
    }

    fn dialect_for(&self, metadata: &ConnectionMetadata) -> Option<Dialect> {
        if !metadata.product_name.to_lowercase().contains(&self.product) {
            return None;
        }
        if let Some(min) = self.min_major_version {
            if metadata.major_version().map_or(true, |major| major < min) {
                return None;
            }
        }
        let dialect = Dialect::of(self.kind);
        if self.identifiers_from_metadata {
            let processing = self.identifier_processing(&dialect, metadata);
            return Some(dialect.with_identifier_processing(processing));
        }
        Some(dialect)
    }
}

/// Selects the dialect of a data source.
#[derive(Debug)]
pub struct DialectResolver {
    providers: Vec<Box<dyn DialectProvider>>,
    configured: Option<Dialect>,
}

impl DialectResolver {
    /// Creates a resolver without providers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            providers: Vec::new(),
            configured: None,
        }
    }

    /// Creates a resolver with the built-in providers.
    ///
    /// Dialects without a detectable product are skipped.
    #[must_use]
    pub fn new() -> Self {
        let mut resolver = Self::empty();
        for provider in DialectKind::ALL
            .into_iter()
            .filter_map(ProductNameProvider::builtin)
        {
            resolver.register(provider);
        }
        resolver
    }

    /// Creates a resolver probing the built-in providers of `kinds`, in order.
    #[must_use]
    pub fn with_kinds(kinds: &[DialectKind]) -> Self {
        let mut resolver = Self::empty();
        for kind in kinds {
            match ProductNameProvider::builtin(*kind) {
                Some(provider) => resolver.register(provider),
                None => warn!(dialect = %kind, "dialect has no detectable product, not probed"),
            }
        }
        resolver
    }

    /// Creates a resolver from configuration.
    ///
    /// A configured dialect bypasses probing. A configured provider list
    /// replaces the default order.
    #[must_use]
    pub fn from_config(config: &DataConfig) -> Self {
        let mut resolver = if config.providers.is_empty() {
            Self::new()
        } else {
            Self::with_kinds(&config.providers)
        };
        resolver.configured = config.dialect.map(Dialect::of);
        resolver
    }

    /// Appends a provider. It is probed after every provider registered
    /// before it.
    pub fn register(&mut self, provider: impl DialectProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Names of the registered providers in probing order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Reads the metadata of `source` and selects the dialect.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::Probe`] when the metadata cannot be read and
    /// [`DialectError::UnsupportedDialect`] when no provider matches.
    pub async fn resolve<S: MetadataSource>(&self, source: &S) -> Result<Dialect> {
        if let Some(dialect) = self.configured {
            info!(dialect = %dialect.kind(), "using configured dialect");
            return Ok(dialect);
        }
        let metadata = source.metadata().await?;
        self.resolve_metadata(&metadata)
    }

    /// Selects the dialect for already fetched metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DialectError::UnsupportedDialect`] when no provider matches.
    pub fn resolve_metadata(&self, metadata: &ConnectionMetadata) -> Result<Dialect> {
        if let Some(dialect) = self.configured {
            return Ok(dialect);
        }
        for provider in &self.providers {
            debug!(
                provider = provider.name(),
                product = %metadata.product_name,
                "probing dialect provider"
            );
            if let Some(dialect) = provider.dialect_for(metadata) {
                info!(
                    dialect = %dialect.kind(),
                    product = %metadata.product_name,
                    version = %metadata.product_version,
                    "resolved dialect"
                );
                return Ok(dialect);
            }
        }
        warn!(
            product = %metadata.product_name,
            version = %metadata.product_version,
            providers = self.providers.len(),
            "no dialect provider matched"
        );
        Err(DialectError::UnsupportedDialect {
            product: metadata.product_name.clone(),
            version: metadata.product_version.clone(),
        })
    }
}

impl Default for DialectResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_products() {
        let resolver = DialectResolver::new();
        let cases = [
            ("H2", DialectKind::H2),
            ("HSQL Database Engine", DialectKind::HsqlDb),
            ("PostgreSQL", DialectKind::Postgres),
            ("MySQL", DialectKind::MySql),
            ("MariaDB", DialectKind::MariaDb),
            ("Microsoft SQL Server", DialectKind::SqlServer),
            ("DB2/LINUXX8664", DialectKind::Db2),
            ("Oracle", DialectKind::Oracle),
            ("SQLite", DialectKind::Sqlite),
        ];
        for (product, kind) in cases {
            let dialect = resolver
                .resolve_metadata(&ConnectionMetadata::new(product, "1.0"))
                .unwrap();
            assert_eq!(dialect.kind(), kind, "{product}");
        }
    }

    #[test]
    fn test_default_providers() {
        assert_eq!(
            DialectResolver::new().provider_names(),
            vec![
                "hsql",
                "h2",
                "mysql",
                "mariadb",
                "postgresql",
                "microsoft",
                "db2",
                "oracle",
                "sqlite",
            ]
        );
        assert!(DialectResolver::with_kinds(&[DialectKind::Ansi])
            .provider_names()
            .is_empty());
    }

    #[test]
    fn test_unknown_product_fails() {
        let err = DialectResolver::new()
            .resolve_metadata(&ConnectionMetadata::new("Informix", "14.10"))
            .unwrap_err();
        match err {
            DialectError::UnsupportedDialect { product, version } => {
                assert_eq!(product, "Informix");
                assert_eq!(version, "14.10");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_registered_provider_wins() {
        let metadata = ConnectionMetadata::new("H2", "2.2.224");

        let mut resolver = DialectResolver::empty();
        resolver.register(ProductNameProvider::new(DialectKind::H2, "h2"));
        resolver.register(ProductNameProvider::new(DialectKind::Ansi, "h2"));
        assert_eq!(
            resolver.resolve_metadata(&metadata).unwrap().kind(),
            DialectKind::H2
        );

        let mut reversed = DialectResolver::empty();
        reversed.register(ProductNameProvider::new(DialectKind::Ansi, "h2"));
        reversed.register(ProductNameProvider::new(DialectKind::H2, "h2"));
        assert_eq!(
            reversed.resolve_metadata(&metadata).unwrap().kind(),
            DialectKind::Ansi
        );
    }

    #[test]
    fn test_min_version() {
        let mut resolver = DialectResolver::empty();
        resolver.register(
            ProductNameProvider::new(DialectKind::Postgres, "postgresql").with_min_major_version(10),
        );
        assert!(resolver
            .resolve_metadata(&ConnectionMetadata::new("PostgreSQL", "9.6.24"))
            .is_err());
        assert!(resolver
            .resolve_metadata(&ConnectionMetadata::new("PostgreSQL", "16.2"))
            .is_ok());
    }

    #[test]
    fn test_mysql_identifiers_from_metadata() {
        let metadata = ConnectionMetadata::new("MySQL", "8.0.36")
            .with_identifier_quote("\"")
            .with_identifier_casing(LetterCasing::AsIs);
        let dialect = DialectResolver::new().resolve_metadata(&metadata).unwrap();
        assert_eq!(
            dialect.identifier_processing().render("Person", true),
            "\"Person\""
        );
    }

    #[test]
    fn test_configured_dialect_skips_probe() {
        let config = DataConfig {
            dialect: Some(DialectKind::Oracle),
            ..DataConfig::default()
        };
        let dialect = DialectResolver::from_config(&config)
            .resolve_metadata(&ConnectionMetadata::new("H2", "2.2"))
            .unwrap();
        assert_eq!(dialect.kind(), DialectKind::Oracle);
    }

    #[test]
    fn test_major_version() {
        assert_eq!(ConnectionMetadata::new("x", "5.5.5-10.6.12-MariaDB").major_version(), Some(5));
        assert_eq!(ConnectionMetadata::new("x", "").major_version(), None);
    }

    #[tokio::test]
    async fn test_resolve_from_source() {
        let metadata = ConnectionMetadata::new("H2", "2.2.224");
        let dialect = DialectResolver::new().resolve(&metadata).await.unwrap();
        assert_eq!(dialect.kind(), DialectKind::H2);
    }
}
