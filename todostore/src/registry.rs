//! Backend registry: configuration-time selection of a store implementation.
//!
//! Rather than a switch with present-but-throwing branches for backends that
//! do not exist yet, backends are registered by tag. An unknown tag fails
//! fast with [`FactoryError::UnknownBackend`] while configuration is being
//! resolved, never deep inside a call path. Swapping storage technology means
//! one new [`TaskStore`] implementation and one `register` call.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::FactoryError;
use crate::sqlite::SqliteTaskStore;
use crate::store::TaskStore;

/// Tag of the one backend shipped with the crate.
pub const SQLITE_BACKEND: &str = "sqlite";

/// Default backing file, relative to the working directory. `mode=rwc`
/// creates the file on first open.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/todos.db?mode=rwc";

/// Configuration for constructing a store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend tag looked up in the [`BackendRegistry`].
    pub backend: String,
    /// sea-orm connection URL for the backing file.
    pub database_url: String,
    /// Log every SQL statement (wired to sqlx logging).
    pub verbose: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: SQLITE_BACKEND.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            verbose: false,
        }
    }
}

impl StoreConfig {
    /// Defaults overridable from the environment: `TODOSTORE_BACKEND`,
    /// `TODOSTORE_DB`, and `TODOSTORE_SQL_LOG` (`1` or `true`).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: std::env::var("TODOSTORE_BACKEND").unwrap_or(defaults.backend),
            database_url: std::env::var("TODOSTORE_DB").unwrap_or(defaults.database_url),
            verbose: std::env::var("TODOSTORE_SQL_LOG")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.verbose),
        }
    }
}

/// Builds an unconnected store from configuration.
pub type StoreBuilder = fn(&StoreConfig) -> Arc<dyn TaskStore>;

/// Registry of available store backends.
///
/// Thread-safe via interior `RwLock`. [`BackendRegistry::new`] comes with the
/// SQLite backend registered; [`BackendRegistry::empty`] starts blank for
/// callers wiring in their own.
pub struct BackendRegistry {
    builders: RwLock<HashMap<String, StoreBuilder>>,
}

impl BackendRegistry {
    /// Create a registry with no backends.
    pub fn empty() -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the built-in SQLite backend registered.
    pub fn new() -> Self {
        let registry = Self::empty();
        registry.register(SQLITE_BACKEND, |config| {
            Arc::new(SqliteTaskStore::new(&config.database_url, config.verbose))
        });
        registry
    }

    /// Register a backend builder. Replaces any existing entry with the same tag.
    pub fn register(&self, tag: &str, builder: StoreBuilder) {
        self.builders
            .write()
            .unwrap()
            .insert(tag.to_string(), builder);
    }

    /// Check whether a backend tag is registered.
    pub fn is_registered(&self, tag: &str) -> bool {
        self.builders.read().unwrap().contains_key(tag)
    }

    /// Construct and initialize the store named by `config.backend`.
    ///
    /// The returned store is ready for use: the factory runs
    /// [`initialize`](TaskStore::initialize) so callers never hold an
    /// unopened store.
    pub async fn create(&self, config: &StoreConfig) -> Result<Arc<dyn TaskStore>, FactoryError> {
        let builder = self
            .builders
            .read()
            .unwrap()
            .get(&config.backend)
            .copied()
            .ok_or_else(|| FactoryError::UnknownBackend(config.backend.clone()))?;

        let store = builder(config);
        store.initialize().await?;
        Ok(store)
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_is_registered_by_default() {
        let registry = BackendRegistry::new();
        assert!(registry.is_registered(SQLITE_BACKEND));
        assert!(!registry.is_registered("postgres"));
    }

    #[tokio::test]
    async fn unknown_backend_fails_at_configuration_time() {
        let registry = BackendRegistry::new();
        let config = StoreConfig {
            backend: "mongodb".into(),
            ..StoreConfig::default()
        };
        match registry.create(&config).await {
            Err(FactoryError::UnknownBackend(tag)) => assert_eq!(tag, "mongodb"),
            other => panic!("expected unknown backend, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn create_returns_an_initialized_store() {
        let registry = BackendRegistry::new();
        let config = StoreConfig {
            database_url: "sqlite::memory:".into(),
            ..StoreConfig::default()
        };
        let store = registry.create(&config).await.expect("create store");
        // Ready without a separate initialize call.
        assert!(store.list_all().await.expect("list").is_empty());
    }
}
