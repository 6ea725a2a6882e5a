//! The validating facade between boundary handlers and the record store.
//!
//! A [`TodoService`] is an explicit handle constructed once at process
//! startup and shared (behind an `Arc`) with every boundary handler — there
//! is no global singleton. Initialization is lazy and single-flight: the
//! store slot sits behind a write lock, so concurrent initializers serialize
//! and late arrivals observe the already-built store and return.
//!
//! Storage failures are logged here in full and re-surfaced as
//! [`ServiceError::OperationFailed`] with a stable, user-safe message; file
//! paths and driver detail never cross this boundary.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::registry::{BackendRegistry, StoreConfig};
use crate::store::{TaskStore, TaskUpdate};
use crate::task::Task;

/// Log the cause, hand the caller a stable message.
fn internal(message: &'static str, err: impl std::fmt::Display) -> ServiceError {
    log::error!("{message}: {err}");
    ServiceError::OperationFailed(message)
}

fn validate_text(text: &str) -> Result<&str, ServiceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(
            "todo text cannot be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

/// The todo service. See the [module docs](self) for the lifecycle.
pub struct TodoService {
    config: StoreConfig,
    registry: BackendRegistry,
    store: RwLock<Option<Arc<dyn TaskStore>>>,
}

impl TodoService {
    /// Create a service with the default backend registry (SQLite registered).
    /// No store is built until [`initialize`](TodoService::initialize).
    pub fn new(config: StoreConfig) -> Self {
        Self::with_registry(config, BackendRegistry::new())
    }

    /// Create a service over a custom registry.
    pub fn with_registry(config: StoreConfig, registry: BackendRegistry) -> Self {
        Self {
            config,
            registry,
            store: RwLock::new(None),
        }
    }

    /// Build and initialize the store named by the configuration.
    ///
    /// Re-entrant after success (no-op) and single-flight under concurrency:
    /// callers racing here serialize on the slot's write lock, and whoever
    /// arrives after the first success just sees the store in place.
    pub async fn initialize(&self) -> Result<(), ServiceError> {
        let mut slot = self.store.write().await;
        if slot.is_some() {
            return Ok(());
        }

        let store = self
            .registry
            .create(&self.config)
            .await
            .map_err(|err| internal("failed to initialize the todo service", err))?;
        log::info!(
            "todo service initialized (backend {:?})",
            self.config.backend
        );
        *slot = Some(store);
        Ok(())
    }

    /// The live store, or [`ServiceError::NotInitialized`]. Never
    /// auto-initializes: calling an operation before setup is a programmer
    /// error that must stay visible.
    async fn store(&self) -> Result<Arc<dyn TaskStore>, ServiceError> {
        self.store
            .read()
            .await
            .clone()
            .ok_or(ServiceError::NotInitialized)
    }

    /// Every todo, newest first.
    pub async fn get_all_todos(&self) -> Result<Vec<Task>, ServiceError> {
        let store = self.store().await?;
        store
            .list_all()
            .await
            .map_err(|err| internal("failed to load todos", err))
    }

    /// Validate, trim, stamp (`completed = false`, now) and persist a new todo.
    pub async fn add_todo(&self, text: &str) -> Result<Task, ServiceError> {
        let store = self.store().await?;
        let trimmed = validate_text(text)?;
        store
            .insert(trimmed, false, Utc::now())
            .await
            .map_err(|err| internal("failed to add todo", err))
    }

    /// Flip the completion flag of the matching todo. `Ok(None)` when no todo
    /// has that id.
    pub async fn toggle_todo(&self, id: &str) -> Result<Option<Task>, ServiceError> {
        let store = self.store().await?;
        // Full-list scan: single-user, low-volume store.
        let todos = store
            .list_all()
            .await
            .map_err(|err| internal("failed to load todos", err))?;
        let Some(current) = todos.into_iter().find(|todo| todo.id == id) else {
            return Ok(None);
        };

        store
            .update(id, &TaskUpdate::Completed(!current.completed))
            .await
            .map_err(|err| internal("failed to update todo", err))
    }

    /// Replace the text of the matching todo. `Ok(None)` when no todo has
    /// that id.
    pub async fn update_todo_text(&self, id: &str, text: &str) -> Result<Option<Task>, ServiceError> {
        let store = self.store().await?;
        let trimmed = validate_text(text)?;
        store
            .update(id, &TaskUpdate::Text(trimmed.to_string()))
            .await
            .map_err(|err| internal("failed to update todo", err))
    }

    /// Apply a partial update from whichever fields the caller sent.
    ///
    /// At least one field must be present; text, when present, must be
    /// non-blank. Both violations are [`ServiceError::Validation`].
    pub async fn update_todo(
        &self,
        id: &str,
        text: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<Task>, ServiceError> {
        let store = self.store().await?;
        let text = text.map(validate_text).transpose()?.map(str::to_string);
        let update = TaskUpdate::from_parts(text, completed).ok_or_else(|| {
            ServiceError::Validation("either text or completed must be provided".to_string())
        })?;

        store
            .update(id, &update)
            .await
            .map_err(|err| internal("failed to update todo", err))
    }

    /// Remove the matching todo. Returns whether one existed and was removed.
    pub async fn delete_todo(&self, id: &str) -> Result<bool, ServiceError> {
        let store = self.store().await?;
        store
            .delete(id)
            .await
            .map_err(|err| internal("failed to delete todo", err))
    }

    /// Remove every completed todo and return the count removed.
    pub async fn clear_completed(&self) -> Result<u64, ServiceError> {
        let store = self.store().await?;
        store
            .delete_completed()
            .await
            .map_err(|err| internal("failed to clear completed todos", err))
    }

    /// Liveness probe: a lightweight read, reported as a bool. Never errors;
    /// an uninitialized service is simply unhealthy.
    pub async fn is_healthy(&self) -> bool {
        match self.get_all_todos().await {
            Ok(_) => true,
            Err(err) => {
                log::error!("health check failed: {err}");
                false
            }
        }
    }

    /// Release the store and reset the slot, so a later
    /// [`initialize`](TodoService::initialize) reconnects.
    pub async fn close(&self) -> Result<(), ServiceError> {
        let mut slot = self.store.write().await;
        if let Some(store) = slot.take() {
            store
                .close()
                .await
                .map_err(|err| internal("failed to close the todo store", err))?;
        }
        Ok(())
    }
}
