//! # todostore
//!
//! Persistence and service layer for a single-user todo list.
//!
//! The crate is organized leaf-first:
//!
//! - [`SqliteTaskStore`] — the record store: an embedded SQLite file holding
//!   the `todos` table, exposing async CRUD primitives.
//! - [`BackendRegistry`] — maps a backend tag from [`StoreConfig`] to a store
//!   builder. Backends that are not registered fail at configuration time
//!   with [`FactoryError::UnknownBackend`].
//! - [`TodoService`] — the validating facade boundary handlers talk to. It
//!   lazily builds the store (single-flight), trims and validates input, and
//!   translates storage failures into stable, user-safe errors.
//!
//! ## Quick start
//!
//! ```ignore
//! use todostore::{StoreConfig, TodoService};
//!
//! let service = TodoService::new(StoreConfig::from_env());
//! service.initialize().await?;
//!
//! let task = service.add_todo("buy milk").await?;
//! let all = service.get_all_todos().await?; // newest first
//! ```
//!
//! ## Key types
//!
//! - [`Task`] — a todo item in its application shape (`bool` / `DateTime<Utc>`)
//! - [`TaskRecord`] — the same item in its storage shape (integer flag / RFC 3339 string)
//! - [`TaskUpdate`] — a tagged partial update; an empty update set is unrepresentable
//! - [`TaskStore`] — the capability trait every store backend satisfies

pub mod error;
pub mod registry;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod task;

pub use error::{FactoryError, ServiceError, StoreError};
pub use registry::{BackendRegistry, StoreConfig, DEFAULT_DATABASE_URL, SQLITE_BACKEND};
pub use service::TodoService;
pub use sqlite::SqliteTaskStore;
pub use store::{TaskStore, TaskUpdate};
pub use task::{Task, TaskRecord};

// Re-export for callers that construct stores or inspect errors directly
pub use sea_orm;
