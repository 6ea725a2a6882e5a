//! Error taxonomy, one enum per layer.
//!
//! "Not found" is deliberately absent: it is a normal outcome, represented as
//! `Option::None` (or `false` for deletes) everywhere, never as an error.

use sea_orm::DbErr;
use thiserror::Error;

/// Failures at the record-store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing file could not be opened or created, or the schema could
    /// not be set up.
    #[error("failed to open the task store: {0}")]
    Connection(#[source] DbErr),

    /// A read against the store failed.
    #[error("failed to read from the task store: {0}")]
    Query(#[source] DbErr),

    /// An insert, update, or delete failed at the storage layer.
    #[error("failed to write to the task store: {0}")]
    Write(#[source] DbErr),

    /// A stored row could not be decoded into a [`Task`](crate::Task)
    /// (e.g. an unparseable timestamp).
    #[error("stored task {id} is corrupt: {reason}")]
    Decode { id: String, reason: String },

    /// An operation was attempted on a store whose connection is closed or
    /// was never opened.
    #[error("task store is not connected")]
    NotConnected,
}

/// Failures constructing a store from configuration.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// The configured backend tag has no registered builder. Surfaced at
    /// configuration time, before any store call path is entered.
    #[error("unknown store backend {0:?}")]
    UnknownBackend(String),

    /// The store was built but failed to initialize.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures surfaced by [`TodoService`](crate::TodoService).
///
/// Storage-layer detail is logged at the service boundary and never carried
/// here; [`OperationFailed`](ServiceError::OperationFailed) holds only a
/// stable, user-safe message.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Caller-supplied input was rejected (empty or whitespace-only text,
    /// or an empty update set).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An operation was attempted before
    /// [`initialize`](crate::TodoService::initialize) succeeded. A programmer
    /// error, never auto-corrected mid-call.
    #[error("todo service is not initialized; call initialize() first")]
    NotInitialized,

    /// The underlying store failed. The cause is in the log, not here.
    #[error("{0}")]
    OperationFailed(&'static str),
}
