//! The record-store capability trait and the partial-update shape.
//!
//! Every backend — the embedded SQLite file today, anything network-backed
//! later — satisfies the same [`TaskStore`] contract. Stores persist and
//! retrieve; they do not validate text (that is the service's job) and they
//! do not treat a missing row as an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::task::Task;

/// A partial update to a stored task.
///
/// Tagged variants instead of a bag of optionals: each variant resolves to a
/// fixed UPDATE statement, and the empty update set is unrepresentable.
/// Callers holding two optionals go through [`TaskUpdate::from_parts`] and
/// treat `None` as a caller error, distinct from "not found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    Text(String),
    Completed(bool),
    Both { text: String, completed: bool },
}

impl TaskUpdate {
    /// Build an update from whichever fields are present.
    ///
    /// Returns `None` when both are absent. Text is taken as-is; trimming and
    /// non-empty validation belong to the service layer.
    pub fn from_parts(text: Option<String>, completed: Option<bool>) -> Option<TaskUpdate> {
        match (text, completed) {
            (Some(text), Some(completed)) => Some(TaskUpdate::Both { text, completed }),
            (Some(text), None) => Some(TaskUpdate::Text(text)),
            (None, Some(completed)) => Some(TaskUpdate::Completed(completed)),
            (None, None) => None,
        }
    }
}

/// The durable store of tasks.
///
/// All operations are async and serialized by the backing engine's own
/// locking; implementations add no mutual exclusion beyond connection
/// lifecycle. "Not found" is `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Open or create the backing store and ensure the `todos` table exists.
    ///
    /// Idempotent: a second call after success is a no-op. Fails with
    /// [`StoreError::Connection`] when the backing file cannot be opened.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Every stored task, ordered by creation time descending (newest first).
    /// An empty table yields an empty vec, not an error.
    async fn list_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Persist a new task, generating a fresh unique id, and return it in
    /// full. Never silently drops a write.
    async fn insert(
        &self,
        text: &str,
        completed: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Task, StoreError>;

    /// Apply a partial update to the task with the given id and return the
    /// stored result, or `Ok(None)` when no row matches.
    async fn update(&self, id: &str, update: &TaskUpdate) -> Result<Option<Task>, StoreError>;

    /// Remove the task with the given id. Returns whether a row was removed.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// Remove every completed task and return the count removed (may be 0).
    async fn delete_completed(&self) -> Result<u64, StoreError>;

    /// Release the backing resource. Idempotent, safe on a never-opened store.
    async fn close(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_builds_the_matching_variant() {
        assert_eq!(
            TaskUpdate::from_parts(Some("x".into()), None),
            Some(TaskUpdate::Text("x".into()))
        );
        assert_eq!(
            TaskUpdate::from_parts(None, Some(true)),
            Some(TaskUpdate::Completed(true))
        );
        assert_eq!(
            TaskUpdate::from_parts(Some("x".into()), Some(false)),
            Some(TaskUpdate::Both {
                text: "x".into(),
                completed: false
            })
        );
    }

    #[test]
    fn from_parts_rejects_the_empty_update_set() {
        assert_eq!(TaskUpdate::from_parts(None, None), None);
    }
}
