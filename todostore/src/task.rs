//! The task model and its two representations.
//!
//! A task exists in two shapes that must round-trip losslessly:
//!
//! - [`Task`] — the application shape: native `bool` and [`DateTime<Utc>`].
//! - [`TaskRecord`] — the storage shape: integer 0/1 flag and an RFC 3339
//!   timestamp string, exactly as the `todos` table holds it.
//!
//! Timestamps are encoded at nanosecond precision so that lexicographic order
//! of the stored strings equals chronological order, and decoding yields the
//! identical instant.

use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A todo item in its application shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier, assigned at insert time, immutable, never reused.
    pub id: String,
    /// Human-readable text. Invariant: never empty or whitespace-only once stored.
    pub text: String,
    pub completed: bool,
    /// Fixed at creation; the sole sort key for listing (newest first).
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// A todo item in its storage shape, one field per `todos` column.
///
/// Derives [`FromQueryResult`] so SELECTs map straight into it; the SQL
/// aliases the `createdAt` column to `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct TaskRecord {
    pub id: String,
    pub text: String,
    pub completed: i32,
    pub created_at: String,
}

impl Task {
    /// Encode into the storage shape.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id.clone(),
            text: self.text.clone(),
            completed: i32::from(self.completed),
            created_at: encode_timestamp(self.created_at),
        }
    }
}

impl TaskRecord {
    /// Decode into the application shape.
    ///
    /// Any nonzero flag decodes as completed. An unparseable timestamp is a
    /// [`StoreError::Decode`], never a silent default.
    pub fn into_task(self) -> Result<Task, StoreError> {
        let created_at = decode_timestamp(&self.created_at).map_err(|err| StoreError::Decode {
            id: self.id.clone(),
            reason: format!("bad createdAt {:?}: {err}", self.created_at),
        })?;
        Ok(Task {
            id: self.id,
            text: self.text,
            completed: self.completed != 0,
            created_at,
        })
    }
}

/// Encode an instant as an RFC 3339 string with nanosecond precision.
pub fn encode_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a stored RFC 3339 timestamp back into the identical instant.
pub fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc))
}
