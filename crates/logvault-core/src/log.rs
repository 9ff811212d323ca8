//! Log files and their listing view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A listing row: enough to render the file table without loading blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
  pub log_id:      Uuid,
  pub filename:    String,
  pub uploaded_at: DateTime<Utc>,
}

/// A full log file, blob included. Never updated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
  pub log_id:      Uuid,
  pub owner_id:    Uuid,
  pub filename:    String,
  pub blob:        Vec<u8>,
  pub uploaded_at: DateTime<Utc>,
}
