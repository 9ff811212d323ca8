//! [`SqliteStore`] — the SQLite implementation of [`CredentialStore`] and
//! [`LogStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use logvault_core::{
  Error, Result,
  credential::Credential,
  log::{LogEntry, LogFile},
  store::{CredentialStore, LogStore},
};

use crate::{
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid},
  error::{is_foreign_key_violation, is_unique_violation, store_err},
  schema,
};

// ─── Raw rows ────────────────────────────────────────────────────────────────

struct RawLogEntry {
  log_id:      String,
  filename:    String,
  uploaded_at: String,
}

impl RawLogEntry {
  fn into_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      log_id:      decode_uuid(&self.log_id)?,
      filename:    self.filename,
      uploaded_at: decode_dt(&self.uploaded_at)?,
    })
  }
}

struct RawLogFile {
  log_id:      String,
  owner_id:    String,
  filename:    String,
  blob:        Vec<u8>,
  uploaded_at: String,
}

impl RawLogFile {
  fn into_file(self) -> Result<LogFile> {
    Ok(LogFile {
      log_id:      decode_uuid(&self.log_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      filename:    self.filename,
      blob:        self.blob,
      uploaded_at: decode_dt(&self.uploaded_at)?,
    })
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Logvault store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All access
/// runs on the connection's dedicated thread via [`tokio_rusqlite`], so the
/// async runtime never blocks on SQLite.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and bring its schema current.
  ///
  /// Failure here is fatal to the caller: the process must not serve
  /// requests with the schema in an unknown state.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_owned();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(store_err)?;
    let store = Self { conn };
    store.ensure_schema_current().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(store_err)?;
    let store = Self { conn };
    store.ensure_schema_current().await?;
    Ok(store)
  }

  /// Apply per-connection pragmas and any pending migrations. Idempotent;
  /// a repeat call with no new migrations writes nothing.
  pub async fn ensure_schema_current(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        schema::ensure_schema_current(conn)?;
        Ok(())
      })
      .await
      .map_err(store_err)
  }

  /// The bookkeeping row written by the migration runner: current schema
  /// version and when it was applied. `None` only on a store that has never
  /// migrated (not reachable through [`SqliteStore::open`]).
  pub async fn schema_version(&self) -> Result<Option<(i64, DateTime<Utc>)>> {
    let row: Option<(i64, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT version, last_modified FROM schema_version",
              [],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await
      .map_err(store_err)?;

    row
      .map(|(version, at)| Ok((version, decode_dt(&at)?)))
      .transpose()
  }
}

// ─── CredentialStore impl ────────────────────────────────────────────────────

impl CredentialStore for SqliteStore {
  async fn exists(&self, email: &str) -> Result<bool> {
    let email = email.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users WHERE email = ?1",
              rusqlite::params![email],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await
      .map_err(store_err)
  }

  async fn lookup_user_id(&self, email: &str) -> Result<Option<Uuid>> {
    let email = email.to_owned();
    let id_str: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id FROM users WHERE email = ?1",
              rusqlite::params![email],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await
      .map_err(store_err)?;

    id_str.map(|s| decode_uuid(&s)).transpose()
  }

  async fn lookup_credential(&self, email: &str) -> Result<Option<Credential>> {
    let email = email.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT p.salt, p.password_hash
               FROM users u
               JOIN passwords p ON p.user_id = u.id
               WHERE u.email = ?1",
              rusqlite::params![email],
              |row| {
                Ok(Credential {
                  salt:          row.get(0)?,
                  password_hash: row.get(1)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(store_err)
  }

  async fn create_account(&self, email: &str) -> Result<Uuid> {
    let user_id = Uuid::new_v4();
    let id_str  = encode_uuid(user_id);
    let owned   = email.to_owned();

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, email) VALUES (?1, ?2)",
          rusqlite::params![id_str, owned],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(user_id),
      Err(e) if is_unique_violation(&e) => Err(Error::EmailTaken(email.to_owned())),
      Err(e) => Err(store_err(e)),
    }
  }

  async fn attach_credential(&self, user_id: Uuid, credential: Credential) -> Result<()> {
    let id_str = encode_uuid(user_id);

    let outcome = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO passwords (user_id, salt, password_hash) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, credential.salt, credential.password_hash],
        )?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(()),
      Err(e) if is_foreign_key_violation(&e) => Err(Error::UserNotFound(user_id)),
      Err(e) => Err(store_err(e)),
    }
  }

  async fn create_account_with_credential(
    &self,
    email: &str,
    credential: Credential,
  ) -> Result<Uuid> {
    let user_id = Uuid::new_v4();
    let id_str  = encode_uuid(user_id);
    let owned   = email.to_owned();

    // Single transaction: an interrupted registration leaves no user row
    // without its credential.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO users (id, email) VALUES (?1, ?2)",
          rusqlite::params![id_str, owned],
        )?;
        tx.execute(
          "INSERT INTO passwords (user_id, salt, password_hash) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, credential.salt, credential.password_hash],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await;

    match outcome {
      Ok(()) => Ok(user_id),
      Err(e) if is_unique_violation(&e) => Err(Error::EmailTaken(email.to_owned())),
      Err(e) => Err(store_err(e)),
    }
  }
}

// ─── LogStore impl ───────────────────────────────────────────────────────────

impl LogStore for SqliteStore {
  async fn list_logs(&self, owner_id: Uuid) -> Result<Vec<LogEntry>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawLogEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, filename, uploaded_at
           FROM logs
           WHERE user_id = ?1
           ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            Ok(RawLogEntry {
              log_id:      row.get(0)?,
              filename:    row.get(1)?,
              uploaded_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(store_err)?;

    raws.into_iter().map(RawLogEntry::into_entry).collect()
  }

  async fn create_log(&self, owner_id: Uuid, filename: &str, blob: Vec<u8>) -> Result<Uuid> {
    let log_id    = Uuid::new_v4();
    let id_str    = encode_uuid(log_id);
    let owner_str = encode_uuid(owner_id);
    let name      = filename.to_owned();
    let at_str    = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO logs (id, user_id, filename, blob, uploaded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, owner_str, name, blob, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(store_err)?;

    Ok(log_id)
  }

  async fn fetch_log(&self, owner_id: Uuid, log_id: Uuid) -> Result<Option<LogFile>> {
    let id_str    = encode_uuid(log_id);
    let owner_str = encode_uuid(owner_id);

    let raw: Option<RawLogFile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, user_id, filename, blob, uploaded_at
               FROM logs
               WHERE id = ?1 AND user_id = ?2",
              rusqlite::params![id_str, owner_str],
              |row| {
                Ok(RawLogFile {
                  log_id:      row.get(0)?,
                  owner_id:    row.get(1)?,
                  filename:    row.get(2)?,
                  blob:        row.get(3)?,
                  uploaded_at: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await
      .map_err(store_err)?;

    raw.map(RawLogFile::into_file).transpose()
  }

  async fn delete_log(&self, owner_id: Uuid, log_id: Uuid) -> Result<()> {
    let id_str    = encode_uuid(log_id);
    let owner_str = encode_uuid(owner_id);

    // Ownership sits in the predicate: a foreign or missing id matches
    // nothing, which is the intended silent no-op.
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM logs WHERE id = ?1 AND user_id = ?2",
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await
      .map_err(store_err)?;

    if affected == 0 {
      tracing::debug!(%log_id, "delete matched no owned row");
    }
    Ok(())
  }
}
