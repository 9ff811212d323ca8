//! Schema lifecycle for the SQLite store.
//!
//! Migrations are an explicit, monotonically-numbered list applied
//! idempotently and non-destructively: each entry runs only while
//! `PRAGMA user_version` is below its number, inside one transaction
//! together with the version bump and the `schema_version` bookkeeping row.
//! Re-running with no new entries issues no DDL at all.

/// A single numbered schema change.
pub struct Migration {
  pub version: i64,
  pub ddl:     &'static str,
}

/// All migrations, ascending. Never reorder or edit a shipped entry; append
/// a new one instead.
pub const MIGRATIONS: &[Migration] = &[Migration {
  version: 1,
  ddl: "
CREATE TABLE users (
    id    TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE
);

-- One credential per user, created at registration and never rotated here.
CREATE TABLE passwords (
    user_id       TEXT NOT NULL UNIQUE REFERENCES users(id),
    salt          BLOB NOT NULL,
    password_hash BLOB NOT NULL
);

CREATE TABLE logs (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL REFERENCES users(id),
    filename    TEXT NOT NULL,
    blob        BLOB NOT NULL,
    uploaded_at TEXT NOT NULL
);

CREATE INDEX logs_owner_idx ON logs(user_id);

-- Singleton bookkeeping row, replaced on every migration apply.
CREATE TABLE schema_version (
    version       INTEGER NOT NULL,
    last_modified TEXT    NOT NULL
);
",
}];

/// Per-connection setup plus any pending migrations. Safe to call
/// repeatedly; cheap when the schema is already current.
pub fn ensure_schema_current(conn: &mut rusqlite::Connection) -> rusqlite::Result<()> {
  conn.execute_batch(
    "PRAGMA journal_mode = WAL;
     PRAGMA foreign_keys = ON;",
  )?;

  let mut current: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

  for migration in MIGRATIONS {
    if migration.version <= current {
      continue;
    }

    let tx = conn.transaction()?;
    tx.execute_batch(migration.ddl)?;
    tx.execute("DELETE FROM schema_version", [])?;
    tx.execute(
      "INSERT INTO schema_version (version, last_modified) VALUES (?1, ?2)",
      rusqlite::params![
        migration.version,
        chrono::Utc::now().to_rfc3339()
      ],
    )?;
    tx.pragma_update(None, "user_version", migration.version)?;
    tx.commit()?;

    tracing::info!(version = migration.version, "applied schema migration");
    current = migration.version;
  }

  Ok(())
}
