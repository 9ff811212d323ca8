//! Mapping from SQLite failures to the core error taxonomy.

use logvault_core::Error;

/// Default mapping: anything the store cannot classify is an infrastructure
/// failure.
pub(crate) fn store_err(e: tokio_rusqlite::Error) -> Error {
  Error::Unavailable(Box::new(e))
}

/// Row contents that cannot be decoded count as store corruption.
pub(crate) fn corrupt(e: impl std::error::Error + Send + Sync + 'static) -> Error {
  Error::Unavailable(Box::new(e))
}

pub(crate) fn is_unique_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

pub(crate) fn is_foreign_key_violation(e: &tokio_rusqlite::Error) -> bool {
  matches!(
    e,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(f, _))
      if f.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
  )
}
