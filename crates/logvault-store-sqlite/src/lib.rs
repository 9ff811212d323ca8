//! SQLite backend for the Logvault credential and log stores.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Ownership scoping is enforced
//! in the SQL predicates, and the one-account-per-email invariant lives in a
//! UNIQUE constraint rather than application code.

mod encode;
mod error;
mod schema;
mod store;

pub use schema::MIGRATIONS;
pub use store::SqliteStore;
