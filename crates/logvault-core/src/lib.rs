//! Core types and trait definitions for the Logvault file locker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod credential;
pub mod error;
pub mod log;
pub mod store;
pub mod user;
pub mod validation;

pub use error::{Error, Result};
