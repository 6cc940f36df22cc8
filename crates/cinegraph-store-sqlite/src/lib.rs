//! SQLite backend for Cinegraph.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Edge writes are single statements
//! (`INSERT OR IGNORE`, `ON CONFLICT DO UPDATE`) so concurrent requests rely
//! on the table constraints rather than on a read before the write.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
