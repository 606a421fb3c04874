//! SQLite persistence layer for review decisions.
//!
//! The on-disk store is the single source of truth; the in-process
//! cache inside [`ValidationStore`] is a read-through convenience, never
//! a second owner.

pub mod connection;
pub mod migrations;
pub mod queries;
pub mod store;

pub use connection::Database;
pub use store::ValidationStore;
