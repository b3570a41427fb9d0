//! # Dorm Report Database Crate
//!
//! This crate is the single place that talks to PostgreSQL. It owns the table
//! definitions, the fixed report queries and the connection used to run them.
//!
//! ## Architectural Principles
//!
//! - **Static catalog:** The schema and the four report queries are plain data in
//!   a [`Catalog`] value built once at start-up and passed to the manager. No SQL
//!   text is assembled from user input; insert statements only ever name columns
//!   the catalog declares, and values are always bound as parameters.
//! - **One connection per run:** [`DatabaseManager`] holds at most one
//!   `PgConnection`. There is no pool and no retry.
//! - **Generic rows:** Query results are decoded into ordered `Record`s, with
//!   temporal values rendered as text so they can be exported unchanged.
//!
//! ## Public API
//!
//! - `Catalog`, `TableSchema`, `ReportQuery`: the static schema and report definitions.
//! - `connect_options`: turns configured credentials into driver options.
//! - `DatabaseManager`: connect, create tables, insert batches, run queries, disconnect.
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod connection;
pub mod error;
pub mod manager;
pub mod row;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::{Catalog, ColumnDef, ROOMS, ReportQuery, STUDENTS, TableSchema};
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use manager::DatabaseManager;
