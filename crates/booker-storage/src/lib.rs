//! Booker Storage — `PostgreSQL` implementation of the storage gateway.

pub mod pg_storage;

pub use pg_storage::PgStorage;
