//! Relational product storage.

pub mod postgres;

pub use postgres::{connect_pool, run_migrations, PostgresProductRepository};
