//! `catalog-core` — product catalog domain foundation.
//!
//! This crate contains **pure domain** primitives shared by the API and the
//! notifications consumer (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod product;

pub use error::DomainError;
pub use id::ProductId;
pub use product::Product;
