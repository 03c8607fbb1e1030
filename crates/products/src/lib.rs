//! Products domain module: catalog service and its storage capability.
//!
//! The service is the producer side of the notification path. It performs a
//! store mutation and then attempts exactly one event publish, absorbing any
//! publish failure.

pub mod in_memory;
pub mod pagination;
pub mod repository;
pub mod service;

pub use in_memory::InMemoryProductRepository;
pub use pagination::{Page, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repository::{ProductRepository, RepositoryError};
pub use service::{CatalogError, CatalogService, ProductListing, ProductService};
