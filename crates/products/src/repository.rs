use std::sync::Arc;

use async_trait::async_trait;

use catalog_core::{Product, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No row matched the requested identity.
    #[error("product not found")]
    NotFound,

    /// Any storage-level failure (connection, query, decode).
    #[error("storage error: {0}")]
    Storage(String),
}

/// Capability: persist and retrieve catalog products.
///
/// The service depends only on this trait, so tests can substitute
/// [`crate::InMemoryProductRepository`] or a hand-written double.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product; the store assigns the id and creation time.
    async fn create(&self, name: &str) -> Result<Product, RepositoryError>;

    /// Delete by id. Returns [`RepositoryError::NotFound`] when nothing was removed.
    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;

    /// Products ordered by id, newest first.
    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Product>, RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Liveness probe for the backing store.
    async fn health(&self) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<R> ProductRepository for Arc<R>
where
    R: ProductRepository + ?Sized,
{
    async fn create(&self, name: &str) -> Result<Product, RepositoryError> {
        (**self).create(name).await
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        (**self).delete(id).await
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Product>, RepositoryError> {
        (**self).list(limit, offset).await
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        (**self).count().await
    }

    async fn health(&self) -> Result<(), RepositoryError> {
        (**self).health().await
    }
}
