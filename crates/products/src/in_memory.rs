//! In-memory product store for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::{Product, ProductId};

use crate::repository::{ProductRepository, RepositoryError};

#[derive(Debug, Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

/// In-memory catalog store with the same semantics as the Postgres one.
///
/// Ids are assigned sequentially starting at 1 and never reused.
#[derive(Debug)]
pub struct InMemoryProductRepository {
    state: RwLock<State>,
    healthy: AtomicBool,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self {
            state: RwLock::new(State::default()),
            healthy: AtomicBool::new(true),
        }
    }
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the result of [`ProductRepository::health`].
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, name: &str) -> Result<Product, RepositoryError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        state.last_id += 1;
        let id = ProductId::new(state.last_id)
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        let product = Product {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        state.rows.insert(id, product.clone());

        Ok(product)
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Product>, RepositoryError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(state
            .rows
            .values()
            .rev()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.rows.len() as u64)
    }

    async fn health(&self) -> Result<(), RepositoryError> {
        if self.healthy.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RepositoryError::Storage("store unavailable".to_string()))
        }
    }
}
