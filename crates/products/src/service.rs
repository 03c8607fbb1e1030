//! Catalog service: store mutation followed by a best-effort notification.
//!
//! ```text
//! create/delete → ProductRepository (must succeed) → EventPublisher (best effort)
//! ```
//!
//! Exactly one publish is attempted per successful mutation, synchronously and
//! after the write. A publish failure is logged and dropped: the mutation is
//! neither rolled back nor retried, and the caller still sees success.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, instrument};

use catalog_core::{DomainError, Product, ProductId};
use catalog_events::{EventPublisher, ProductEvent};
use catalog_observability::CatalogMetrics;

use crate::pagination::Page;
use crate::repository::{ProductRepository, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Validation or not-found; maps to a 4xx at the HTTP edge.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The store failed for reasons unrelated to the request.
    #[error("repository: {0}")]
    Repository(String),
}

impl From<RepositoryError> for CatalogError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CatalogError::Domain(DomainError::not_found()),
            RepositoryError::Storage(msg) => CatalogError::Repository(msg),
        }
    }
}

/// One page of products plus the total row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub items: Vec<Product>,
    pub page: Page,
    pub total: u64,
}

/// Operations exposed to the HTTP layer.
///
/// Object-safe so the router can hold an `Arc<dyn CatalogService>` regardless
/// of which store/publisher pair is wired in.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn create_product(&self, name: &str) -> Result<Product, CatalogError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError>;

    async fn list_products(&self, page: i64, limit: i64) -> Result<ProductListing, CatalogError>;

    async fn health(&self) -> Result<(), CatalogError>;
}

/// Default [`CatalogService`] over a storage capability and a publish capability.
#[derive(Debug)]
pub struct ProductService<R, P> {
    repo: R,
    publisher: P,
    metrics: CatalogMetrics,
}

impl<R, P> ProductService<R, P>
where
    R: ProductRepository,
    P: EventPublisher,
{
    pub fn new(repo: R, publisher: P, metrics: CatalogMetrics) -> Self {
        Self {
            repo,
            publisher,
            metrics,
        }
    }

    /// Hand the event to the publisher; failures stop here.
    async fn notify(&self, event: ProductEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            error!(
                event_type = %event.event_type,
                product_id = event.product_id.get(),
                error = %e,
                "publish product event failed"
            );
        }
    }
}

#[async_trait]
impl<R, P> CatalogService for ProductService<R, P>
where
    R: ProductRepository,
    P: EventPublisher,
{
    #[instrument(skip(self), err)]
    async fn create_product(&self, name: &str) -> Result<Product, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("product name is required").into());
        }

        let product = self.repo.create(name).await?;

        self.notify(ProductEvent::created(product.id, product.name.clone(), Utc::now()))
            .await;

        self.metrics.product_created();
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = id.get()), err)]
    async fn delete_product(&self, id: ProductId) -> Result<(), CatalogError> {
        self.repo.delete(id).await?;

        self.notify(ProductEvent::deleted(id, Utc::now())).await;

        self.metrics.product_deleted();
        Ok(())
    }

    async fn list_products(&self, page: i64, limit: i64) -> Result<ProductListing, CatalogError> {
        let page = Page::normalize(page, limit);

        let items = self.repo.list(page.limit, page.offset()).await?;
        let total = self.repo.count().await?;

        Ok(ProductListing { items, page, total })
    }

    async fn health(&self) -> Result<(), CatalogError> {
        self.repo.health().await.map_err(CatalogError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use catalog_events::{EventType, InMemoryPublisher};
    use catalog_observability::MetricsRegistry;
    use proptest::prelude::*;

    use super::*;
    use crate::InMemoryProductRepository;

    type TestService = ProductService<Arc<InMemoryProductRepository>, Arc<InMemoryPublisher>>;

    fn metrics() -> CatalogMetrics {
        CatalogMetrics::register(&MetricsRegistry::new()).unwrap()
    }

    fn service_with(publisher: InMemoryPublisher) -> (TestService, Arc<InMemoryPublisher>) {
        let publisher = Arc::new(publisher);
        let svc = ProductService::new(
            Arc::new(InMemoryProductRepository::new()),
            publisher.clone(),
            metrics(),
        );
        (svc, publisher)
    }

    /// Store double that fails every call and records list arguments.
    #[derive(Debug, Default)]
    struct BrokenRepo {
        list_args: Mutex<Vec<(u32, u64)>>,
    }

    #[async_trait]
    impl ProductRepository for BrokenRepo {
        async fn create(&self, _name: &str) -> Result<Product, RepositoryError> {
            Err(RepositoryError::Storage("db down".into()))
        }

        async fn delete(&self, _id: ProductId) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("db down".into()))
        }

        async fn list(&self, limit: u32, offset: u64) -> Result<Vec<Product>, RepositoryError> {
            self.list_args.lock().unwrap().push((limit, offset));
            Ok(vec![])
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Err(RepositoryError::Storage("db down".into()))
        }

        async fn health(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::Storage("db down".into()))
        }
    }

    #[tokio::test]
    async fn create_publishes_one_created_event() {
        let (svc, publisher) = service_with(InMemoryPublisher::new());

        let product = svc.create_product("  Phone ").await.unwrap();

        assert_eq!(product.name, "Phone");
        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::ProductCreated);
        assert_eq!(events[0].product_id, product.id);
        assert_eq!(events[0].name.as_deref(), Some("Phone"));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_without_event() {
        let (svc, publisher) = service_with(InMemoryPublisher::new());

        let err = svc.create_product("   ").await.unwrap_err();

        assert_eq!(err, CatalogError::Domain(DomainError::validation("product name is required")));
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn store_failure_on_create_is_surfaced_and_nothing_published() {
        let publisher = Arc::new(InMemoryPublisher::new());
        let svc = ProductService::new(BrokenRepo::default(), publisher.clone(), metrics());

        let err = svc.create_product("Phone").await.unwrap_err();

        assert!(matches!(err, CatalogError::Repository(_)));
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn delete_publishes_one_deleted_event_without_name() {
        let (svc, publisher) = service_with(InMemoryPublisher::new());
        let product = svc.create_product("Phone").await.unwrap();

        svc.delete_product(product.id).await.unwrap();

        let events = publisher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, EventType::ProductDeleted);
        assert_eq!(events[1].product_id, product.id);
        assert_eq!(events[1].name, None);
    }

    #[tokio::test]
    async fn delete_of_missing_product_is_not_found_and_silent() {
        let (svc, publisher) = service_with(InMemoryPublisher::new());

        let err = svc.delete_product(ProductId::new(999).unwrap()).await.unwrap_err();

        assert_eq!(err, CatalogError::Domain(DomainError::NotFound));
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn publish_failure_does_not_fail_the_mutation() {
        let registry = MetricsRegistry::new();
        let metrics = CatalogMetrics::register(&registry).unwrap();
        let publisher = Arc::new(InMemoryPublisher::failing());
        let svc = ProductService::new(InMemoryProductRepository::new(), publisher.clone(), metrics.clone());

        let product = svc.create_product("Widget").await.unwrap();
        svc.delete_product(product.id).await.unwrap();

        assert_eq!(product.name, "Widget");
        assert_eq!(publisher.events().len(), 2);
        assert_eq!(metrics.created_total(), 1);
        assert_eq!(metrics.deleted_total(), 1);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_publish_is_logged_once_at_error() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (svc, _publisher) = service_with(InMemoryPublisher::failing());
        svc.create_product("Widget").await.unwrap();

        let out = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out.lines().count(), 1, "{out}");
        assert!(out.contains("publish product event failed"));
        assert!(out.contains("broker unavailable"));
    }

    #[tokio::test]
    async fn list_normalizes_paging_before_hitting_the_store() {
        let repo = Arc::new(BrokenRepo::default());
        let svc = ProductService::new(repo.clone(), InMemoryPublisher::new(), metrics());

        // count() fails, but list() has already recorded its arguments.
        let _ = svc.list_products(2, 2).await;
        let _ = svc.list_products(-1, 0).await;
        let _ = svc.list_products(1, 500).await;

        assert_eq!(
            *repo.list_args.lock().unwrap(),
            vec![(2, 2), (10, 0), (100, 0)]
        );
    }

    #[tokio::test]
    async fn list_returns_page_and_total() {
        let (svc, _publisher) = service_with(InMemoryPublisher::new());
        for name in ["A", "B", "C", "D", "E"] {
            svc.create_product(name).await.unwrap();
        }

        let listing = svc.list_products(2, 2).await.unwrap();

        let names: Vec<_> = listing.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
        assert_eq!(listing.total, 5);
        assert_eq!(listing.page, Page { page: 2, limit: 2 });
    }

    proptest! {
        #[test]
        fn created_event_name_is_the_trimmed_input(
            core_name in "[A-Za-z0-9][A-Za-z0-9 ]{0,30}[A-Za-z0-9]|[A-Za-z0-9]",
            lead in " {0,3}",
            trail in " {0,3}",
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (svc, publisher) = service_with(InMemoryPublisher::new());

            let input = format!("{lead}{core_name}{trail}");
            let product = rt.block_on(svc.create_product(&input)).unwrap();

            let events = publisher.events();
            prop_assert_eq!(events.len(), 1);
            prop_assert_eq!(events[0].event_type, EventType::ProductCreated);
            prop_assert_eq!(events[0].name.as_deref(), Some(core_name.as_str()));
            prop_assert_eq!(events[0].product_id, product.id);
        }
    }
}
