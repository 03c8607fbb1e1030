use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub const PRODUCTS_CREATED_TOTAL: &str = "products_created_total";
pub const PRODUCTS_DELETED_TOTAL: &str = "products_deleted_total";

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("metric registration failed: {0}")]
    Registration(#[from] prometheus::Error),

    #[error("metrics encoding failed: {0}")]
    Encoding(String),
}

/// Process-local Prometheus registry.
///
/// Each service owns one; tests build their own so counters never collide
/// with the global default registry.
#[derive(Clone, Default)]
pub struct MetricsRegistry {
    registry: Registry,
}

impl core::fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MetricsRegistry").finish_non_exhaustive()
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn render(&self) -> Result<String, MetricsError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| MetricsError::Encoding(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::Encoding(e.to_string()))
    }
}

/// Counters for successful catalog mutations.
#[derive(Debug, Clone)]
pub struct CatalogMetrics {
    products_created: IntCounter,
    products_deleted: IntCounter,
}

impl CatalogMetrics {
    pub fn register(registry: &MetricsRegistry) -> Result<Self, MetricsError> {
        let products_created =
            IntCounter::new(PRODUCTS_CREATED_TOTAL, "Total number of products created")?;
        let products_deleted =
            IntCounter::new(PRODUCTS_DELETED_TOTAL, "Total number of products deleted")?;

        registry.registry().register(Box::new(products_created.clone()))?;
        registry.registry().register(Box::new(products_deleted.clone()))?;

        Ok(Self {
            products_created,
            products_deleted,
        })
    }

    pub fn product_created(&self) {
        self.products_created.inc();
    }

    pub fn product_deleted(&self) {
        self.products_deleted.inc();
    }

    pub fn created_total(&self) -> u64 {
        self.products_created.get()
    }

    pub fn deleted_total(&self) -> u64 {
        self.products_deleted.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_exposition() {
        let registry = MetricsRegistry::new();
        let metrics = CatalogMetrics::register(&registry).unwrap();

        metrics.product_created();
        metrics.product_created();
        metrics.product_deleted();

        let text = registry.render().unwrap();
        assert!(text.contains("products_created_total 2"));
        assert!(text.contains("products_deleted_total 1"));
    }

    #[test]
    fn double_registration_is_rejected() {
        let registry = MetricsRegistry::new();
        CatalogMetrics::register(&registry).unwrap();

        assert!(matches!(
            CatalogMetrics::register(&registry),
            Err(MetricsError::Registration(_))
        ));
    }
}
