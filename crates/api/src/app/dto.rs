use serde::{Deserialize, Serialize};

use catalog_core::Product;
use catalog_products::ProductListing;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
}

/// Raw list query. Values that are absent or not integers fall back to the
/// paging defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        parse_or_zero(self.page.as_deref())
    }

    pub fn limit(&self) -> i64 {
        parse_or_zero(self.limit.as_deref())
    }
}

fn parse_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub items: Vec<Product>,
    pub pagination: PaginationMeta,
}

impl From<ProductListing> for ListProductsResponse {
    fn from(listing: ProductListing) -> Self {
        Self {
            items: listing.items,
            pagination: PaginationMeta {
                page: listing.page.page,
                limit: listing.page.limit,
                total: listing.total,
            },
        }
    }
}
