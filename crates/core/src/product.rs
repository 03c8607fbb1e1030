use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ProductId;

/// A catalog product as persisted by the store.
///
/// `created_at` is the database write time; it is never reused as an event
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}
