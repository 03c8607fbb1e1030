/// Page size used when the caller asks for none (or a non-positive one).
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on a single page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A normalized page request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    /// Clamp raw query values: page < 1 becomes 1, limit < 1 becomes the
    /// default, limit above the maximum is capped.
    pub fn normalize(page: i64, limit: i64) -> Self {
        let page = if page < 1 { 1 } else { page.min(i64::from(u32::MAX)) as u32 };
        let limit = if limit < 1 {
            DEFAULT_PAGE_SIZE
        } else {
            limit.min(i64::from(MAX_PAGE_SIZE)) as u32
        };
        Self { page, limit }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}
