use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pagination failures detected before any storage call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("limit must be a non-negative integer (got {0})")]
    NegativeLimit(i64),

    #[error("offset must be a non-negative integer (got {0})")]
    NegativeOffset(i64),
}

/// Raw paging parameters as they arrive from a caller. Both are optional.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageParams {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    /// Validate and fill in defaults. `default_limit` comes from configuration.
    pub fn resolve(self, default_limit: u64) -> Result<PageRequest, PageError> {
        let limit = match self.limit {
            None => default_limit,
            Some(l) if l < 0 => return Err(PageError::NegativeLimit(l)),
            Some(l) => l as u64,
        };
        let offset = match self.offset {
            None => 0,
            Some(o) if o < 0 => return Err(PageError::NegativeOffset(o)),
            Some(o) => o as u64,
        };
        Ok(PageRequest { limit, offset })
    }
}

/// A validated window over an id-ordered collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub limit: u64,
    pub offset: u64,
}

impl PageRequest {
    pub fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// A zero limit is a valid request whose answer is always empty.
    pub fn is_empty(&self) -> bool {
        self.limit == 0
    }
}

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub limit: u64,
    pub offset: u64,
    /// Rows matching the filters, ignoring limit/offset.
    pub total: u64,
}

#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page_info: PageInfo) -> Self {
        Self { items, page_info }
    }

    /// Page with no rows for the requested window.
    pub fn empty(req: PageRequest, total: u64) -> Self {
        Self {
            items: Vec::new(),
            page_info: PageInfo {
                limit: req.limit,
                offset: req.offset,
                total,
            },
        }
    }

    /// Number of rows actually returned.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Map items while preserving page_info (Domain->DTO mapping convenience)
    pub fn map_items<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_info: self.page_info,
        }
    }
}
