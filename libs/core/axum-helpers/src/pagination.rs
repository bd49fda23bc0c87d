//! Pagination metadata calculator.
//!
//! List endpoints run a count query first, derive the metadata from the
//! caller-controlled `page`/`limit` parameters, then fetch the data page
//! with [`PaginationMeta::offset`]/[`PaginationMeta::limit`]. The
//! metadata is serialized verbatim into the response `meta` field.

use serde::Deserialize;
use serde::Serialize;
use utoipa::{IntoParams, ToSchema};

/// Page/limit query parameters accepted by list endpoints.
///
/// Both default to `0`, which [`PaginationMeta::compute`] maps to
/// "first page" and "endpoint default page size". Non-numeric values are
/// rejected by the `Query` extractor before they reach the calculator.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number; values below 1 are clamped to 1
    #[serde(default)]
    pub page: i64,
    /// Page size; values <= 0 fall back to the endpoint default
    #[serde(default)]
    pub limit: i64,
}

/// Pagination metadata for a list response.
///
/// Invariants established at construction:
/// - `page` is never below 1, whatever the caller sent
/// - `page_size` is the endpoint default whenever the caller sent <= 0
/// - `total_pages` = ceil(total_count / page_size), 0 when the
///   collection is empty
///
/// `page` is intentionally *not* clamped to `total_pages`: a page past
/// the end yields an empty data page, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    /// Items actually returned, set once the data page has been fetched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub total_count: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

/// Offset/limit pair handed to repositories for the data query.
///
/// Always derived from [`PaginationMeta`] so it reflects the clamped
/// page and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub offset: u64,
    pub limit: u64,
}

impl From<&PaginationMeta> for PageRequest {
    fn from(meta: &PaginationMeta) -> Self {
        Self {
            offset: meta.offset(),
            limit: meta.limit(),
        }
    }
}

impl PaginationMeta {
    /// Compute metadata from raw, caller-controlled input.
    ///
    /// `default_page_size` must be greater than zero; it is the
    /// endpoint's fallback when the caller sends no (or a non-positive)
    /// limit.
    pub fn compute(page: i64, page_size: i64, total_count: u64, default_page_size: u64) -> Self {
        let page_size = if page_size <= 0 {
            default_page_size
        } else {
            page_size as u64
        };

        let total_pages = if total_count == 0 {
            0
        } else {
            total_count.div_ceil(page_size)
        };

        let page = if page < 1 { 1 } else { page as u64 };

        Self {
            page,
            count: None,
            total_count,
            page_size,
            total_pages,
        }
    }

    /// Compute metadata straight from query parameters.
    pub fn from_query(query: &PageQuery, total_count: u64, default_page_size: u64) -> Self {
        Self::compute(query.page, query.limit, total_count, default_page_size)
    }

    /// Number of rows/documents to skip for the current page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }

    /// Number of rows/documents to fetch for the current page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// Record how many items the data query actually returned.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count as u64);
        self
    }
}
