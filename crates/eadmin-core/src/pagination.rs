//! Pagination utilities for list endpoints.
//!
//! Every list endpoint accepts `?page=&max=`:
//!
//! - `page`: 1-indexed page number (default 1, minimum 1)
//! - `max`: items per page (default 10, clamped to [1, 100])
//!
//! Empty or unparseable values fall back to the defaults instead of
//! rejecting the request.
//!
//! Responses flatten a [`PageMeta`] next to the item array:
//!
//! ```json
//! {
//!   "courses": [...],
//!   "page": 2,
//!   "totalItems": 31,
//!   "totalPages": 4
//! }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_lenient_i64;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for paginated lists.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub max: Option<i64>,
}

impl PageParams {
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    #[must_use]
    pub fn limit(&self) -> i64 {
        self.max
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(MAX_PAGE_SIZE)
    }

    /// Row offset for the current page. Saturates instead of overflowing,
    /// so an absurd page number yields an empty page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Metadata flattened into every paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageMeta {
    #[must_use]
    pub fn new(page: i64, limit: i64, total_items: i64) -> Self {
        let total_pages = if limit > 0 {
            (total_items + limit - 1) / limit
        } else {
            0
        };

        Self {
            page,
            total_items,
            total_pages,
        }
    }
}
