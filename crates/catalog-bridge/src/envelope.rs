//! Success-path wire shapes returned by the catalog service.

use serde::{Deserialize, Serialize};

/// Paging metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Number of records matching the query across all pages.
    pub total: u64,
    /// One-based index of the returned page.
    pub page: u64,
    /// Maximum number of records per page.
    pub limit: u64,
    /// Number of pages available for the query.
    pub total_pages: u64,
}

/// The envelope every successful response is wrapped in.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResponseEnvelope<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> ResponseEnvelope<T> {
    /// Consumes the envelope, keeping only the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}
