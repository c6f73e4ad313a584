//! Program request/response types and pagination metadata.

use serde::Serialize;

use bounty_storage::Program;

/// Pagination metadata returned with every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    /// Derives page metadata from the requested window and the row count.
    ///
    /// An empty table has zero pages and no neighbours in either direction,
    /// whatever page was asked for.
    pub fn compute(page: u64, limit: u32, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(limit.max(1)));
        Pagination {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: total_count > 0 && page > 1,
        }
    }
}

/// Response for `GET /programs`.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramListResponse {
    pub programs: Vec<Program>,
    pub pagination: Pagination,
}

/// Response carrying a single program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramResponse {
    pub program: Program,
}
