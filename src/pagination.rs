//! Pagination bounds.
//!
//! Pagination is opt-in: it applies when the request carries `paginate=true`
//! or names both `page` and `pageSize`. Everything else returns the full
//! matching set. Page and page size clamp to a minimum of 1.

use crate::models::ListQuery;

/// Default page size used when pagination is requested without an explicit
/// `pageSize`.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Whether the request asked for a paginated response.
#[must_use]
pub fn wants_pagination(params: &ListQuery) -> bool {
    params.paginate.unwrap_or(false) || (params.page.is_some() && params.page_size.is_some())
}

/// Resolve the effective `(page, page_size)` pair, clamping both to 1.
#[must_use]
pub fn resolve_page(params: &ListQuery, default_page_size: u64) -> (u64, u64) {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(default_page_size).max(1);
    (page, page_size)
}

/// Convert a resolved page into offset/limit bounds. Saturating arithmetic
/// keeps extreme query-supplied page numbers from overflowing.
#[must_use]
pub fn to_offset_limit(page: u64, page_size: u64) -> (u64, u64) {
    (page.saturating_sub(1).saturating_mul(page_size), page_size)
}
