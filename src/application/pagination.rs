//! Fixed-size pagination over an in-memory working set.
//!
//! List reads assemble a working result set first (cached or fetched, then
//! keyword-filtered) and slice it here. The page size is fixed at 3 to match
//! the catalog API contract.

use serde::Serialize;

pub const PAGE_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub pages: u32,
}

/// Slice `working` down to the requested page.
///
/// `pages` counts the whole working set, not the returned slice, so a
/// five-element set reports two pages. A page past the end yields an empty
/// item list with the totals intact; page 0 is treated as page 1.
pub fn paginate<T>(working: Vec<T>, page: u32) -> Page<T> {
    let page = page.max(1);
    let pages = working.len().div_ceil(PAGE_SIZE) as u32;
    let start = PAGE_SIZE * (page as usize - 1);
    let items: Vec<T> = working.into_iter().skip(start).take(PAGE_SIZE).collect();
    Page { items, page, pages }
}
