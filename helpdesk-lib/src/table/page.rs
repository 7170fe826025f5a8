//! Pagination over an already filtered and sorted row set.
//!
//! Pages are zero-based. These functions are pure; resetting the page when
//! the result set changes is the controller's job.

/// Number of pages needed for `count` rows; `0` when there are no rows.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Clamps a requested page into `[0, total_pages - 1]`, or `0` if empty.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.min(total_pages.saturating_sub(1))
}

/// Returns the rows on `page`, or an empty slice past the end.
pub fn paginate<T>(rows: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(rows.len());
    &rows[start..end]
}
