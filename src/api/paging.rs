//! Client-side paging of the filtered case list

use std::ops::Range;

/// Number of pages needed for `len` items (0 for an empty list)
pub fn page_count(len: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    len.div_ceil(per_page)
}

/// Index range of a 1-based page, clamped to the list
pub fn page_bounds(len: usize, page: usize, per_page: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(per_page).min(len);
    let end = start.saturating_add(per_page).min(len);
    start..end
}

/// Keep the current page valid after the list shrinks
pub fn clamp_page(page: usize, len: usize, per_page: usize) -> usize {
    page.clamp(1, page_count(len, per_page).max(1))
}

/// Parse the "jump to page" box. Only pages that exist are accepted.
pub fn parse_jump(input: &str, total_pages: usize) -> Option<usize> {
    let page = input.trim().parse::<usize>().ok()?;
    (1..=total_pages).contains(&page).then_some(page)
}
