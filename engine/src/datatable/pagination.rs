use serde::Serialize;
use std::fmt;

/// Pages on each side of the current page that always get a link.
pub const PAGE_WINDOW: usize = 2;

/// One entry of the pagination bar, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PageControl {
    Previous { disabled: bool },
    Page { number: usize, active: bool },
    Next { disabled: bool },
}

/// Number of pages needed for `len` rows; an empty set still has one page.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested page into `[1, total]`.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

/// Half-open row range `[start, end)` shown on `page`.
pub fn page_bounds(page: usize, page_size: usize, len: usize) -> (usize, usize) {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size).min(len);
    let end = start.saturating_add(page_size).min(len);
    (start, end)
}

/// Whether a page gets a link: first, last, and the window around `current`.
pub fn should_show_page(page: usize, current: usize, total: usize) -> bool {
    page == 1 || page == total || page.abs_diff(current) <= PAGE_WINDOW
}

/// Page numbers that get a link, ascending. Gaps are left to the renderer.
pub fn visible_pages(current: usize, total: usize) -> Vec<usize> {
    (1..=total)
        .filter(|page| should_show_page(*page, current, total))
        .collect()
}

/// Full control bar; empty when everything fits on a single page.
pub fn page_controls(current: usize, total: usize) -> Vec<PageControl> {
    if total <= 1 {
        return Vec::new();
    }

    let mut controls = Vec::with_capacity(2 * PAGE_WINDOW + 5);
    controls.push(PageControl::Previous {
        disabled: current <= 1,
    });
    controls.extend(
        visible_pages(current, total)
            .into_iter()
            .map(|number| PageControl::Page {
                number,
                active: number == current,
            }),
    );
    controls.push(PageControl::Next {
        disabled: current >= total,
    });
    controls
}

/// Summary shown under the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl PageInfo {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let (start, end) = page_bounds(page, page_size, total);
        if start == end {
            return Self {
                start: 0,
                end: 0,
                total,
            };
        }
        Self {
            start: start + 1,
            end,
            total,
        }
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.start, self.end, self.total
        )
    }
}
