//! Fixed-size pagination with clamped page numbers.

use std::ops::Range;

/// `0` when `count == 0`, otherwise `ceil(count / page_size)`.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    if count == 0 {
        0
    } else {
        count.div_ceil(page_size.max(1))
    }
}

/// Current page over `count` items. Page numbers are 1-based; page is 0 only
/// when there are no items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    count: usize,
    page: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            count: 0,
            page: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.count, self.page_size)
    }

    /// Result area is hidden when there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Change the item count and go back to page 1 (or 0 when empty).
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.page = if count == 0 { 0 } else { 1 };
    }

    /// Clamp `page` into `[1, total_pages]`; returns the page actually selected.
    pub fn goto(&mut self, page: usize) -> usize {
        let total = self.total_pages();
        self.page = if total == 0 { 0 } else { page.clamp(1, total) };
        self.page
    }

    pub fn next(&mut self) -> usize {
        self.goto(self.page.saturating_add(1))
    }

    pub fn prev(&mut self) -> usize {
        self.goto(self.page.saturating_sub(1))
    }

    /// Index range of the current page within the item list.
    pub fn range(&self) -> Range<usize> {
        if self.page == 0 {
            return 0..0;
        }
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.count);
        start..end
    }

    /// `"page / total"`, `"0 / 0"` when empty.
    pub fn label(&self) -> String {
        format!("{} / {}", self.page, self.total_pages())
    }
}
