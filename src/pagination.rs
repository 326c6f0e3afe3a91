use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 24;

/// Page window for listing views. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total_items: usize,
    pub per_page: usize,
    pub current: usize,
}

impl Pagination {
    /// Clamps `current` into `1..=total_pages`; a zero `per_page` uses the default.
    pub fn new(total_items: usize, per_page: usize, current: usize) -> Self {
        let per_page = if per_page == 0 {
            DEFAULT_PER_PAGE
        } else {
            per_page
        };
        let mut pagination = Self {
            total_items,
            per_page,
            current: 1,
        };
        pagination.current = current.clamp(1, pagination.total_pages());
        pagination
    }

    /// At least one page, even when empty.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    pub fn offset(&self) -> usize {
        (self.current - 1) * self.per_page
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    /// Up to `size` page numbers around the current page.
    pub fn window(&self, size: usize) -> Vec<usize> {
        let total = self.total_pages();
        let size = size.clamp(1, total);
        let half = size / 2;
        let start = self
            .current
            .saturating_sub(half)
            .max(1)
            .min(total + 1 - size);
        (start..start + size).collect()
    }
}
