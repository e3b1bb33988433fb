use std::ops::Range;

/// Handles page arithmetic over the rows of the open group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total_rows: usize,
    rows_per_page: usize,
}

impl Paginator {
    /// Create a new Paginator; a zero page size is treated as one row per page
    pub fn new(total_rows: usize, rows_per_page: usize) -> Self {
        Self {
            total_rows,
            rows_per_page: rows_per_page.max(1),
        }
    }

    /// Number of pages, zero when there are no rows
    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.rows_per_page)
    }

    /// Row range shown on `page` (0-based), clamped to the rows
    pub fn page_range(&self, page: usize) -> Range<usize> {
        let start = (page * self.rows_per_page).min(self.total_rows);
        let end = (start + self.rows_per_page).min(self.total_rows);
        start..end
    }

    /// Calculate the next page index
    pub fn next(&self, page: usize) -> Option<usize> {
        if page + 1 < self.page_count() {
            Some(page + 1)
        } else {
            None
        }
    }

    /// Calculate the previous page index
    pub fn prev(&self, page: usize) -> Option<usize> {
        if page > 0 && page < self.page_count() {
            Some(page - 1)
        } else {
            None
        }
    }

    pub fn is_last(&self, page: usize) -> bool {
        self.page_count() == 0 || page + 1 >= self.page_count()
    }
}
