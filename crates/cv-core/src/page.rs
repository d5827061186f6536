//! Pagination windows over a displayed sequence.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// An offset/limit window.
///
/// # Examples
///
/// ```
/// use cv_core::Pagination;
///
/// let page = Pagination::for_page(2, 50);
/// assert_eq!(page.offset, 100);
/// assert_eq!(page.window(120), 100..120);
/// assert_eq!(page.window(80), 80..80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Index of the first item in the window.
    pub offset: usize,
    /// Maximum number of items in the window.
    pub limit: usize,
}

impl Pagination {
    /// Creates a window starting at `offset`.
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// The first page of size `limit`.
    #[must_use]
    pub const fn first(limit: usize) -> Self {
        Self::new(0, limit)
    }

    /// The zero-based page `index` of size `limit`.
    #[must_use]
    pub const fn for_page(index: usize, limit: usize) -> Self {
        Self::new(index.saturating_mul(limit), limit)
    }

    /// Zero-based index of the page this window starts.
    #[must_use]
    pub const fn page_index(&self) -> usize {
        if self.limit == 0 {
            0
        } else {
            self.offset / self.limit
        }
    }

    /// Number of pages needed to show `total` items.
    #[must_use]
    pub const fn page_count(&self, total: usize) -> usize {
        if self.limit == 0 {
            0
        } else {
            total.div_ceil(self.limit)
        }
    }

    /// The index range of this window clamped to a sequence of `len` items.
    #[must_use]
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = self.offset.saturating_add(self.limit).min(len);
        start..end
    }

    /// Returns the slice of `items` inside this window.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.window(items.len())]
    }
}
