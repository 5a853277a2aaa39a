//! Page arithmetic.
//!
//! [`PageSpec`] holds a page index and a non-zero page size. Every
//! navigation method takes the current match count and returns a spec that
//! is in range for it, so callers never see an out-of-range page.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeekerError};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [10, 20, 30, 40, 50];

/// Number of pages needed for `total` items. Never less than one.
pub fn total_pages(total: usize, size: NonZeroUsize) -> usize {
    total.div_ceil(size.get()).max(1)
}

/// Current page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSpec {
    index: usize,
    size: NonZeroUsize,
}

impl Default for PageSpec {
    fn default() -> Self {
        PageSpec {
            index: 0,
            size: NonZeroUsize::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl PageSpec {
    /// Creates a page spec. A zero size is rejected.
    pub fn new(index: usize, size: usize) -> Result<Self> {
        let size = NonZeroUsize::new(size).ok_or(SeekerError::InvalidPageSize(size))?;
        Ok(PageSpec { index, size })
    }

    /// First page of the given size.
    pub fn first_of(size: NonZeroUsize) -> Self {
        PageSpec { index: 0, size }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Position of the first item of this page.
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size.get())
    }

    /// Pulls the index back into range for `total` items.
    pub fn clamp(self, total: usize) -> Self {
        let last = total_pages(total, self.size) - 1;
        PageSpec {
            index: self.index.min(last),
            size: self.size,
        }
    }

    pub fn first(self) -> Self {
        PageSpec::first_of(self.size)
    }

    pub fn last(self, total: usize) -> Self {
        PageSpec {
            index: total_pages(total, self.size) - 1,
            size: self.size,
        }
    }

    /// The following page, or this one if it is the last.
    pub fn next(self, total: usize) -> Self {
        let page = self.clamp(total);
        if page.can_next(total) {
            PageSpec {
                index: page.index + 1,
                size: page.size,
            }
        } else {
            page
        }
    }

    /// The preceding page, or this one if it is the first.
    pub fn previous(self, total: usize) -> Self {
        let page = self.clamp(total);
        PageSpec {
            index: page.index.saturating_sub(1),
            size: page.size,
        }
    }

    /// Jumps to `index`, clamped.
    pub fn at(self, index: usize, total: usize) -> Self {
        PageSpec {
            index,
            size: self.size,
        }
        .clamp(total)
    }

    /// Changes the page size, keeping the first item of the current page
    /// on screen.
    pub fn resize(self, size: NonZeroUsize) -> Self {
        PageSpec {
            index: self.offset() / size.get(),
            size,
        }
    }

    pub fn can_previous(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self, total: usize) -> bool {
        self.index < total_pages(total, self.size) - 1
    }
}

/// One page of a result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_count: usize,
    pub total_pages: usize,
    pub page_index: usize,
    pub page_size: usize,
}

/// Slices `items` to the page described by `page`, clamping the index.
///
/// ```
/// use dernek_seeker::{paginate, PageSpec};
///
/// let rows: Vec<u32> = (1..=26).collect();
/// let page = paginate(&rows, PageSpec::new(7, 10).unwrap());
/// assert_eq!(page.total_pages, 3);
/// assert_eq!(page.page_index, 2);
/// assert_eq!(page.items, &[21, 22, 23, 24, 25, 26]);
/// ```
pub fn paginate<T>(items: &[T], page: PageSpec) -> Page<'_, T> {
    let total = items.len();
    let page = page.clamp(total);
    let start = page.offset().min(total);
    let end = start.saturating_add(page.size.get()).min(total);
    Page {
        items: &items[start..end],
        total_count: total,
        total_pages: total_pages(total, page.size),
        page_index: page.index,
        page_size: page.size.get(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn total_pages_minimum_one() {
        assert_eq!(total_pages(0, size(10)), 1);
        assert_eq!(total_pages(10, size(10)), 1);
        assert_eq!(total_pages(11, size(10)), 2);
        assert_eq!(total_pages(26, size(10)), 3);
    }

    #[test]
    fn zero_size_rejected() {
        assert!(matches!(PageSpec::new(0, 0), Err(SeekerError::InvalidPageSize(0))));
        let parsed: std::result::Result<PageSpec, _> = serde_json::from_str(r#"{"index":0,"size":0}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn next_on_last_page_is_noop() {
        let last = PageSpec::new(2, 10).unwrap();
        assert_eq!(last.next(26), last);
        assert_eq!(last.next(26).next(26).next(26), last);
    }

    #[test]
    fn far_out_of_range_index_never_overflows() {
        let far = PageSpec::new(usize::MAX, 10).unwrap();
        assert!(!far.can_next(5));
        assert!(far.can_previous());
        assert_eq!(far.next(5).index(), 0);
        assert_eq!(far.previous(26).index(), 1);
        assert_eq!(far.clamp(26).index(), 2);
        let page = paginate(&[1, 2, 3], far);
        assert_eq!(page.page_index, 0);
        assert_eq!(page.items, &[1, 2, 3]);
    }

    #[test]
    fn previous_on_first_page_is_noop() {
        let first = PageSpec::default();
        assert_eq!(first.previous(26), first);
        assert_eq!(first.previous(0).previous(0), first);
    }

    #[test]
    fn navigation() {
        let page = PageSpec::default();
        assert_eq!(page.next(26).index(), 1);
        assert_eq!(page.last(26).index(), 2);
        assert_eq!(page.last(26).first().index(), 0);
        assert_eq!(page.at(99, 26).index(), 2);
        assert!(!page.can_previous());
        assert!(page.can_next(26));
        assert!(!page.last(26).can_next(26));
    }

    #[test]
    fn clamp_after_shrink() {
        let page = PageSpec::new(5, 10).unwrap().clamp(12);
        assert_eq!(page.index(), 1);
        assert_eq!(PageSpec::new(5, 10).unwrap().clamp(0).index(), 0);
    }

    #[test]
    fn resize_keeps_first_item_visible() {
        // Page 3 of size 10 starts at item 30.
        let page = PageSpec::new(3, 10).unwrap().resize(size(20));
        assert_eq!(page.index(), 1);
        assert!(page.offset() <= 30 && 30 < page.offset() + 20);

        let page = PageSpec::new(1, 50).unwrap().resize(size(10));
        assert_eq!(page.index(), 5);
    }

    #[test]
    fn paginate_slices() {
        let rows: Vec<u32> = (0..26).collect();
        let page = paginate(&rows, PageSpec::new(1, 10).unwrap());
        assert_eq!(page.items, &rows[10..20]);
        assert_eq!(page.total_count, 26);
        assert_eq!(page.page_size, 10);
    }

    #[test]
    fn paginate_empty() {
        let rows: Vec<u32> = Vec::new();
        let page = paginate(&rows, PageSpec::new(4, 10).unwrap());
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page_index, 0);
    }
}
