use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use crate::error::LedgerError;

/// Rows per page. Only the sizes offered by the list views are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    TwentyFive,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::TwentyFive];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = LedgerError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.get() == value)
            .ok_or(LedgerError::InvalidPageSize(value))
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Page transitions offered by the pager controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNav {
    First,
    Prev,
    Next,
    Last,
    Goto(usize),
}

/// The visible window of a paginated list.
///
/// `current` is always within `1..=total_pages`, and `start..end` is always a
/// valid range into a list of `total` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total: usize,
    pub size: usize,
    pub total_pages: usize,
    pub current: usize,
    pub start: usize,
    pub end: usize,
}

impl PageWindow {
    /// Clamp `requested` into range and compute the slice bounds.
    pub fn compute(total: usize, size: PageSize, requested: usize) -> Self {
        let size = size.get();
        let total_pages = total.div_ceil(size).max(1);
        let current = requested.clamp(1, total_pages);
        let start = (current - 1) * size;
        let end = (start + size).min(total);
        Self {
            total,
            size,
            total_pages,
            current,
            start,
            end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        items.get(self.range()).unwrap_or(&[])
    }

    /// The page a transition lands on.
    pub fn target(&self, nav: PageNav) -> usize {
        match nav {
            PageNav::First => 1,
            PageNav::Prev => self.current.saturating_sub(1).max(1),
            PageNav::Next => (self.current + 1).min(self.total_pages),
            PageNav::Last => self.total_pages,
            PageNav::Goto(page) => page.clamp(1, self.total_pages),
        }
    }

    /// A transition is enabled only when it would move off the current page.
    pub fn can(&self, nav: PageNav) -> bool {
        self.target(nav) != self.current
    }
}

impl fmt::Display for PageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "Page 1 of 1 (no records)");
        }
        write!(
            f,
            "Page {} of {} (showing {}-{} of {})",
            self.current,
            self.total_pages,
            self.start + 1,
            self.end,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_only_accepts_offered_sizes() {
        assert_eq!(PageSize::try_from(10).unwrap(), PageSize::Ten);
        assert!(matches!(
            PageSize::try_from(7),
            Err(LedgerError::InvalidPageSize(7))
        ));
        assert_eq!(PageSize::default().get(), 5);
    }

    #[test]
    fn empty_collection_has_one_empty_page() {
        for requested in [0, 1, 2, 99] {
            let w = PageWindow::compute(0, PageSize::Five, requested);
            assert_eq!(w.total_pages, 1);
            assert_eq!(w.current, 1);
            assert!(w.is_empty());
            assert_eq!(w.range(), 0..0);
        }
    }

    #[test]
    fn requested_page_is_clamped() {
        let low = PageWindow::compute(12, PageSize::Five, 0);
        assert_eq!(low.current, 1);
        assert_eq!(low.range(), 0..5);

        let high = PageWindow::compute(12, PageSize::Five, 9);
        assert_eq!(high.total_pages, 3);
        assert_eq!(high.current, 3);
        assert_eq!(high.range(), 10..12);
    }

    #[test]
    fn window_invariants_hold_for_all_inputs() {
        for size in PageSize::ALL {
            for total in 0..60 {
                for requested in 0..15 {
                    let w = PageWindow::compute(total, size, requested);
                    assert!(w.current >= 1 && w.current <= w.total_pages);
                    assert!(w.end <= total);
                    if w.current < w.total_pages {
                        assert_eq!(w.len(), size.get());
                    } else {
                        assert_eq!(w.len(), total - w.start);
                    }
                }
            }
        }
    }

    #[test]
    fn slice_returns_visible_items() {
        let items: Vec<u32> = (1..=12).collect();
        let w = PageWindow::compute(items.len(), PageSize::Five, 2);
        assert_eq!(w.slice(&items), &[6, 7, 8, 9, 10]);
        assert_eq!(w.to_string(), "Page 2 of 3 (showing 6-10 of 12)");
    }

    #[test]
    fn navigation_targets_and_boundaries() {
        let first = PageWindow::compute(12, PageSize::Five, 1);
        assert!(!first.can(PageNav::First));
        assert!(!first.can(PageNav::Prev));
        assert!(first.can(PageNav::Next));
        assert_eq!(first.target(PageNav::Next), 2);
        assert_eq!(first.target(PageNav::Last), 3);

        let last = PageWindow::compute(12, PageSize::Five, 3);
        assert!(!last.can(PageNav::Next));
        assert!(!last.can(PageNav::Last));
        assert_eq!(last.target(PageNav::Prev), 2);
        assert_eq!(last.target(PageNav::Goto(0)), 1);
        assert!(!last.can(PageNav::Goto(40)));
    }
}
