mod aggregate;
mod filter;
mod pagination;

pub use aggregate::{
    monthly_collection, MonthlyTotal, PaymentSummary, ProcurementSummary, SupplierSummary,
};
pub use filter::{filter_by_period, filter_by_term, matches_term, Dated, Period, Searchable};
pub use pagination::{PageNav, PageSize, PageWindow};

use chrono::NaiveDate;

/// User-controlled parameters of one list view.
///
/// Any change that can shrink or re-chunk the result set (search term,
/// period, page size) sends the view back to page 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    search: String,
    period: Period,
    page_size: PageSize,
    current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl ViewState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            search: String::new(),
            period: Period::All,
            page_size,
            current_page: 1,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// The requested page; it is clamped only when a window is computed.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.current_page = 1;
        }
    }

    pub fn set_period(&mut self, period: Period) {
        if period != self.period {
            self.period = period;
            self.current_page = 1;
        }
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Apply a pager transition against a list of `total` matching rows.
    /// Disabled transitions leave the page untouched.
    pub fn navigate(&mut self, nav: PageNav, total: usize) {
        let window = self.window(total);
        if window.can(nav) {
            self.current_page = window.target(nav);
        } else {
            self.current_page = window.current;
        }
    }

    pub fn window(&self, total: usize) -> PageWindow {
        PageWindow::compute(total, self.page_size, self.current_page)
    }

    /// Run the filter and pagination stages over `records`.
    pub fn apply<'a, T, I>(&self, records: I, today: NaiveDate) -> ListView<'a, T>
    where
        T: Searchable + Dated + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let by_term = filter_by_term(records, &self.search);
        let matched = filter_by_period(by_term, self.period, today);
        let window = self.window(matched.len());
        ListView { matched, window }
    }
}

/// The rows that survived filtering, plus the page of them to show.
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub matched: Vec<&'a T>,
    pub window: PageWindow,
}

impl<'a, T> ListView<'a, T> {
    pub fn visible(&self) -> &[&'a T] {
        self.window.slice(&self.matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{sample_payments, PaymentRecord};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn many_payments(n: usize) -> Vec<PaymentRecord> {
        let base = sample_payments();
        (0..n)
            .map(|i| {
                let mut p = base[i % base.len()].clone();
                p.id = i as u32 + 1;
                p
            })
            .collect()
    }

    #[test]
    fn changing_search_resets_page() {
        let mut view = ViewState::default();
        view.go_to(3);
        view.set_search("nish");
        assert_eq!(view.current_page(), 1);

        view.go_to(2);
        view.set_search("nish");
        assert_eq!(view.current_page(), 2, "same term keeps the page");
    }

    #[test]
    fn changing_page_size_always_resets_page() {
        let mut view = ViewState::new(PageSize::Five);
        view.go_to(4);
        view.set_page_size(PageSize::Ten);
        assert_eq!(view.current_page(), 1);

        view.go_to(2);
        view.set_page_size(PageSize::Ten);
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn apply_filters_then_paginates() {
        let payments = many_payments(23);
        let mut view = ViewState::new(PageSize::Five);
        view.set_search("a");
        view.go_to(2);

        let list = view.apply(&payments, today());
        assert_eq!(list.matched.len(), 23);
        assert_eq!(list.window.total_pages, 5);
        assert_eq!(list.visible().len(), 5);
        assert_eq!(list.visible()[0].id, 6);
    }

    #[test]
    fn apply_clamps_stale_page_after_narrowing() {
        let payments = many_payments(23);
        let mut view = ViewState::new(PageSize::Five);
        view.go_to(5);

        let narrowed: Vec<&PaymentRecord> = payments.iter().filter(|p| p.is_paid()).collect();
        let list = view.apply(narrowed, today());
        assert_eq!(list.window.current, list.window.total_pages);
    }

    #[test]
    fn navigate_respects_boundaries() {
        let mut view = ViewState::new(PageSize::Five);
        view.navigate(PageNav::Prev, 12);
        assert_eq!(view.current_page(), 1);

        view.navigate(PageNav::Next, 12);
        view.navigate(PageNav::Next, 12);
        view.navigate(PageNav::Next, 12);
        assert_eq!(view.current_page(), 3);

        view.navigate(PageNav::First, 12);
        assert_eq!(view.current_page(), 1);
        view.navigate(PageNav::Last, 12);
        assert_eq!(view.current_page(), 3);
        view.navigate(PageNav::Goto(2), 12);
        assert_eq!(view.current_page(), 2);
    }

    #[test]
    fn period_filter_applies_to_dated_records() {
        let payments = sample_payments();
        let mut view = ViewState::default();
        view.set_period(Period::Today);
        let list = view.apply(&payments, today());
        assert_eq!(list.matched.len(), 1);
        assert_eq!(list.matched[0].supplier, "Sanath Nishantha");
    }
}
