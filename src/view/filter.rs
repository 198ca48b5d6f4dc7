use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::error::{LedgerError, Result};

/// Records that can be matched against a free-text search term.
pub trait Searchable {
    /// The text field searched by the list view. `None` never matches a
    /// non-empty term.
    fn search_field(&self) -> Option<&str>;
}

/// Records that can be bucketed by a [`Period`].
pub trait Dated {
    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

/// Case-insensitive substring match. An empty (or all-blank) term matches everything.
pub fn matches_term<T: Searchable + ?Sized>(record: &T, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .search_field()
        .is_some_and(|field| field.to_lowercase().contains(&needle))
}

/// Keep the records whose search field contains `term`, in their original order.
pub fn filter_by_term<'a, T, I>(records: I, term: &str) -> Vec<&'a T>
where
    T: Searchable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| matches_term(*r, term))
        .collect()
}

/// Coarse time window for list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    All,
    Today,
    ThisWeek,
    ThisMonth,
}

impl Period {
    /// Whether `date` falls inside this window as seen from `today`.
    /// Weeks start on Monday.
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Period::All => true,
            Period::Today => date == today,
            Period::ThisWeek => date.iso_week() == today.iso_week(),
            Period::ThisMonth => date.year() == today.year() && date.month() == today.month(),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::All => "All",
            Period::Today => "Today",
            Period::ThisWeek => "This Week",
            Period::ThisMonth => "This Month",
        };
        f.write_str(label)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "all" => Ok(Period::All),
            "today" => Ok(Period::Today),
            "thisweek" | "week" => Ok(Period::ThisWeek),
            "thismonth" | "month" => Ok(Period::ThisMonth),
            _ => Err(LedgerError::Validation(format!(
                "Invalid period '{s}'. Use all, today, this-week or this-month."
            ))),
        }
    }
}

/// Keep the records dated inside `period`. Undated records only survive `Period::All`.
pub fn filter_by_period<'a, T, I>(records: I, period: Period, today: NaiveDate) -> Vec<&'a T>
where
    T: Dated + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| match period {
            Period::All => true,
            _ => r.date().is_some_and(|d| period.contains(d, today)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: Option<&'static str>,
        date: NaiveDate,
    }

    impl Searchable for Row {
        fn search_field(&self) -> Option<&str> {
            self.name
        }
    }

    impl Dated for Row {
        fn date(&self) -> Option<NaiveDate> {
            Some(self.date)
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(name: Option<&'static str>, date: NaiveDate) -> Row {
        Row { name, date }
    }

    fn rows() -> Vec<Row> {
        vec![
            row(Some("Sanath Nishantha"), day(2025, 1, 15)),
            row(Some("Sumana Nishanthi"), day(2025, 1, 13)),
            row(None, day(2025, 1, 15)),
            row(Some("Arul Suresh"), day(2024, 12, 30)),
        ]
    }

    #[test]
    fn empty_term_is_identity() {
        let rows = rows();
        let all = filter_by_term(&rows, "");
        assert_eq!(all.len(), rows.len());
        assert!(all.iter().zip(&rows).all(|(a, b)| std::ptr::eq(*a, b)));

        assert_eq!(filter_by_term(&rows, "   ").len(), rows.len());
    }

    #[test]
    fn term_matches_case_insensitive_substring() {
        let rows = rows();
        let hits = filter_by_term(&rows, "NISHAN");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].name, Some("Sanath Nishantha"));
        assert_eq!(hits[1].name, Some("Sumana Nishanthi"));
    }

    #[test]
    fn missing_field_never_matches() {
        let rows = rows();
        assert!(filter_by_term(&rows, "a").iter().all(|r| r.name.is_some()));
    }

    #[test]
    fn filtering_is_idempotent() {
        let rows = rows();
        let once = filter_by_term(&rows, "su");
        let twice = filter_by_term(once.iter().copied(), "su");
        assert_eq!(once, twice);
    }

    #[test]
    fn period_buckets_are_relative_to_today() {
        let rows = rows();
        let today = day(2025, 1, 15);

        assert_eq!(filter_by_period(&rows, Period::All, today).len(), 4);
        assert_eq!(filter_by_period(&rows, Period::Today, today).len(), 2);
        // 2025-01-13 is the Monday of the same ISO week
        assert_eq!(filter_by_period(&rows, Period::ThisWeek, today).len(), 3);
        assert_eq!(filter_by_period(&rows, Period::ThisMonth, today).len(), 3);
    }

    #[test]
    fn week_crosses_year_boundary() {
        // 2024-12-30 and 2025-01-01 share ISO week 1 of 2025
        assert!(Period::ThisWeek.contains(day(2024, 12, 30), day(2025, 1, 1)));
        assert!(!Period::ThisMonth.contains(day(2024, 12, 30), day(2025, 1, 1)));
    }

    #[test]
    fn parses_period_names() {
        assert_eq!("this-week".parse::<Period>().unwrap(), Period::ThisWeek);
        assert_eq!("This Month".parse::<Period>().unwrap(), Period::ThisMonth);
        assert_eq!("TODAY".parse::<Period>().unwrap(), Period::Today);
        assert!("yesterday".parse::<Period>().is_err());
    }
}
