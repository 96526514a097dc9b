//! Summarizing a showtime list as a calendar date range.

use crate::error::{FeedError, Result};
use crate::types::Showtime;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// First and last calendar day a movie is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Range spanned by `showtimes`, in any order
    pub fn from_showtimes(showtimes: &[Showtime]) -> Result<Self> {
        let earliest = showtimes.iter().min().ok_or(FeedError::EmptyShowtimes)?;
        let latest = showtimes.iter().max().ok_or(FeedError::EmptyShowtimes)?;
        Ok(Self {
            start: earliest.date(),
            end: latest.date(),
        })
    }

    pub fn is_single_day(&self) -> bool {
        self.start == self.end
    }
}

/// `Mon Sep 03 2018` for a single day, `Mon Sep 03 2018 - Fri Sep 07 2018`
/// otherwise
impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_date(self.start))?;
        if !self.is_single_day() {
            write!(f, " - {}", format_date(self.end))?;
        }
        Ok(())
    }
}

/// Human-readable range for a movie's showtimes
pub fn date_range(showtimes: &[Showtime]) -> Result<String> {
    DateRange::from_showtimes(showtimes).map(|range| range.to_string())
}

fn format_date(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn at(raw: &str) -> Showtime {
        Showtime::from(DateTime::parse_from_rfc3339(raw).unwrap())
    }

    #[test]
    fn test_single_showtime() {
        let range = date_range(&[at("2018-09-03T19:00:00Z")]).unwrap();
        assert_eq!(range, "Mon Sep 03 2018");
    }

    #[test]
    fn test_same_day_has_no_separator() {
        let range = date_range(&[at("2018-09-03T21:00:00Z"), at("2018-09-03T13:00:00Z")]).unwrap();
        assert_eq!(range, "Mon Sep 03 2018");
    }

    #[test]
    fn test_multi_day_range() {
        let range = date_range(&[
            at("2018-09-07T03:35:00Z"),
            at("2018-09-03T23:30:00Z"),
            at("2018-09-05T23:00:00Z"),
        ])
        .unwrap();
        assert_eq!(range, "Mon Sep 03 2018 - Fri Sep 07 2018");
    }

    #[test]
    fn test_date_taken_in_own_offset() {
        // 23:30 in Austin is already the next day in UTC
        let range = date_range(&[at("2018-09-03T23:30:00-05:00")]).unwrap();
        assert_eq!(range, "Mon Sep 03 2018");
    }

    #[test]
    fn test_empty_showtimes() {
        assert!(matches!(date_range(&[]), Err(FeedError::EmptyShowtimes)));
    }

    #[test]
    fn test_range_fields() {
        let range = DateRange::from_showtimes(&[at("2018-09-04T02:45:00Z"), at("2018-09-06T02:45:00Z")]).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2018, 9, 4).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2018, 9, 6).unwrap());
        assert!(!range.is_single_day());
    }
}
