//! Domain types shared across the session, the clients and the CLI.
//!
//! - [`INDUSTRIES`]: the news segments offered in the interactive picker
//! - [`DateRange`]: a validated inclusive range of publication dates
//! - [`HeadlineQuery`]: what the headline source is asked for

use crate::error::{LinkcraftError, Result};
use chrono::{Duration, Local, NaiveDate};
use std::fmt;

/// News segments offered by the interactive picker.
///
/// Any other keyword is accepted on the command line; this list only drives
/// the menu.
pub const INDUSTRIES: &[&str] = &[
    "automobile",
    "e-vehicle",
    "renewable energy",
    "technology",
    "environment",
    "global affairs",
    "healthcare",
    "finance",
    "entertainment",
    "sports",
    "real estate",
    "education",
    "agriculture",
    "fashion",
    "travel",
    "food & beverages",
];

/// How far back the default range reaches.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;

/// Maximum number of headlines requested per fetch.
pub const HEADLINE_LIMIT: usize = 10;

/// Inclusive range of publication dates, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(LinkcraftError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// The last [`DEFAULT_LOOKBACK_DAYS`] days ending on `today`.
    pub fn ending_on(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(DEFAULT_LOOKBACK_DAYS),
            end: today,
        }
    }

    /// Build a range from optional user input, filling gaps from the default
    /// range that ends today.
    pub fn from_inputs(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        let default = Self::ending_on(Local::now().date_naive());
        Self::new(start.unwrap_or(default.start), end.unwrap_or(default.end))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// Parse a `YYYY-MM-DD` date as typed by the user.
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| LinkcraftError::InvalidDate(text.trim().to_string()))
}

/// A request for the most relevant headlines about one industry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlineQuery {
    pub industry: String,
    pub range: DateRange,
    pub limit: usize,
}

impl HeadlineQuery {
    pub fn new(industry: impl Into<String>, range: DateRange) -> Self {
        Self {
            industry: industry.into(),
            range,
            limit: HEADLINE_LIMIT,
        }
    }
}
