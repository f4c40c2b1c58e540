/*
[INPUT]:  Dates typed by the user, month navigation requests
[OUTPUT]: Validated half-open date ranges for grids and reports
[POS]:    Shared date-range navigation used by expense grid and reports
[UPDATE]: When range constraints or navigation steps change
*/

use chrono::{Datelike, Days, Months, NaiveDate};
use rentroll_adapter::{format_wire_date, parse_wire_date};
use thiserror::Error;

/// Dates before this year are ignored by the range controls
pub const EARLIEST_YEAR: i32 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("unrecognized date: {0}")]
    Unparseable(String),
    #[error("dates before {EARLIEST_YEAR} are not accepted: {0}")]
    TooEarly(NaiveDate),
    #[error("range start {start} must be before stop {stop}")]
    Inverted { start: NaiveDate, stop: NaiveDate },
    #[error("date out of range")]
    Overflow,
}

/// Half-open range `[start, stop)` used for searches and reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    stop: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, stop: NaiveDate) -> Result<Self, DateRangeError> {
        check_year(start)?;
        check_year(stop)?;
        if start >= stop {
            return Err(DateRangeError::Inverted { start, stop });
        }
        Ok(Self { start, stop })
    }

    /// The calendar month containing `date`
    pub fn month_of(date: NaiveDate) -> Result<Self, DateRangeError> {
        let start = first_of_month(date);
        let stop = start
            .checked_add_months(Months::new(1))
            .ok_or(DateRangeError::Overflow)?;
        Self::new(start, stop)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn stop(&self) -> NaiveDate {
        self.stop
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.stop
    }

    /// Previous calendar month
    pub fn month_back(&self) -> Result<Self, DateRangeError> {
        let start = first_of_month(self.start)
            .checked_sub_months(Months::new(1))
            .ok_or(DateRangeError::Overflow)?;
        Self::month_of(start)
    }

    /// Next calendar month
    pub fn month_forward(&self) -> Result<Self, DateRangeError> {
        let start = first_of_month(self.start)
            .checked_add_months(Months::new(1))
            .ok_or(DateRangeError::Overflow)?;
        Self::month_of(start)
    }

    /// Move the start; a start at or after stop snaps to the day before stop
    pub fn with_start(&self, start: NaiveDate) -> Result<Self, DateRangeError> {
        check_year(start)?;
        let start = if start >= self.stop {
            self.stop
                .checked_sub_days(Days::new(1))
                .ok_or(DateRangeError::Overflow)?
        } else {
            start
        };
        Self::new(start, self.stop)
    }

    /// Move the stop; a stop at or before start snaps to the day after start
    pub fn with_stop(&self, stop: NaiveDate) -> Result<Self, DateRangeError> {
        check_year(stop)?;
        let stop = if stop <= self.start {
            self.start
                .checked_add_days(Days::new(1))
                .ok_or(DateRangeError::Overflow)?
        } else {
            stop
        };
        Self::new(self.start, stop)
    }

    pub fn parse_start(&self, raw: &str) -> Result<Self, DateRangeError> {
        self.with_start(parse_date(raw)?)
    }

    pub fn parse_stop(&self, raw: &str) -> Result<Self, DateRangeError> {
        self.with_stop(parse_date(raw)?)
    }

    /// `M/D/YYYY - M/D/YYYY`
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            format_wire_date(self.start),
            format_wire_date(self.stop)
        )
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, DateRangeError> {
    parse_wire_date(raw).ok_or_else(|| DateRangeError::Unparseable(raw.trim().to_string()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn check_year(date: NaiveDate) -> Result<(), DateRangeError> {
    if date.year() < EARLIEST_YEAR {
        return Err(DateRangeError::TooEarly(date));
    }
    Ok(())
}
