//! Month grid generation.
//!
//! A grid always covers whole weeks: it starts on the configured first
//! weekday, is padded with trailing days of the previous month and leading
//! days of the next month, and every cell carries the status derived for its
//! date relative to a reference "today".

use chrono::{Datelike, Days, Local, Month, Months, NaiveDate, Weekday};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorKind, Result};

pub const DAYS_PER_WEEK: usize = 7;

pub fn days_of_month(month: &Month, year: i32) -> u32 {
    match month {
        Month::February => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

/// A validated (year, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    month: Month,
    first: NaiveDate,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let invalid = || {
            Error::new(
                ErrorKind::InvalidDate,
                &format!("{:04}-{:02} is not a valid month", year, month),
            )
        };

        let index = Month::from_u32(month).ok_or_else(invalid)?;
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;

        Ok(YearMonth {
            month: index,
            first,
        })
    }

    pub fn of<T: Datelike>(date: &T) -> Result<Self> {
        YearMonth::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn num_days(&self) -> u32 {
        days_of_month(&self.month, self.year())
    }

    pub fn contains<T: Datelike>(&self, date: &T) -> bool {
        date.year() == self.year() && date.month() == self.month.number_from_month()
    }

    pub fn succ(&self) -> Result<Self> {
        self.first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| self.out_of_range())
            .and_then(|date| YearMonth::of(&date))
    }

    pub fn pred(&self) -> Result<Self> {
        self.first
            .checked_sub_months(Months::new(1))
            .ok_or_else(|| self.out_of_range())
            .and_then(|date| YearMonth::of(&date))
    }

    fn out_of_range(&self) -> Error {
        Error::new(
            ErrorKind::InvalidDate,
            &format!("{} is at the edge of the supported date range", self),
        )
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first.cmp(&other.first)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    /// Parses `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")?;
        YearMonth::of(&date)
    }
}

/// Per-day classification shown on a calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Celebrate,
    Warning,
    Violation,
    None,
}

impl Status {
    pub fn of_day(date: NaiveDate, reference: NaiveDate) -> Status {
        if date > reference {
            return Status::None;
        }

        match date.day() % 7 {
            0 => Status::Violation,
            3 | 5 => Status::Warning,
            _ => Status::Celebrate,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            Status::Celebrate => Some('✓'),
            Status::Warning => Some('!'),
            Status::Violation => Some('✗'),
            Status::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub status: Status,
}

impl CalendarCell {
    fn new(date: NaiveDate, displayed: &YearMonth, reference: NaiveDate) -> Self {
        CalendarCell {
            date,
            is_current_month: displayed.contains(&date),
            is_today: date == reference,
            status: Status::of_day(date, reference),
        }
    }
}

/// Number of previous-month days needed so a row starting on
/// `first_weekday` reaches `month_start`.
pub fn leading_days(month_start: Weekday, first_weekday: Weekday) -> u32 {
    (month_start.num_days_from_monday() + 7 - first_weekday.num_days_from_monday()) % 7
}

pub fn build_grid(
    displayed: YearMonth,
    reference: NaiveDate,
    first_weekday: Weekday,
) -> Result<Vec<CalendarCell>> {
    let first = displayed.first_day();
    let leading = leading_days(first.weekday(), first_weekday) as usize;
    let filled = leading + displayed.num_days() as usize;
    let total = (filled + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK * DAYS_PER_WEEK;

    let start = first
        .checked_sub_days(Days::new(leading as u64))
        .ok_or_else(|| displayed.out_of_range())?;
    start
        .checked_add_days(Days::new(total as u64 - 1))
        .ok_or_else(|| displayed.out_of_range())?;

    let cells: Vec<CalendarCell> = start
        .iter_days()
        .take(total)
        .map(|date| CalendarCell::new(date, &displayed, reference))
        .collect();

    log::trace!(
        "Built grid for {}: {} leading, {} cells",
        displayed,
        leading,
        cells.len()
    );

    Ok(cells)
}

/// Grid of the current month with today as reference.
pub fn build_current_grid(first_weekday: Weekday) -> Result<Vec<CalendarCell>> {
    let today = Local::now().date_naive();
    build_grid(YearMonth::of(&today)?, today, first_weekday)
}

pub fn weeks(cells: &[CalendarCell]) -> std::slice::Chunks<'_, CalendarCell> {
    cells.chunks(DAYS_PER_WEEK)
}
