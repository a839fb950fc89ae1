use chrono::{Datelike, Weekday};
use itertools::Itertools;
use std::fmt;

use crate::calendar::{self, CalendarCell, YearMonth, DAYS_PER_WEEK};
use crate::config::Theme;

/// One grid cell, always five characters wide: marker, day number, today
/// symbol, status symbol.
pub struct DayCell {
    day_num: u32,
    in_month: bool,
    is_today: bool,
    status_symbol: Option<char>,
    today_symbol: char,
    other_month_marker: char,
}

impl DayCell {
    pub fn new(cell: &CalendarCell) -> Self {
        let theme = Theme::default();

        DayCell {
            day_num: cell.date.day(),
            in_month: cell.is_current_month,
            is_today: cell.is_today,
            status_symbol: cell.status.symbol(),
            today_symbol: theme.today_symbol,
            other_month_marker: theme.other_month_marker,
        }
    }

    pub fn today_symbol(mut self, symbol: char) -> Self {
        self.today_symbol = symbol;
        self
    }

    pub fn other_month_marker(mut self, marker: char) -> Self {
        self.other_month_marker = marker;
        self
    }
}

impl fmt::Display for DayCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:>2}{}{}",
            if self.in_month {
                ' '
            } else {
                self.other_month_marker
            },
            self.day_num,
            if self.is_today { self.today_symbol } else { ' ' },
            self.status_symbol.unwrap_or(' ')
        )
    }
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

pub struct MonthView {
    month: YearMonth,
    first_weekday: Weekday,
    theme: Theme,
}

impl MonthView {
    const CELL_WIDTH: usize = 5;

    pub fn new(month: YearMonth, first_weekday: Weekday) -> Self {
        MonthView {
            month,
            first_weekday,
            theme: Theme::default(),
        }
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.theme = theme.clone();
        self
    }

    fn header(&self) -> String {
        itertools::iterate(self.first_weekday, |wd| wd.succ())
            .take(DAYS_PER_WEEK)
            .map(|wd| format!("{:^width$}", weekday_label(wd), width = Self::CELL_WIDTH))
            .join(" ")
    }

    /// Renders `cells`, which must be a grid of `self.month` built with
    /// the same first weekday.
    pub fn render(&self, cells: &[CalendarCell]) -> String {
        let mut lines = vec![self.month.to_string(), self.header()];

        lines.extend(calendar::weeks(cells).map(|week| {
            week.iter()
                .map(|cell| {
                    DayCell::new(cell)
                        .today_symbol(self.theme.today_symbol)
                        .other_month_marker(self.theme.other_month_marker)
                        .to_string()
                })
                .join(" ")
        }));

        lines.join("\n")
    }
}
