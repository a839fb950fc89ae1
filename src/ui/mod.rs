pub mod month;

pub use month::{DayCell, MonthView};
