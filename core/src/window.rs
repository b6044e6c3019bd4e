//! The simulated calendar: `num_days` consecutive dates ending at an
//! anchor date (inclusive).

use crate::error::{SimError, SimResult};
use chrono::{Days, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    start: NaiveDate,
    days:  u32,
}

impl DayWindow {
    pub fn new(end: NaiveDate, days: u32) -> SimResult<Self> {
        if days == 0 {
            return Err(SimError::InvalidConfig("day window must hold at least one day".into()));
        }
        let start = end
            .checked_sub_days(Days::new(u64::from(days - 1)))
            .ok_or_else(|| {
                SimError::InvalidConfig(format!("{days} days before {end} is out of range"))
            })?;
        Ok(Self { start, days })
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn thirty_days_end_on_anchor() {
        let w = DayWindow::new(date(2025, 11, 13), 30).unwrap();
        let dates: Vec<_> = w.dates().collect();
        assert_eq!(dates.len(), 30);
        assert_eq!(dates[0], date(2025, 10, 15));
        assert_eq!(*dates.last().unwrap(), date(2025, 11, 13));
        assert!(dates.windows(2).all(|p| p[0] < p[1]));
    }

    #[test]
    fn crosses_month_and_leap_day() {
        let w = DayWindow::new(date(2024, 3, 1), 3).unwrap();
        let dates: Vec<_> = w.dates().collect();
        assert_eq!(dates, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
    }

    #[test]
    fn zero_days_rejected() {
        assert!(DayWindow::new(date(2025, 1, 1), 0).is_err());
    }
}
