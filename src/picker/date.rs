//! Canonical date strings, month grids and calendar navigation

use chrono::{DateTime, Datelike, Local, Months, NaiveDate};

const CANONICAL_FORMAT: &str = "%Y-%m-%d";

const MONTH_LABELS: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// Format a timestamp as "YYYY-MM-DD" using its local calendar fields.
/// Midnight in a zone west of UTC stays on the local day.
pub fn format_local_date(moment: &DateTime<Local>) -> String {
    format_date(moment.date_naive())
}

/// Canonical "YYYY-MM-DD" form, zero padded so it sorts chronologically
pub fn format_date(date: NaiveDate) -> String {
    date.format(CANONICAL_FORMAT).to_string()
}

/// Parse a canonical "YYYY-MM-DD" string
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), CANONICAL_FORMAT).ok()
}

fn first_of_month(year: i32, month0: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month0.checked_add(1)?, 1)
}

/// Number of days in a month (zero-indexed month). Invalid months have 0 days.
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let Some(first) = first_of_month(year, month0) else {
        return 0;
    };
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // Last representable month: count forward by hand
        None => (28..=31)
            .take_while(|d| first.with_day(*d).is_some())
            .last()
            .unwrap_or(28),
    }
}

/// Cells of a Sunday-first month grid: `None` for the blanks before the 1st,
/// then `Some(1..=days_in_month)`.
pub fn calendar_grid(year: i32, month0: u32) -> Vec<Option<u32>> {
    let Some(first) = first_of_month(year, month0) else {
        return Vec::new();
    };
    let leading = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(year, month0);

    let mut cells = Vec::with_capacity(leading + days as usize);
    cells.extend(std::iter::repeat(None).take(leading));
    cells.extend((1..=days).map(Some));
    cells
}

/// Month shown by the calendar popup, independent of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewMonth {
    pub year: i32,
    pub month0: u32,
}

/// Calendar navigation buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    PreviousYear,
    PreviousMonth,
    NextMonth,
    NextYear,
}

impl Navigation {
    pub fn months(self) -> i32 {
        match self {
            Navigation::PreviousYear => -12,
            Navigation::PreviousMonth => -1,
            Navigation::NextMonth => 1,
            Navigation::NextYear => 12,
        }
    }
}

impl ViewMonth {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// Move by a signed number of months, carrying into the year
    pub fn shift(self, months: i32) -> Self {
        let total = self.year * 12 + self.month0 as i32 + months;
        Self {
            year: total.div_euclid(12),
            month0: total.rem_euclid(12) as u32,
        }
    }

    pub fn navigate(self, nav: Navigation) -> Self {
        self.shift(nav.months())
    }

    pub fn grid(&self) -> Vec<Option<u32>> {
        calendar_grid(self.year, self.month0)
    }

    /// Date of a day cell in this month
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        first_of_month(self.year, self.month0)?.with_day(day)
    }

    /// "Jun 2025"
    pub fn label(&self) -> String {
        let name = MONTH_LABELS.get(self.month0 as usize).copied().unwrap_or("?");
        format!("{} {}", name, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn format_pads_month_and_day() {
        assert_eq!(format_date(date(2025, 6, 9)), "2025-06-09");
        assert_eq!(format_date(date(987, 1, 1)), "0987-01-01");
    }

    #[test]
    fn format_local_date_uses_local_fields_at_midnight() {
        let midnight = Local
            .with_ymd_and_hms(2025, 3, 1, 0, 0, 0)
            .earliest()
            .unwrap();
        assert_eq!(format_local_date(&midnight), "2025-03-01");

        let late = Local
            .with_ymd_and_hms(2025, 2, 28, 23, 59, 59)
            .earliest()
            .unwrap();
        assert_eq!(format_local_date(&late), "2025-02-28");
    }

    #[test]
    fn format_then_parse_is_stable_1900_to_2100() {
        let mut day = date(1900, 1, 1);
        let end = date(2100, 12, 31);
        while day <= end {
            let text = format_date(day);
            let parsed = parse_date(&text).unwrap();
            assert_eq!(parsed, day);
            assert_eq!(format_date(parsed), text);
            day += Duration::days(1);
        }
    }

    #[test]
    fn parse_rejects_non_canonical_input() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2025-13-01"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert_eq!(parse_date("15/06/2025"), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2025, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2025, 11), 31);
        assert_eq!(days_in_month(2025, 8), 30);
        assert_eq!(days_in_month(2025, 12), 0);
    }

    #[test]
    fn grid_for_june_2025_starts_on_sunday() {
        // 2025-06-01 is a Sunday
        let grid = calendar_grid(2025, 5);
        assert_eq!(grid.len(), 30);
        assert_eq!(grid[0], Some(1));
        assert_eq!(grid[29], Some(30));
    }

    #[test]
    fn grid_for_february_2025_has_six_blanks() {
        // 2025-02-01 is a Saturday
        let grid = calendar_grid(2025, 1);
        assert_eq!(&grid[..6], &[None; 6]);
        assert_eq!(grid[6], Some(1));
        assert_eq!(grid.last(), Some(&Some(28)));
    }

    #[test]
    fn grid_is_complete_for_every_month_1900_to_2100() {
        for year in 1900..=2100 {
            for month0 in 0..12 {
                let grid = calendar_grid(year, month0);
                let first = date(year, month0 + 1, 1);
                let leading = grid.iter().take_while(|c| c.is_none()).count();
                assert_eq!(leading as u32, first.weekday().num_days_from_sunday());

                let days: Vec<u32> = grid.iter().flatten().copied().collect();
                let expected: Vec<u32> = (1..=days_in_month(year, month0)).collect();
                assert_eq!(days, expected, "{}-{}", year, month0 + 1);
                assert_eq!(grid.len(), leading + expected.len());
            }
        }
    }

    #[test]
    fn grid_for_invalid_month_is_empty() {
        assert!(calendar_grid(2025, 12).is_empty());
        assert!(calendar_grid(2025, u32::MAX).is_empty());
        assert_eq!(days_in_month(2025, u32::MAX), 0);

        let bogus = ViewMonth { year: 2025, month0: u32::MAX };
        assert!(bogus.grid().is_empty());
        assert_eq!(bogus.day(1), None);
    }

    #[test]
    fn shift_carries_across_years() {
        let jan = ViewMonth { year: 2025, month0: 0 };
        assert_eq!(jan.navigate(Navigation::PreviousMonth), ViewMonth { year: 2024, month0: 11 });
        assert_eq!(jan.navigate(Navigation::PreviousYear), ViewMonth { year: 2024, month0: 0 });

        let dec = ViewMonth { year: 2025, month0: 11 };
        assert_eq!(dec.navigate(Navigation::NextMonth), ViewMonth { year: 2026, month0: 0 });
        assert_eq!(dec.navigate(Navigation::NextYear), ViewMonth { year: 2026, month0: 11 });
        assert_eq!(dec.shift(-25), ViewMonth { year: 2023, month0: 10 });
    }

    #[test]
    fn view_month_builds_cell_dates_and_labels() {
        let view = ViewMonth::containing(date(2025, 6, 15));
        assert_eq!(view.day(20), Some(date(2025, 6, 20)));
        assert_eq!(view.day(31), None);
        assert_eq!(view.label(), "Jun 2025");
    }
}
