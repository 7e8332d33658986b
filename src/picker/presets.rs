//! Fixed ranges relative to today

use chrono::{Duration, NaiveDate};

use super::range::DateRange;
use super::selection::Selection;

/// Quick range buttons under the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Today,
    Yesterday,
    Last7Days,
    Last14Days,
}

impl Preset {
    /// Button order in the popup
    pub const ALL: [Preset; 4] = [
        Preset::Last14Days,
        Preset::Last7Days,
        Preset::Yesterday,
        Preset::Today,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Today => "Today",
            Preset::Yesterday => "Yesterday",
            Preset::Last7Days => "Last 7 Days",
            Preset::Last14Days => "Last 14 Days",
        }
    }

    /// Days covered, counting today
    pub fn range(self, today: NaiveDate) -> DateRange {
        match self {
            Preset::Today => DateRange::single(today),
            Preset::Yesterday => DateRange::single(today - Duration::days(1)),
            Preset::Last7Days => DateRange::between(today - Duration::days(6), today),
            Preset::Last14Days => DateRange::between(today - Duration::days(13), today),
        }
    }

    /// Single-day presets act like a first click, range presets like a
    /// finished two-click selection.
    pub fn selection(self, today: NaiveDate) -> Selection {
        Selection::initial(&self.range(today))
    }
}
