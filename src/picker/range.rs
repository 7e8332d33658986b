//! Day ranges with optional ends and the boundary to "YYYY-MM-DD" strings

use chrono::NaiveDate;
use thiserror::Error;

use super::date::{format_date, parse_date};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("invalid {field} date {value:?}, expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },
}

/// Selected day range. Either end may be unset; when both are set `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(day: NaiveDate) -> Self {
        Self {
            from: Some(day),
            to: Some(day),
        }
    }

    /// Range covering both days, in whichever order they are given
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        Self {
            from: Some(a.min(b)),
            to: Some(a.max(b)),
        }
    }

    /// Build from optional ends. A reversed pair is swapped.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        match (from, to) {
            (Some(a), Some(b)) if a > b => {
                tracing::warn!(from = %a, to = %b, "reversed date range, swapping ends");
                Self::between(a, b)
            }
            _ => Self { from, to },
        }
    }

    /// Parse the boundary representation: canonical strings, empty meaning unset
    pub fn parse(from: &str, to: &str) -> Result<Self, RangeError> {
        let from = parse_end("from", from)?;
        let to = parse_end("to", to)?;
        Ok(Self::new(from, to))
    }

    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn is_single_day(&self) -> bool {
        matches!((self.from, self.to), (Some(a), Some(b)) if a == b)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= day && day <= to,
            _ => false,
        }
    }

    pub fn is_endpoint(&self, day: NaiveDate) -> bool {
        self.from == Some(day) || self.to == Some(day)
    }

    /// Start earlier, keeping the end
    pub(crate) fn extend_back(&mut self, day: NaiveDate) {
        self.from = Some(day);
    }

    /// End later, keeping the start
    pub(crate) fn extend_forward(&mut self, day: NaiveDate) {
        self.to = Some(day);
    }

    /// Canonical strings, empty when unset
    pub fn to_strings(&self) -> (String, String) {
        (
            self.from.map(format_date).unwrap_or_default(),
            self.to.map(format_date).unwrap_or_default(),
        )
    }

    /// Button captions for both ends, `placeholder` where unset
    pub fn display(&self, placeholder: &str) -> (String, String) {
        (
            self.from.map(format_date).unwrap_or_else(|| placeholder.to_string()),
            self.to.map(format_date).unwrap_or_else(|| placeholder.to_string()),
        )
    }
}

fn parse_end(field: &'static str, value: &str) -> Result<Option<NaiveDate>, RangeError> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(value)
        .map(Some)
        .ok_or_else(|| RangeError::InvalidDate {
            field,
            value: value.to_string(),
        })
}
