use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::picker::DateRange;

// ============================================================================
// Backend payloads
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Creator {
    pub username: String,
}

/// Case row returned by `GET /api/cases`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Case {
    pub id: i64,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub has_diagnosis: Option<bool>,
    #[serde(default)]
    pub diagnosis_count: Option<u32>,
    #[serde(default)]
    pub creator: Option<Creator>,
}

/// `GET /api/cases/{id}`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CaseDetail {
    pub id: i64,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub chief_complaint: Option<String>,
    #[serde(default)]
    pub raw_report: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Case {
    /// A case counts as diagnosed when the backend says so, or failing that
    /// when it has at least one diagnosis on record
    pub fn is_diagnosed(&self) -> bool {
        self.has_diagnosis
            .unwrap_or_else(|| self.diagnosis_count.unwrap_or(0) > 0)
    }

    /// Creation day in local time
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at.as_deref().and_then(parse_timestamp_local_date)
    }

    pub fn creator_username(&self) -> Option<&str> {
        self.creator.as_ref().map(|c| c.username.as_str())
    }
}

/// Local calendar day of a backend timestamp. Timestamps with an offset are
/// converted to local time; naive ones are taken as already local.
pub fn parse_timestamp_local_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|dt| dt.date())
        .ok()
}

// ============================================================================
// Case list filters
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenderFilter {
    #[default]
    Any,
    Male,
    Female,
}

impl GenderFilter {
    pub const ALL: [GenderFilter; 3] = [GenderFilter::Any, GenderFilter::Male, GenderFilter::Female];

    pub fn label(self) -> &'static str {
        match self {
            GenderFilter::Any => "Any gender",
            GenderFilter::Male => "Male",
            GenderFilter::Female => "Female",
        }
    }

    fn value(self) -> Option<&'static str> {
        match self {
            GenderFilter::Any => None,
            GenderFilter::Male => Some("male"),
            GenderFilter::Female => Some("female"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiagnosedFilter {
    #[default]
    Any,
    Yes,
    No,
}

impl DiagnosedFilter {
    pub const ALL: [DiagnosedFilter; 3] = [DiagnosedFilter::Any, DiagnosedFilter::Yes, DiagnosedFilter::No];

    pub fn label(self) -> &'static str {
        match self {
            DiagnosedFilter::Any => "Any status",
            DiagnosedFilter::Yes => "Diagnosed",
            DiagnosedFilter::No => "Not diagnosed",
        }
    }

    fn value(self) -> Option<&'static str> {
        match self {
            DiagnosedFilter::Any => None,
            DiagnosedFilter::Yes => Some("yes"),
            DiagnosedFilter::No => Some("no"),
        }
    }
}

/// Case list filter panel. All non-empty filters must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseFilters {
    pub patient_name: String,
    pub patient_id: String,
    pub chief_complaint: String,
    pub gender: GenderFilter,
    pub diagnosed: DiagnosedFilter,
    pub created: DateRange,
    pub creator_username: String,
}

impl CaseFilters {
    pub fn is_active(&self) -> bool {
        !self.patient_name.trim().is_empty()
            || !self.patient_id.trim().is_empty()
            || !self.chief_complaint.trim().is_empty()
            || self.gender != GenderFilter::Any
            || self.diagnosed != DiagnosedFilter::Any
            || !self.created.is_empty()
            || !self.creator_username.trim().is_empty()
    }

    pub fn matches(&self, case: &Case) -> bool {
        contains_ci(case.patient_name.as_deref(), &self.patient_name)
            && contains_ci(case.patient_id.as_deref(), &self.patient_id)
            && contains_ci(case.chief_complaint.as_deref(), &self.chief_complaint)
            && contains_ci(case.creator_username(), &self.creator_username)
            && self.gender.value().map_or(true, |g| case.gender.as_deref() == Some(g))
            && match self.diagnosed {
                DiagnosedFilter::Any => true,
                DiagnosedFilter::Yes => case.is_diagnosed(),
                DiagnosedFilter::No => !case.is_diagnosed(),
            }
            && self.matches_created(case)
    }

    /// `from` counts from its first second, `to` through its last
    fn matches_created(&self, case: &Case) -> bool {
        if self.created.is_empty() {
            return true;
        }
        let Some(created) = case.created_date() else {
            return false;
        };
        self.created.from().map_or(true, |from| created >= from)
            && self.created.to().map_or(true, |to| created <= to)
    }

    /// Query parameters for the list request, skipping empty filters
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let (created_from, created_to) = self.created.to_strings();
        let text = [
            ("patient_name", self.patient_name.trim().to_string()),
            ("patient_id", self.patient_id.trim().to_string()),
            ("chief_complaint", self.chief_complaint.trim().to_string()),
            ("gender", self.gender.value().unwrap_or_default().to_string()),
            ("diagnosed", self.diagnosed.value().unwrap_or_default().to_string()),
            ("created_from", created_from),
            ("created_to", created_to),
            ("creator_username", self.creator_username.trim().to_string()),
        ];
        text.into_iter().filter(|(_, v)| !v.is_empty()).collect()
    }

    /// "?created_from=2025-06-09&created_to=2025-06-15", or "" when no filter is set
    pub fn query_string(&self) -> String {
        let params = self.query_params();
        if params.is_empty() {
            return String::new();
        }
        let joined: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("?{}", joined.join("&"))
    }
}

fn contains_ci(haystack: Option<&str>, needle: &str) -> bool {
    let needle = needle.trim();
    if needle.is_empty() {
        return true;
    }
    haystack
        .unwrap_or("")
        .to_lowercase()
        .contains(&needle.to_lowercase())
}
