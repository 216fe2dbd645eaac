use super::entity::{SafetyStatus, TouristRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status predicate for the tourist list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Safe,
    Distress,
}

impl StatusFilter {
    pub fn matches(self, status: SafetyStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Safe => status == SafetyStatus::Safe,
            StatusFilter::Distress => status == SafetyStatus::Distress,
        }
    }
}

/// Rejected status filter value
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownStatusFilter(pub String);

impl fmt::Display for UnknownStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown status filter '{}': expected all, safe or distress",
            self.0
        )
    }
}

impl std::error::Error for UnknownStatusFilter {}

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "safe" => Ok(StatusFilter::Safe),
            "distress" => Ok(StatusFilter::Distress),
            _ => Err(UnknownStatusFilter(s.to_string())),
        }
    }
}

/// Free-text search plus status predicate
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TouristQuery {
    search: String,
    /// `search` lowercased once, matched against every row
    needle: String,
    pub status: StatusFilter,
}

impl TouristQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        let search = search.into();
        Self {
            needle: search.to_lowercase(),
            search,
            status,
        }
    }

    /// Search text as entered
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Case-insensitive substring match on name, passport number or place,
    /// AND the status predicate.
    pub fn matches(&self, tourist: &TouristRecord) -> bool {
        let matches_search = tourist.full_name.to_lowercase().contains(&self.needle)
            || tourist.passport_number.to_lowercase().contains(&self.needle)
            || tourist.location.to_lowercase().contains(&self.needle);

        matches_search && self.status.matches(tourist.status)
    }
}

/// Result of filtering the list. An empty match is its own branch so the
/// list surface renders the empty state instead of zero rows.
#[derive(Clone, Debug, PartialEq)]
pub enum FilteredView {
    Rows(Vec<TouristRecord>),
    Empty,
}

impl FilteredView {
    pub fn rows(&self) -> &[TouristRecord] {
        match self {
            FilteredView::Rows(rows) => rows,
            FilteredView::Empty => &[],
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FilteredView::Empty)
    }
}

/// Filter a snapshot, preserving snapshot order
pub fn filter_tourists(tourists: &[TouristRecord], query: &TouristQuery) -> FilteredView {
    let rows: Vec<TouristRecord> = tourists
        .iter()
        .filter(|tourist| query.matches(tourist))
        .cloned()
        .collect();

    if rows.is_empty() {
        FilteredView::Empty
    } else {
        FilteredView::Rows(rows)
    }
}
