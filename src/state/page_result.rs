use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Suggested sitemap change frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Change frequency heuristic: the seed changes daily, its direct children
/// weekly, everything deeper monthly
pub fn change_frequency_for_depth(depth: u32) -> ChangeFrequency {
    match depth {
        0 => ChangeFrequency::Daily,
        1 => ChangeFrequency::Weekly,
        _ => ChangeFrequency::Monthly,
    }
}

/// Priority heuristic: `max(0.1, 1 - depth * 0.2)`, rounded to one decimal
pub fn priority_for_depth(depth: u32) -> f64 {
    let raw = (1.0 - f64::from(depth) * 0.2).max(0.1);
    (raw * 10.0).round() / 10.0
}

/// Record produced for one fetched page
///
/// Created once per dequeued URL whose fetch returned a response, and never
/// modified afterwards. Serializes with sitemap field names (`loc`,
/// `lastmod`, `changefreq`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult {
    /// Canonical URL of the page
    #[serde(rename = "loc")]
    pub location: String,

    /// Date the page was crawled
    #[serde(rename = "lastmod")]
    pub last_modified: NaiveDate,

    #[serde(rename = "changefreq")]
    pub change_frequency: ChangeFrequency,

    /// In `[0.1, 1.0]`
    pub priority: f64,

    /// Link distance from the seed
    pub depth: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Final HTTP status after redirects
    #[serde(rename = "status", skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

impl PageResult {
    /// Builds a result stamped with today's date and depth-derived metadata
    pub fn new(
        location: impl Into<String>,
        depth: u32,
        title: Option<String>,
        http_status: Option<u16>,
    ) -> Self {
        Self {
            location: location.into(),
            last_modified: Utc::now().date_naive(),
            change_frequency: change_frequency_for_depth(depth),
            priority: priority_for_depth(depth),
            depth,
            title,
            http_status,
        }
    }

    /// Returns true if the page answered with a 2xx status
    pub fn is_success(&self) -> bool {
        matches!(self.http_status, Some(code) if (200..300).contains(&code))
    }
}
