use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Maps a numeric CVSS base score onto a severity bucket.
    pub fn from_cvss(score: f64) -> Self {
        match score {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            s if s > 0.0 => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "critical" => Severity::Critical,
            "high" => Severity::High,
            "medium" | "moderate" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Unknown => "unknown",
        }
    }
}

/// One CVE record pulled out of an assessment response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CveEntry {
    pub id: String,
    /// Parsed publication date; `None` when missing or unparsable.
    pub published: Option<DateTime<Utc>>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss: Option<f64>,
    /// Listed in the Known Exploited Vulnerabilities catalogue.
    pub kev: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Aggregate CVE counters reported alongside the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CveStats {
    pub total: u64,
    pub critical: u64,
    pub high: u64,
    pub kev: u64,
}

impl CveStats {
    pub fn is_empty(&self) -> bool {
        self.total == 0 && self.critical == 0 && self.high == 0 && self.kev == 0
    }
}

/// Parses a publication date in RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`
/// (no offset, read as UTC) or plain `YYYY-MM-DD` form.
pub fn parse_published(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Sorts newest first. Undated entries keep their relative order and go last.
pub fn sort_by_published(cves: &mut [CveEntry]) {
    // Option orders None below Some, so a reversed comparison puts undated
    // entries at the tail; sort_by is stable.
    cves.sort_by(|a, b| b.published.cmp(&a.published));
}
