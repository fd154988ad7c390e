//! Field resolution table and lenient JSON accessors.
//!
//! The service has shipped several response shapes over time. Each display
//! field lists its candidate keys here, newest name first, so the mapping is
//! documented once instead of being scattered through the renderers.

use serde::Serialize;
use serde_json::Value;

use crate::model::{bool_at, number_at, string_at};

pub const APP_NAME: &[&str] = &["app_name", "appName", "product", "name"];
pub const VENDOR_NAME: &[&str] = &["vendor_name", "vendorName", "vendor"];
pub const DOMAIN: &[&str] = &["domain", "website", "url"];
pub const CATEGORY: &[&str] = &["category"];
pub const TRUST_SCORE: &[&str] = &["trust_score", "trustScore", "score"];
pub const CONFIDENCE: &[&str] = &["confidence"];
pub const EVIDENCE_COVERAGE: &[&str] = &["evidence_coverage", "evidenceCoverage"];
pub const RISK_LABEL: &[&str] = &["risk_label", "riskLabel"];
pub const BRIEF_MARKDOWN: &[&str] = &["brief_markdown", "briefMarkdown", "brief"];
pub const SCORING_BREAKDOWN: &[&str] = &["scoring_breakdown", "scoringBreakdown"];

/// Candidate locations of a CVE array. Dotted paths descend into objects.
pub const CVE_LIST: &[&str] = &[
    "cves",
    "cve_list",
    "cveStats.recent",
    "cveStats.recentCves",
    "cveStats.cves",
];

pub const CVE_ID: &[&str] = &["id", "cve_id", "cveId"];
pub const CVE_PUBLISHED: &[&str] = &["published", "publishedDate", "published_date", "date"];
pub const CVE_SEVERITY: &[&str] = &["severity"];
pub const CVE_CVSS: &[&str] = &["cvss", "cvssScore", "cvss_score"];
pub const CVE_KEV: &[&str] = &["kev", "isKev", "known_exploited"];
pub const CVE_SUMMARY: &[&str] = &["summary", "description"];

pub const STATS_TOTAL: &[&str] = &["total", "totalCves", "count"];
pub const STATS_CRITICAL: &[&str] = &["critical"];
pub const STATS_HIGH: &[&str] = &["high"];
pub const STATS_KEV: &[&str] = &["kev", "kevCount"];

/// Where a resolved display value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "from", content = "key", rename_all = "lowercase")]
pub enum FieldSource {
    /// The raw response, under the given key.
    Raw(&'static str),
    /// The typed assessment the caller passed as fallback.
    Fallback,
    /// Neither had it; a computed or literal default was used.
    Default,
}

/// Follows a dotted path (`"cveStats.recent"`) through nested objects.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// First candidate key holding a non-empty string.
pub fn first_string<'a>(
    value: &'a Value,
    candidates: &'static [&'static str],
) -> Option<(&'static str, &'a str)> {
    candidates
        .iter()
        .find_map(|key| lookup(value, key).and_then(string_at).map(|s| (*key, s)))
}

/// First candidate key holding a number.
pub fn first_number(
    value: &Value,
    candidates: &'static [&'static str],
) -> Option<(&'static str, f64)> {
    candidates
        .iter()
        .find_map(|key| lookup(value, key).and_then(number_at).map(|n| (*key, n)))
}

pub fn first_bool(value: &Value, candidates: &'static [&'static str]) -> Option<bool> {
    candidates
        .iter()
        .find_map(|key| lookup(value, key).and_then(bool_at))
}

/// Resolves a string: raw candidates, then the fallback if non-empty, then
/// `default`.
pub fn resolve_string(
    raw: &Value,
    candidates: &'static [&'static str],
    fallback: &str,
    default: &str,
) -> (String, FieldSource) {
    if let Some((key, s)) = first_string(raw, candidates) {
        return (s.to_string(), FieldSource::Raw(key));
    }
    if !fallback.trim().is_empty() {
        return (fallback.to_string(), FieldSource::Fallback);
    }
    (default.to_string(), FieldSource::Default)
}

/// Resolves a number: raw candidates, then the fallback if non-zero, then 0.
///
/// A zero in the fallback is indistinguishable from "missing" in the typed
/// shape, so it never shadows the default.
pub fn resolve_number(
    raw: &Value,
    candidates: &'static [&'static str],
    fallback: f64,
) -> (f64, FieldSource) {
    if let Some((key, n)) = first_number(raw, candidates) {
        return (n, FieldSource::Raw(key));
    }
    if fallback != 0.0 && fallback.is_finite() {
        return (fallback, FieldSource::Fallback);
    }
    (0.0, FieldSource::Default)
}
