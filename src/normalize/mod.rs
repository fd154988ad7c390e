//! Reconciles arbitrary service responses into display-ready fields.
//!
//! [`normalize`] takes the raw JSON body and the typed [`AssessmentData`]
//! parsed from it (or any other fallback) and resolves every display field
//! through the table in [`fields`]: raw response first, fallback second,
//! computed default last.
//!
//! # Example
//!
//! ```
//! use hawkshot::model::AssessmentData;
//! use hawkshot::normalize::normalize;
//! use serde_json::json;
//!
//! let raw = json!({ "product": "Slack", "vendor": "Salesforce", "trust_score": 82 });
//! let display = normalize(&raw, &AssessmentData::default());
//!
//! assert_eq!(display.app_name, "Slack");
//! assert_eq!(display.vendor_name, "Salesforce");
//! assert_eq!(display.risk_label, "Lower Risk");
//! ```

pub mod fields;

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::model::{
    bool_at, confidence_label, number_at, parse_published, sort_by_published, string_at,
    AssessmentData, CveEntry, CveStats, MetricKind, RiskLevel, Severity, Tier,
};
use fields::FieldSource;

/// Coverage below this fraction triggers the low-evidence warning.
pub const LOW_EVIDENCE_THRESHOLD: f64 = 0.5;

const UNKNOWN_PRODUCT: &str = "Unknown product";

/// How a breakdown value is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    /// 0..=1 fraction, shown as a rounded percentage.
    Percent,
    /// 0..=10 score, shown as-is over ten.
    OutOfTen,
}

impl Scale {
    /// Values above 1 are taken to be on the ten-point scale.
    pub fn detect(value: f64) -> Self {
        if value > 1.0 {
            Scale::OutOfTen
        } else {
            Scale::Percent
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub value: f64,
    pub scale: Scale,
    pub kind: MetricKind,
    pub tier: Tier,
}

impl BreakdownEntry {
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        let key = key.into();
        let scale = Scale::detect(value);
        let kind = MetricKind::classify(&key);
        let mut entry = Self {
            key,
            value,
            scale,
            kind,
            tier: Tier::Poor,
        };
        entry.tier = kind.tier(entry.fraction());
        entry
    }

    /// `cve_risk` becomes `cve risk`.
    pub fn label(&self) -> String {
        self.key.replace('_', " ")
    }

    /// The number shown to the user: the raw value on the ten-point scale,
    /// the rounded percentage otherwise.
    pub fn displayed_value(&self) -> f64 {
        match self.scale {
            Scale::OutOfTen => self.value,
            Scale::Percent => (self.value * 100.0).round(),
        }
    }

    pub fn display(&self) -> String {
        match self.scale {
            Scale::OutOfTen => format!("{}/10", self.displayed_value()),
            Scale::Percent => format!("{}%", self.displayed_value()),
        }
    }

    /// The value as a 0..=1 fraction regardless of scale.
    pub fn fraction(&self) -> f64 {
        match self.scale {
            Scale::OutOfTen => self.value / 10.0,
            Scale::Percent => self.value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlEvidence {
    pub name: String,
    pub present: bool,
}

/// One row of the SSO / MFA / RBAC / audit-log checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityControl {
    pub name: &'static str,
    pub enabled: bool,
}

/// (control, breakdown key, minimum fraction)
const SECURITY_CONTROL_RULES: &[(&str, &str, f64)] = &[
    ("SSO", "identity", 0.7),
    ("MFA", "controls", 0.6),
    ("RBAC", "controls", 0.7),
    ("Audit Logs", "transparency", 0.6),
];

/// Everything the renderers need, already resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayFields {
    pub app_name: String,
    pub vendor_name: String,
    pub domain: String,
    pub category: String,
    pub trust_score: f64,
    pub confidence: f64,
    pub evidence_coverage: f64,
    pub risk_label: String,
    pub breakdown: Vec<BreakdownEntry>,
    pub brief_markdown: String,
    pub cves: Vec<CveEntry>,
    pub cve_stats: CveStats,
    pub controls_evidence: Vec<ControlEvidence>,
    pub security_evidence: Vec<(String, String)>,
    pub highlights: Vec<String>,
    /// Provenance of each scalar field, keyed by canonical name.
    pub sources: BTreeMap<&'static str, FieldSource>,
}

impl DisplayFields {
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.trust_score)
    }

    /// Dial value, rounded and clamped to 0..=100.
    pub fn dial_value(&self) -> u8 {
        self.trust_score.round().clamp(0.0, 100.0) as u8
    }

    /// The dial is hidden only when the score is zero because nobody sent one.
    pub fn show_dial(&self) -> bool {
        self.trust_score != 0.0 || self.source_of("trust_score") != Some(&FieldSource::Default)
    }

    pub fn show_breakdown(&self) -> bool {
        !self.breakdown.is_empty()
    }

    pub fn low_evidence(&self) -> bool {
        self.evidence_coverage < LOW_EVIDENCE_THRESHOLD
    }

    pub fn confidence_label(&self) -> &'static str {
        confidence_label(self.confidence)
    }

    pub fn source_of(&self, field: &str) -> Option<&FieldSource> {
        self.sources.get(field)
    }

    /// Checklist derived from breakdown fractions; empty without a breakdown.
    pub fn security_controls(&self) -> Vec<SecurityControl> {
        if self.breakdown.is_empty() {
            return Vec::new();
        }

        SECURITY_CONTROL_RULES
            .iter()
            .map(|(name, key, min)| SecurityControl {
                name: *name,
                enabled: self
                    .breakdown
                    .iter()
                    .find(|e| e.key == *key)
                    .map(|e| e.fraction() >= *min)
                    .unwrap_or(false),
            })
            .collect()
    }
}

/// Resolves every display field from `raw`, then `fallback`, then defaults.
pub fn normalize(raw: &Value, fallback: &AssessmentData) -> DisplayFields {
    let mut sources = BTreeMap::new();

    let (app_name, src) =
        fields::resolve_string(raw, fields::APP_NAME, &fallback.app_name, UNKNOWN_PRODUCT);
    sources.insert("app_name", src);
    let (vendor_name, src) =
        fields::resolve_string(raw, fields::VENDOR_NAME, &fallback.vendor_name, "");
    sources.insert("vendor_name", src);
    let (domain, src) = fields::resolve_string(raw, fields::DOMAIN, "", "");
    sources.insert("domain", src);
    let (category, src) = fields::resolve_string(raw, fields::CATEGORY, &fallback.category, "");
    sources.insert("category", src);
    let (trust_score, src) =
        fields::resolve_number(raw, fields::TRUST_SCORE, fallback.trust_score);
    sources.insert("trust_score", src);
    let (confidence, src) = fields::resolve_number(raw, fields::CONFIDENCE, fallback.confidence);
    sources.insert("confidence", src);
    let (evidence_coverage, src) = fields::resolve_number(
        raw,
        fields::EVIDENCE_COVERAGE,
        fallback.evidence_coverage,
    );
    sources.insert("evidence_coverage", src);

    let derived = RiskLevel::from_score(trust_score);
    let (risk_label, src) =
        fields::resolve_string(raw, fields::RISK_LABEL, &fallback.risk_label, derived.as_str());
    sources.insert("risk_label", src);

    let (brief_markdown, src) =
        fields::resolve_string(raw, fields::BRIEF_MARKDOWN, &fallback.brief_markdown, "");
    sources.insert("brief_markdown", src);

    let (breakdown, src) = resolve_breakdown(raw, fallback);
    sources.insert("scoring_breakdown", src);

    let cve_stats = raw.get("cveStats").map(extract_cve_stats).unwrap_or_default();

    DisplayFields {
        app_name,
        vendor_name,
        domain,
        category,
        trust_score,
        confidence,
        evidence_coverage,
        risk_label,
        breakdown,
        brief_markdown,
        cves: extract_cves(raw),
        cve_stats,
        controls_evidence: extract_controls(raw),
        security_evidence: extract_security_evidence(raw),
        highlights: extract_highlights(raw),
        sources,
    }
}

fn resolve_breakdown(raw: &Value, fallback: &AssessmentData) -> (Vec<BreakdownEntry>, FieldSource) {
    let from_raw = fields::SCORING_BREAKDOWN.iter().find_map(|key| {
        let entries: Vec<BreakdownEntry> = raw
            .get(*key)?
            .as_object()?
            .iter()
            .filter_map(|(k, v)| number_at(v).map(|n| BreakdownEntry::new(k.clone(), n)))
            .collect();
        (!entries.is_empty()).then_some((entries, FieldSource::Raw(*key)))
    });

    if let Some(found) = from_raw {
        return found;
    }

    if !fallback.scoring_breakdown.is_empty() {
        let entries = fallback
            .scoring_breakdown
            .iter()
            .map(|(k, v)| BreakdownEntry::new(k.clone(), *v))
            .collect();
        return (entries, FieldSource::Fallback);
    }

    (Vec::new(), FieldSource::Default)
}

fn extract_cves(raw: &Value) -> Vec<CveEntry> {
    let Some(list) = fields::CVE_LIST
        .iter()
        .find_map(|path| fields::lookup(raw, path).and_then(Value::as_array))
    else {
        return Vec::new();
    };

    let mut cves: Vec<CveEntry> = list.iter().filter_map(parse_cve).collect();
    sort_by_published(&mut cves);
    cves
}

fn parse_cve(value: &Value) -> Option<CveEntry> {
    // A bare string is just an identifier.
    if let Some(id) = string_at(value) {
        return Some(CveEntry {
            id: id.to_string(),
            published: None,
            severity: Severity::Unknown,
            cvss: None,
            kev: false,
            summary: None,
        });
    }

    let (_, id) = fields::first_string(value, fields::CVE_ID)?;
    let cvss = fields::first_number(value, fields::CVE_CVSS).map(|(_, n)| n);
    let severity = fields::first_string(value, fields::CVE_SEVERITY)
        .map(|(_, s)| Severity::from_label(s))
        .filter(|s| *s != Severity::Unknown)
        .or_else(|| cvss.map(Severity::from_cvss))
        .unwrap_or(Severity::Unknown);

    Some(CveEntry {
        id: id.to_string(),
        published: fields::first_string(value, fields::CVE_PUBLISHED)
            .and_then(|(_, s)| parse_published(s)),
        severity,
        cvss,
        kev: fields::first_bool(value, fields::CVE_KEV).unwrap_or(false),
        summary: fields::first_string(value, fields::CVE_SUMMARY).map(|(_, s)| s.to_string()),
    })
}

fn extract_cve_stats(stats: &Value) -> CveStats {
    let count = |candidates: &'static [&'static str]| {
        fields::first_number(stats, candidates)
            .map(|(_, n)| n.max(0.0) as u64)
            .unwrap_or(0)
    };

    CveStats {
        total: count(fields::STATS_TOTAL),
        critical: count(fields::STATS_CRITICAL),
        high: count(fields::STATS_HIGH),
        kev: count(fields::STATS_KEV),
    }
}

fn extract_controls(raw: &Value) -> Vec<ControlEvidence> {
    let Some(map) = raw.get("controlsEvidence").and_then(Value::as_object) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(name, v)| {
            let present = bool_at(v).or_else(|| {
                // Nested form: { "sso": { "present": true, "source": "..." } }
                v.get("present").and_then(bool_at)
            })?;
            Some(ControlEvidence {
                name: name.clone(),
                present,
            })
        })
        .collect()
}

fn extract_security_evidence(raw: &Value) -> Vec<(String, String)> {
    let Some(map) = raw.get("securityEvidence").and_then(Value::as_object) else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, v)| {
            let text = match v {
                Value::String(s) if !s.trim().is_empty() => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => (if *b { "yes" } else { "no" }).to_string(),
                Value::Array(items) => {
                    let parts: Vec<&str> = items.iter().filter_map(string_at).collect();
                    if parts.is_empty() {
                        return None;
                    }
                    parts.join(", ")
                }
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect()
}

fn extract_highlights(raw: &Value) -> Vec<String> {
    raw.get("highlights")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(string_at)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
