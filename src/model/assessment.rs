use serde::{Serialize, Serializer};
use serde_json::Value;

use super::{number_at, string_at};

/// The assessment shape the rest of the crate works with.
///
/// Every field defaults to zero or empty, so a sparse service response still
/// yields a usable value; dependent display sections are simply omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssessmentData {
    pub app_name: String,
    pub vendor_name: String,
    pub category: String,
    /// Nominally an integer in 0..=100.
    pub trust_score: f64,
    /// Fraction in 0..=1.
    pub confidence: f64,
    /// Fraction in 0..=1.
    pub evidence_coverage: f64,
    pub risk_label: String,
    /// Per-category sub-scores, each on a 0-1 or 0-10 scale, in the order
    /// the service listed them.
    #[serde(serialize_with = "serialize_breakdown")]
    pub scoring_breakdown: Vec<(String, f64)>,
    pub brief_markdown: String,
}

impl AssessmentData {
    /// Reads the canonical field names out of an arbitrary JSON value.
    ///
    /// Unlike `serde_json::from_value`, a wrong-typed field falls back to its
    /// default instead of failing the whole conversion. Numeric strings are
    /// accepted wherever a number is expected. Alternate field names are the
    /// normalizer's job, not this function's.
    pub fn from_value(value: &Value) -> Self {
        let scoring_breakdown = value
            .get("scoring_breakdown")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .filter_map(|(key, v)| number_at(v).map(|n| (key.clone(), n)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            app_name: string_field(value, "app_name"),
            vendor_name: string_field(value, "vendor_name"),
            category: string_field(value, "category"),
            trust_score: number_field(value, "trust_score"),
            confidence: number_field(value, "confidence"),
            evidence_coverage: number_field(value, "evidence_coverage"),
            risk_label: string_field(value, "risk_label"),
            scoring_breakdown,
            brief_markdown: string_field(value, "brief_markdown"),
        }
    }
}

fn serialize_breakdown<S>(entries: &[(String, f64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(string_at)
        .map(str::to_string)
        .unwrap_or_default()
}

fn number_field(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(number_at).unwrap_or(0.0)
}

/// A successful assessment: the typed view plus a deep copy of the raw body.
///
/// The raw copy is kept unmodified so the normalizer can look up alternate
/// field names and nested evidence objects the canonical shape has no room for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub data: AssessmentData,
    pub raw: Value,
}

impl Assessment {
    pub fn from_raw(raw: Value) -> Self {
        Self {
            data: AssessmentData::from_value(&raw),
            raw,
        }
    }
}
