//! Side-by-side comparison of two assessments.
//!
//! Two flows are supported: assessing two free-text queries concurrently,
//! and picking a tool out of a category listing. Both end in [`Assessment`]
//! values rendered with the same summary.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::client::AssessmentClient;
use crate::error::ApiError;
use crate::model::{Assessment, AssessmentData};
use crate::normalize::{normalize, DisplayFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    First,
    Second,
    Tied,
}

impl Outcome {
    /// Higher is better; equal values tie.
    pub fn of(first: f64, second: f64) -> Self {
        if first > second {
            Outcome::First
        } else if second > first {
            Outcome::Second
        } else {
            Outcome::Tied
        }
    }
}

/// One line of the comparison summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub metric: &'static str,
    pub outcome: Outcome,
    /// Winner's app name, or `"Tied"`.
    pub winner: String,
}

/// Two assessments fetched for comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: Assessment,
    pub second: Assessment,
}

impl Comparison {
    pub fn display(&self) -> (DisplayFields, DisplayFields) {
        (
            normalize(&self.first.raw, &self.first.data),
            normalize(&self.second.raw, &self.second.data),
        )
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        let (first, second) = self.display();
        summarize(&first, &second)
    }
}

/// Higher trust score, higher confidence, better evidence coverage.
pub fn summarize(first: &DisplayFields, second: &DisplayFields) -> Vec<SummaryRow> {
    let row = |metric: &'static str, a: f64, b: f64| {
        let outcome = Outcome::of(a, b);
        let winner = match outcome {
            Outcome::First => first.app_name.clone(),
            Outcome::Second => second.app_name.clone(),
            Outcome::Tied => "Tied".to_string(),
        };
        SummaryRow {
            metric,
            outcome,
            winner,
        }
    };

    vec![
        row("Higher Trust Score", first.trust_score, second.trust_score),
        row("Higher Confidence", first.confidence, second.confidence),
        row(
            "Better Evidence Coverage",
            first.evidence_coverage,
            second.evidence_coverage,
        ),
    ]
}

/// Assesses both queries concurrently. Either failure fails the comparison;
/// there are no partial results.
pub async fn compare_products(
    client: &AssessmentClient,
    first: &str,
    second: &str,
) -> Result<Comparison, ApiError> {
    if first.trim().is_empty() || second.trim().is_empty() {
        return Err(ApiError::EmptyQuery);
    }

    debug!(first, second, "comparing products");
    let (first, second) = tokio::try_join!(client.assess(first), client.assess(second))?;
    Ok(Comparison { first, second })
}

/// Converts one category-listing entry into the canonical shape, using the
/// same field resolution as the results view.
pub fn tool_to_assessment(entry: &Value) -> AssessmentData {
    let display = normalize(entry, &AssessmentData::default());

    AssessmentData {
        app_name: display.app_name,
        vendor_name: display.vendor_name,
        category: display.category,
        trust_score: display.trust_score,
        confidence: display.confidence,
        evidence_coverage: display.evidence_coverage,
        risk_label: display.risk_label,
        scoring_breakdown: display
            .breakdown
            .into_iter()
            .map(|e| (e.key, e.value))
            .collect(),
        brief_markdown: display.brief_markdown,
    }
}

/// Fetches a category listing and converts every entry.
pub async fn list_tools(
    client: &AssessmentClient,
    category: &str,
) -> Result<Vec<Assessment>, ApiError> {
    let entries = client.list_category(category).await?;
    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .map(|raw| Assessment {
            data: tool_to_assessment(&raw),
            raw,
        })
        .collect())
}
