use serde::{Deserialize, Serialize};

/// Risk label derived from a 0-100 trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Lower,
    Medium,
    High,
}

impl RiskLevel {
    /// `>= 70` is lower risk, `>= 40` medium, anything else high.
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskLevel::Lower
        } else if score >= 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Lower => "Lower Risk",
            RiskLevel::Medium => "Medium Risk",
            RiskLevel::High => "High Risk",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            RiskLevel::Lower => Tier::Good,
            RiskLevel::Medium => Tier::Medium,
            RiskLevel::High => Tier::Poor,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colour / severity bucket for any displayed metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Good,
    Medium,
    Poor,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Good => "good",
            Tier::Medium => "medium",
            Tier::Poor => "poor",
        }
    }
}

/// Whether a higher value of a metric is better or worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Higher is better (identity, controls, compliance, ...).
    Quality,
    /// Lower is better (cve_risk, incident_risk, ...).
    Risk,
}

impl MetricKind {
    /// Any key mentioning "risk" or "cve" is a risk metric.
    pub fn classify(key: &str) -> Self {
        let key = key.to_lowercase();
        if key.contains("risk") || key.contains("cve") {
            MetricKind::Risk
        } else {
            MetricKind::Quality
        }
    }

    /// Buckets a 0..=1 fraction.
    ///
    /// Quality: `>= 0.7` good, `>= 0.4` medium. Risk: `<= 0.3` good,
    /// `<= 0.6` medium.
    pub fn tier(&self, fraction: f64) -> Tier {
        match self {
            MetricKind::Quality => match fraction {
                f if f >= 0.7 => Tier::Good,
                f if f >= 0.4 => Tier::Medium,
                _ => Tier::Poor,
            },
            MetricKind::Risk => match fraction {
                f if f <= 0.3 => Tier::Good,
                f if f <= 0.6 => Tier::Medium,
                _ => Tier::Poor,
            },
        }
    }
}

/// Qualitative label for a 0..=1 confidence value.
pub fn confidence_label(confidence: f64) -> &'static str {
    if confidence >= 0.7 {
        "High"
    } else if confidence >= 0.4 {
        "Medium"
    } else {
        "Low"
    }
}
