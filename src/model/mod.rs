//! Core data types for assessments and their display tiers.
//!
//! This module contains the fundamental types used throughout hawkshot:
//!
//! - [`AssessmentData`] - The canonical assessment shape returned by the service
//! - [`Assessment`] - A typed assessment paired with the untouched response body
//! - [`RiskLevel`] - The three-way risk label derived from a trust score
//! - [`Tier`] - Good / medium / poor classification used for colouring
//! - [`CveEntry`] - One CVE record pulled out of a raw response
//!
//! # Example
//!
//! ```
//! use hawkshot::model::{AssessmentData, RiskLevel};
//!
//! let data = AssessmentData {
//!     app_name: "Slack".to_string(),
//!     trust_score: 82.0,
//!     ..AssessmentData::default()
//! };
//!
//! assert_eq!(RiskLevel::from_score(data.trust_score), RiskLevel::Lower);
//! ```

mod assessment;
mod cve;
mod risk;
mod value;

pub use assessment::*;
pub use cve::*;
pub use risk::*;
pub use value::*;
