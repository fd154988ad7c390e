use serde_json::{json, Value};

use crate::compare::summarize;
use crate::model::Assessment;
use crate::normalize::DisplayFields;

pub fn assessment_json(display: &DisplayFields, raw: &Value) -> Value {
    json!({
        "assessment": display,
        "risk_level": display.risk_level(),
        "dial": display.show_dial().then(|| display.dial_value()),
        "confidence_label": display.confidence_label(),
        "low_evidence": display.low_evidence(),
        "security_controls": display.security_controls(),
        "raw_response": raw,
    })
}

pub fn comparison_json(first: &DisplayFields, second: &DisplayFields) -> Value {
    json!({
        "first": first,
        "second": second,
        "summary": summarize(first, second),
    })
}

pub fn tools_json(category: &str, tools: &[Assessment]) -> Value {
    json!({
        "category": category,
        "tools": tools.iter().map(|t| &t.data).collect::<Vec<_>>(),
    })
}
