use crate::compare::summarize;
use crate::model::Assessment;
use crate::normalize::{normalize, DisplayFields};

pub fn render_assessment_markdown(display: &DisplayFields) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", display.app_name));
    if !display.vendor_name.is_empty() {
        out.push_str(&format!("**Vendor:** {}  \n", display.vendor_name));
    }
    if !display.category.is_empty() {
        out.push_str(&format!("**Category:** {}  \n", display.category));
    }
    if display.show_dial() {
        out.push_str(&format!("**Trust Score:** {} / 100  \n", display.dial_value()));
    }
    out.push_str(&format!("**Risk:** {}  \n", display.risk_label));
    out.push_str(&format!(
        "**Confidence:** {} ({:.0}%)  \n",
        display.confidence_label(),
        display.confidence * 100.0,
    ));
    out.push_str(&format!(
        "**Evidence Coverage:** {:.0}%\n",
        display.evidence_coverage * 100.0
    ));

    if display.low_evidence() {
        out.push_str(
            "\n> **Low Evidence Coverage.** This assessment is based on incomplete public \
             information; the trust score may not reflect the full security posture.\n",
        );
    }

    if display.show_breakdown() {
        out.push_str("\n## Score Breakdown\n\n");
        out.push_str("| Metric | Score | Rating |\n");
        out.push_str("|--------|-------|--------|\n");
        for entry in &display.breakdown {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                entry.label(),
                entry.display(),
                entry.tier.as_str(),
            ));
        }

        out.push_str("\n## Security Controls\n\n");
        for control in display.security_controls() {
            let mark = if control.enabled { "x" } else { " " };
            out.push_str(&format!("- [{}] {}\n", mark, control.name));
        }
    }

    if !display.cves.is_empty() {
        out.push_str("\n## CVE History\n\n");
        out.push_str("| CVE | Published | Severity | CVSS | KEV |\n");
        out.push_str("|-----|-----------|----------|------|-----|\n");
        for cve in &display.cves {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                cve.id,
                cve.published
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                cve.severity.as_str(),
                cve.cvss
                    .map(|s| format!("{:.1}", s))
                    .unwrap_or_else(|| "-".to_string()),
                if cve.kev { "yes" } else { "-" },
            ));
        }
    }

    if !display.highlights.is_empty() {
        out.push_str("\n## Highlights\n\n");
        for h in &display.highlights {
            out.push_str(&format!("- {}\n", h));
        }
    }

    if !display.brief_markdown.trim().is_empty() {
        out.push_str("\n## Detailed Assessment\n\n");
        out.push_str(&format!("{}\n", display.brief_markdown.trim_end()));
    }

    out
}

pub fn render_comparison_markdown(first: &DisplayFields, second: &DisplayFields) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} vs {}\n\n", first.app_name, second.app_name));
    out.push_str(&format!("| | {} | {} |\n", first.app_name, second.app_name));
    out.push_str("|---|---|---|\n");
    out.push_str(&format!(
        "| Trust Score | {} | {} |\n",
        score_cell(first),
        score_cell(second)
    ));
    out.push_str(&format!("| Risk | {} | {} |\n", first.risk_label, second.risk_label));
    out.push_str(&format!(
        "| Confidence | {} | {} |\n",
        first.confidence_label(),
        second.confidence_label(),
    ));
    out.push_str(&format!(
        "| Evidence Coverage | {:.0}% | {:.0}% |\n",
        first.evidence_coverage * 100.0,
        second.evidence_coverage * 100.0,
    ));

    out.push_str("\n## Summary\n\n");
    for row in summarize(first, second) {
        out.push_str(&format!("- **{}:** {}\n", row.metric, row.winner));
    }

    out
}

pub fn render_tools_markdown(category: &str, tools: &[Assessment]) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", category));
    if tools.is_empty() {
        out.push_str("No assessed tools found.\n");
        return out;
    }

    out.push_str("| # | Product | Vendor | Score | Risk |\n");
    out.push_str("|---|---------|--------|-------|------|\n");
    for (i, tool) in tools.iter().enumerate() {
        let display = normalize(&tool.raw, &tool.data);
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            i + 1,
            display.app_name,
            display.vendor_name,
            score_cell(&display),
            display.risk_label,
        ));
    }

    out
}

/// Dial value, or `-` when the service sent no score.
fn score_cell(display: &DisplayFields) -> String {
    if display.show_dial() {
        display.dial_value().to_string()
    } else {
        "-".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssessmentData;
    use serde_json::json;

    #[test]
    fn test_assessment_markdown() {
        let display = normalize(
            &json!({
                "app_name": "Slack",
                "trust_score": 82,
                "confidence": 0.78,
                "evidence_coverage": 0.45,
                "scoring_breakdown": { "identity": 0.9 },
                "brief_markdown": "## Overview\nFine."
            }),
            &AssessmentData::default(),
        );

        let md = render_assessment_markdown(&display);

        assert!(md.starts_with("# Slack\n"));
        assert!(md.contains("**Trust Score:** 82 / 100"));
        assert!(md.contains("**Risk:** Lower Risk"));
        assert!(md.contains("Low Evidence Coverage"));
        assert!(md.contains("| identity | 90% | good |"));
        assert!(md.contains("- [x] SSO"));
        assert!(md.contains("- [ ] MFA"));
        assert!(md.ends_with("## Overview\nFine.\n"));
    }

    #[test]
    fn test_comparison_markdown_summary() {
        let a = normalize(&json!({ "app_name": "Slack", "trust_score": 82 }), &AssessmentData::default());
        let b = normalize(&json!({ "app_name": "Notion", "trust_score": 68 }), &AssessmentData::default());

        let md = render_comparison_markdown(&a, &b);

        assert!(md.contains("- **Higher Trust Score:** Slack"));
        assert!(md.contains("- **Higher Confidence:** Tied"));
    }

    #[test]
    fn test_tools_markdown_numbered() {
        let tools = vec![Assessment::from_raw(json!({ "product": "Teams", "trust_score": 71 }))];
        let md = render_tools_markdown("Chat", &tools);

        assert!(md.contains("| 1 | Teams |"));
    }

    #[test]
    fn test_missing_score_is_dash() {
        let a = normalize(&json!({ "app_name": "Slack", "trust_score": 82 }), &AssessmentData::default());
        let b = normalize(&json!({ "app_name": "Unscored" }), &AssessmentData::default());

        let md = render_comparison_markdown(&a, &b);
        assert!(md.contains("| Trust Score | 82 | - |"));

        let tools = vec![Assessment::from_raw(json!({ "product": "Unscored" }))];
        let md = render_tools_markdown("Chat", &tools);
        assert!(md.contains("| 1 | Unscored |  | - | High Risk |"));
    }
}
