use tabled::{settings::Style, Table, Tabled};

use crate::compare::summarize;
use crate::model::{Assessment, Severity, Tier};
use crate::normalize::{normalize, DisplayFields};

const BAR_WIDTH: usize = 20;

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "")]
    bar: String,
    #[tabled(rename = "Rating")]
    rating: String,
}

#[derive(Tabled)]
struct CveRow {
    #[tabled(rename = "CVE")]
    id: String,
    #[tabled(rename = "Published")]
    published: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "CVSS")]
    cvss: String,
    #[tabled(rename = "KEV")]
    kev: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

#[derive(Tabled)]
struct ControlRow {
    #[tabled(rename = "Control")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct SideBySideRow {
    #[tabled(rename = "")]
    label: String,
    #[tabled(rename = "A")]
    first: String,
    #[tabled(rename = "B")]
    second: String,
}

#[derive(Tabled)]
struct SummaryTableRow {
    #[tabled(rename = "Summary")]
    metric: String,
    #[tabled(rename = "Winner")]
    winner: String,
}

#[derive(Tabled)]
struct ToolRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Product")]
    name: String,
    #[tabled(rename = "Vendor")]
    vendor: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Risk")]
    risk: String,
}

pub fn render_assessment_table(display: &DisplayFields) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n\x1b[1m{}\x1b[0m\n", display.app_name));
    if !display.vendor_name.is_empty() {
        out.push_str(&format!("{}\n", display.vendor_name));
    }
    let mut tags = Vec::new();
    if !display.category.is_empty() {
        tags.push(format!("[{}]", display.category));
    }
    if !display.domain.is_empty() {
        tags.push(display.domain.clone());
    }
    if !tags.is_empty() {
        out.push_str(&format!("{}\n", tags.join("  ")));
    }

    let tier = display.risk_level().tier();
    if display.show_dial() {
        out.push('\n');
        out.push_str(&format!(
            "Trust Score: {} / 100  {}\n",
            colorize(tier, &display.dial_value().to_string()),
            colorize(tier, &bar(display.dial_value() as f64 / 100.0)),
        ));
    }
    out.push_str(&format!("Risk: {}\n", colorize(tier, &display.risk_label)));

    out.push('\n');
    out.push_str(&format!(
        "Confidence: {} ({}%)\n",
        display.confidence_label(),
        percent(display.confidence),
    ));
    out.push_str(&format!(
        "Evidence Coverage: {}%  {}\n",
        percent(display.evidence_coverage),
        bar(display.evidence_coverage),
    ));

    if display.low_evidence() {
        out.push_str("\n\x1b[31mLow Evidence Coverage\x1b[0m\n");
        out.push_str(
            "This assessment is based on incomplete public information. Some data sources \
             were unavailable or limited. The trust score may not reflect the full security \
             posture of this product.\n",
        );
    }

    if display.show_breakdown() {
        let rows: Vec<BreakdownRow> = display
            .breakdown
            .iter()
            .map(|e| BreakdownRow {
                metric: e.label(),
                score: e.display(),
                bar: bar(e.fraction()),
                rating: colorize(e.tier, e.tier.as_str()),
            })
            .collect();

        out.push_str("\nScore Breakdown:\n");
        out.push_str(&format!("{}\n", Table::new(rows).with(Style::rounded())));

        let controls: Vec<ControlRow> = display
            .security_controls()
            .into_iter()
            .map(|c| ControlRow {
                name: c.name.to_string(),
                status: check(c.enabled),
            })
            .collect();
        out.push_str("\nSecurity Controls:\n");
        out.push_str(&format!("{}\n", Table::new(controls).with(Style::rounded())));
    }

    if !display.controls_evidence.is_empty() {
        let rows: Vec<ControlRow> = display
            .controls_evidence
            .iter()
            .map(|c| ControlRow {
                name: c.name.clone(),
                status: check(c.present),
            })
            .collect();
        out.push_str("\nControls Evidence:\n");
        out.push_str(&format!("{}\n", Table::new(rows).with(Style::rounded())));
    }

    if !display.cves.is_empty() || !display.cve_stats.is_empty() {
        out.push('\n');
        let stats = &display.cve_stats;
        out.push_str(&format!(
            "CVE History: {} total, {} critical, {} high, {} known exploited\n",
            stats.total.max(display.cves.len() as u64),
            stats.critical,
            stats.high,
            stats.kev,
        ));

        if !display.cves.is_empty() {
            let rows: Vec<CveRow> = display
                .cves
                .iter()
                .map(|c| CveRow {
                    id: c.id.clone(),
                    published: c
                        .published
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    severity: format_severity(&c.severity),
                    cvss: c
                        .cvss
                        .map(|s| format!("{:.1}", s))
                        .unwrap_or_else(|| "-".to_string()),
                    kev: if c.kev { "yes".to_string() } else { "-".to_string() },
                    summary: c
                        .summary
                        .as_deref()
                        .map(|s| truncate(s, 50))
                        .unwrap_or_else(|| "-".to_string()),
                })
                .collect();
            out.push_str(&format!("{}\n", Table::new(rows).with(Style::rounded())));
        }
    }

    if !display.security_evidence.is_empty() {
        out.push_str("\nSecurity Evidence:\n");
        for (key, value) in &display.security_evidence {
            out.push_str(&format!("  {}: {}\n", key, value));
        }
    }

    if !display.highlights.is_empty() {
        out.push_str("\nHighlights:\n");
        for h in &display.highlights {
            out.push_str(&format!("  • {}\n", h));
        }
    }

    if !display.brief_markdown.trim().is_empty() {
        out.push_str("\n\x1b[1mDetailed Assessment\x1b[0m\n");
        out.push_str(&render_brief(&display.brief_markdown));
    }

    out
}

pub fn render_comparison_table(first: &DisplayFields, second: &DisplayFields) -> String {
    let mut out = String::new();

    let side = |label: &str, a: String, b: String| SideBySideRow {
        label: label.to_string(),
        first: a,
        second: b,
    };
    let score = |d: &DisplayFields| {
        if d.show_dial() {
            colorize(d.risk_level().tier(), &format!("{} / 100", d.dial_value()))
        } else {
            "-".to_string()
        }
    };

    let mut rows = vec![
        side("Product", first.app_name.clone(), second.app_name.clone()),
        side("Vendor", first.vendor_name.clone(), second.vendor_name.clone()),
        side("Trust Score", score(first), score(second)),
        side(
            "Risk",
            colorize(first.risk_level().tier(), &first.risk_label),
            colorize(second.risk_level().tier(), &second.risk_label),
        ),
        side(
            "Confidence",
            format!("{} ({}%)", first.confidence_label(), percent(first.confidence)),
            format!("{} ({}%)", second.confidence_label(), percent(second.confidence)),
        ),
        side(
            "Evidence Coverage",
            format!("{}%", percent(first.evidence_coverage)),
            format!("{}%", percent(second.evidence_coverage)),
        ),
    ];

    let controls_a = first.security_controls();
    let controls_b = second.security_controls();
    for (i, name) in ["SSO", "MFA", "RBAC", "Audit Logs"].iter().enumerate() {
        let cell = |controls: &[crate::normalize::SecurityControl]| {
            controls
                .get(i)
                .map(|c| check(c.enabled))
                .unwrap_or_else(|| "-".to_string())
        };
        rows.push(side(*name, cell(&controls_a), cell(&controls_b)));
    }

    // Union of breakdown keys, in first-seen order.
    let mut keys: Vec<&str> = Vec::new();
    for e in first.breakdown.iter().chain(second.breakdown.iter()) {
        if !keys.contains(&e.key.as_str()) {
            keys.push(&e.key);
        }
    }
    for key in keys {
        let cell = |d: &DisplayFields| {
            d.breakdown
                .iter()
                .find(|e| e.key == key)
                .map(|e| colorize(e.tier, &e.display()))
                .unwrap_or_else(|| "-".to_string())
        };
        rows.push(side(&key.replace('_', " "), cell(first), cell(second)));
    }

    out.push_str("\nComparison Results:\n");
    out.push_str(&format!("{}\n", Table::new(rows).with(Style::rounded())));

    let summary: Vec<SummaryTableRow> = summarize(first, second)
        .into_iter()
        .map(|r| SummaryTableRow {
            metric: r.metric.to_string(),
            winner: r.winner,
        })
        .collect();
    out.push_str(&format!("\n{}\n", Table::new(summary).with(Style::rounded())));

    out
}

pub fn render_tools_table(category: &str, tools: &[Assessment]) -> String {
    let mut out = String::new();

    out.push('\n');
    if tools.is_empty() {
        out.push_str(&format!("No assessed tools found for category '{}'.\n", category));
        return out;
    }

    out.push_str(&format!("Found {} tools in '{}':\n", tools.len(), category));
    out.push('\n');

    let rows: Vec<ToolRow> = tools
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let display = normalize(&t.raw, &t.data);
            ToolRow {
                index: i + 1,
                name: truncate(&display.app_name, 40),
                vendor: truncate(&display.vendor_name, 30),
                score: if display.show_dial() {
                    display.dial_value().to_string()
                } else {
                    "-".to_string()
                },
                risk: colorize(display.risk_level().tier(), &display.risk_label),
            }
        })
        .collect();

    out.push_str(&format!("{}\n", Table::new(rows).with(Style::rounded())));
    out
}

/// Light terminal rendering of the markdown brief: headings in bold,
/// bullets indented, emphasis markers dropped.
fn render_brief(markdown: &str) -> String {
    let mut out = String::new();

    for line in markdown.lines() {
        let trimmed = line.trim_start();
        if let Some(heading) = trimmed
            .strip_prefix("### ")
            .or_else(|| trimmed.strip_prefix("## "))
            .or_else(|| trimmed.strip_prefix("# "))
        {
            out.push_str(&format!("\n\x1b[1m{}\x1b[0m\n", heading.trim()));
        } else if let Some(item) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            out.push_str(&format!("  • {}\n", item.replace("**", "")));
        } else {
            out.push_str(&format!("{}\n", line.replace("**", "")));
        }
    }

    out
}

fn colorize(tier: Tier, text: &str) -> String {
    let code = match tier {
        Tier::Good => "32",
        Tier::Medium => "33",
        Tier::Poor => "31",
    };
    format!("\x1b[{}m{}\x1b[0m", code, text)
}

fn format_severity(severity: &Severity) -> String {
    match severity {
        Severity::Critical => "\x1b[31mCRITICAL\x1b[0m".to_string(),
        Severity::High => "\x1b[91mHIGH\x1b[0m".to_string(),
        Severity::Medium => "\x1b[33mMEDIUM\x1b[0m".to_string(),
        Severity::Low => "\x1b[32mLOW\x1b[0m".to_string(),
        Severity::Unknown => "UNKNOWN".to_string(),
    }
}

fn check(ok: bool) -> String {
    if ok {
        "\x1b[32m✓\x1b[0m".to_string()
    } else {
        "\x1b[31m✗\x1b[0m".to_string()
    }
}

fn percent(fraction: f64) -> i64 {
    (fraction * 100.0).round() as i64
}

fn bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

/// Removes ANSI colour sequences, for plain-text comparisons.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
