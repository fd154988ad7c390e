mod cli;
mod json;
mod markdown;

pub use cli::{
    render_assessment_table, render_comparison_table, render_tools_table, strip_ansi,
};
pub use json::{assessment_json, comparison_json, tools_json};
pub use markdown::{render_assessment_markdown, render_comparison_markdown, render_tools_markdown};

use crate::compare::Comparison;
use crate::model::Assessment;
use crate::normalize::normalize;
use anyhow::Result;

/// Output format for assessment results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal report
    Table,
    /// JSON format for programmatic use
    Json,
    /// Markdown document for sharing
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'markdown'",
                s
            )),
        }
    }
}

pub fn format_assessment(assessment: &Assessment, format: OutputFormat) -> Result<String> {
    let display = normalize(&assessment.raw, &assessment.data);
    match format {
        OutputFormat::Table => Ok(render_assessment_table(&display)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&assessment_json(
            &display,
            &assessment.raw,
        ))?),
        OutputFormat::Markdown => Ok(render_assessment_markdown(&display)),
    }
}

pub fn format_comparison(comparison: &Comparison, format: OutputFormat) -> Result<String> {
    let (first, second) = comparison.display();
    match format {
        OutputFormat::Table => Ok(render_comparison_table(&first, &second)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&comparison_json(
            &first, &second,
        ))?),
        OutputFormat::Markdown => Ok(render_comparison_markdown(&first, &second)),
    }
}

pub fn format_tools(category: &str, tools: &[Assessment], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_tools_table(category, tools)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&tools_json(category, tools))?),
        OutputFormat::Markdown => Ok(render_tools_markdown(category, tools)),
    }
}

pub fn print_assessment(assessment: &Assessment, format: OutputFormat) -> Result<()> {
    println!("{}", format_assessment(assessment, format)?);
    Ok(())
}

pub fn print_comparison(comparison: &Comparison, format: OutputFormat) -> Result<()> {
    println!("{}", format_comparison(comparison, format)?);
    Ok(())
}

pub fn print_tools(category: &str, tools: &[Assessment], format: OutputFormat) -> Result<()> {
    println!("{}", format_tools(category, tools, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("TABLE").unwrap(), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("md").unwrap(), OutputFormat::Markdown);
        assert!(OutputFormat::from_str("sarif").is_err());
    }
}
