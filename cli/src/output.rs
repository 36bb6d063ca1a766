//! Result formatting for the console.

use colored::Colorize;
use redline_application::{DocumentAnalysis, ReconciledFindings};
use serde_json::json;

/// Render a plugin-pipeline analysis as human-readable text.
pub fn format_analysis(analysis: &DocumentAnalysis, summary_only: bool) -> String {
    let mut out = String::new();

    if !summary_only {
        out.push_str(&format!("{}\n", "Routing".bold()));
        let mut decisions: Vec<_> = analysis.routing.decisions.values().collect();
        decisions.sort_by(|a, b| a.plugin_name.cmp(&b.plugin_name));
        for decision in decisions {
            out.push_str(&format!(
                "  {} -> {} chunks ({})\n",
                decision.plugin_name,
                decision.chunks.len(),
                decision.reason
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "Results".bold()));
    let mut executions: Vec<_> = analysis.executions.iter().collect();
    executions.sort_by(|a, b| a.plugin_name.cmp(&b.plugin_name));
    for execution in executions {
        match execution.output() {
            Some(output) => {
                out.push_str(&format!(
                    "  {} {}: {}\n",
                    "✓".green(),
                    execution.plugin_name,
                    output.summary
                ));
                for finding in &output.findings {
                    let location = finding
                        .chunk_id
                        .as_ref()
                        .map(|id| format!(" [{}]", id))
                        .unwrap_or_default();
                    out.push_str(&format!("      - {}{}\n", finding.description, location));
                }
            }
            None => {
                out.push_str(&format!(
                    "  {} {}: {}\n",
                    "✗".red(),
                    execution.plugin_name,
                    execution.error().unwrap_or("unknown error")
                ));
            }
        }
    }

    out.push_str(&format!(
        "\nTotal cost: ${:.4}\n",
        analysis.total_cost_usd()
    ));
    out
}

/// Render a plugin-pipeline analysis as JSON.
pub fn format_analysis_json(analysis: &DocumentAnalysis) -> String {
    let value = json!({
        "routing": analysis.routing,
        "executions": analysis.executions,
        "total_cost_usd": analysis.total_cost_usd(),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

/// Render reconciled ensemble findings as human-readable text.
pub fn format_findings(findings: &ReconciledFindings, summary_only: bool) -> String {
    let mut out = String::new();

    if !summary_only {
        out.push_str(&format!("{}\n", "Extractors".bold()));
        for result in &findings.extraction.extractor_results {
            match &result.error {
                None => out.push_str(&format!(
                    "  {} {}: {} issues in {} ms\n",
                    "✓".green(),
                    result.extractor_id,
                    result.issues.len(),
                    result.duration_ms
                )),
                Some(error) => out.push_str(&format!(
                    "  {} {}: {}\n",
                    "✗".red(),
                    result.extractor_id,
                    error
                )),
            }
        }
        out.push_str(&format!(
            "\n  {} raw issues, {} after dedup ({} duplicates, {} malformed)\n",
            findings.extraction.total_issues_found,
            findings.candidates.len(),
            findings.duplicates_removed,
            findings.malformed_removed
        ));
        if findings.judge_degraded {
            out.push_str(&format!(
                "  {} arbitration failed; showing deduplicated candidates\n",
                "!".yellow()
            ));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n", "Findings".bold()));
    for issue in findings.final_issues() {
        out.push_str(&format!(
            "  - {:?} (severity {}, confidence {})\n",
            issue.exact_text, issue.severity, issue.confidence
        ));
    }
    if let Some(judgment) = &findings.judgment {
        for rejected in &judgment.rejected {
            out.push_str(&format!(
                "  {} rejected: {:?} ({})\n",
                "✗".dimmed(),
                rejected.issue.exact_text,
                rejected.reasoning
            ));
        }
    }

    out
}

/// Render reconciled ensemble findings as JSON.
pub fn format_findings_json(findings: &ReconciledFindings) -> String {
    let value = json!({
        "extraction": findings.extraction,
        "candidates": findings.candidates,
        "duplicates_removed": findings.duplicates_removed,
        "malformed_removed": findings.malformed_removed,
        "judgment": findings.judgment,
        "judge_degraded": findings.judge_degraded,
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_domain::{
        AnalysisOutput, ExecutionResult, ExtractedIssue, ExtractorConfig, ExtractorId,
        ExtractorResult, IssueProvenance, MultiExtractorResult, RoutingDecision, RoutingResult,
    };
    use std::collections::HashMap;

    fn sample_analysis() -> DocumentAnalysis {
        let mut decisions = HashMap::new();
        decisions.insert(
            "spelling".into(),
            RoutingDecision::always_run("spelling", vec![]),
        );
        DocumentAnalysis {
            routing: RoutingResult::new(decisions, 0.01, 12),
            executions: vec![
                ExecutionResult::success(
                    "spelling",
                    1,
                    300,
                    AnalysisOutput::new("2 typos", "details"),
                ),
                ExecutionResult::failure("math", 2, 900, "timed out"),
            ],
        }
    }

    #[test]
    fn test_format_analysis_mentions_all_plugins() {
        let text = format_analysis(&sample_analysis(), false);
        assert!(text.contains("spelling"));
        assert!(text.contains("2 typos"));
        assert!(text.contains("timed out"));
        assert!(text.contains("Routing"));
    }

    #[test]
    fn test_summary_only_skips_routing() {
        let text = format_analysis(&sample_analysis(), true);
        assert!(!text.contains("Routing"));
        assert!(text.contains("Results"));
    }

    #[test]
    fn test_format_analysis_json_roundtrips() {
        let text = format_analysis_json(&sample_analysis());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(value["routing"]["decisions"]["spelling"].is_object());
        assert_eq!(value["executions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_format_findings_lists_final_issues() {
        let issue = ExtractedIssue::new("the sky is green", 80, 90);
        let findings = ReconciledFindings {
            extraction: MultiExtractorResult::new(
                vec![ExtractorResult::completed(
                    ExtractorId::new("m"),
                    ExtractorConfig::new("m"),
                    vec![issue.clone()],
                    10,
                    None,
                )],
                10,
            ),
            candidates: vec![IssueProvenance::new(issue, vec![ExtractorId::new("m")])],
            duplicates_removed: 0,
            malformed_removed: 0,
            judgment: None,
            judge_degraded: false,
        };

        let text = format_findings(&findings, false);
        assert!(text.contains("the sky is green"));
        assert!(text.contains("severity 80"));
    }
}
