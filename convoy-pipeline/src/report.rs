//! Aggregate message report
//!
//! On-demand table of every error and warning recorded across a run,
//! grouped by unit and by kind. Nothing here is printed automatically;
//! callers ask for the report after inspecting their results.

use colored::Colorize;
use convoy_core::domain::result::ExecutionResult;

/// Renders the message report, or an empty string when no unit recorded
/// anything
pub fn render_summary(results: &[ExecutionResult]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for result in results {
        if result.error_messages().is_empty() && result.warning_messages().is_empty() {
            continue;
        }

        lines.push(format!("{}", result.label().bold()));

        for message in result.error_messages() {
            lines.push(format!("  {}    {}", "error".red(), message));
        }

        for message in result.warning_messages() {
            lines.push(format!("  {}  {}", "warning".yellow(), message));
        }
    }

    if lines.is_empty() {
        return String::new();
    }

    let rule = "─".repeat(60).dimmed().to_string();
    format!("{rule}\n{}\n{rule}", lines.join("\n"))
}

/// Prints the message report to stdout when there is anything to report
pub fn print_summary(results: &[ExecutionResult]) {
    let summary = render_summary(results);
    if !summary.is_empty() {
        println!("{summary}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convoy_core::domain::unit::{UnitSnapshot, UnitStatus};
    use uuid::Uuid;

    fn result(
        label: &str,
        status: UnitStatus,
        errors: Vec<&str>,
        warnings: Vec<&str>,
    ) -> ExecutionResult {
        ExecutionResult::from_snapshot(UnitSnapshot {
            id: Uuid::new_v4(),
            label: Some(label.to_string()),
            status,
            output: None,
            error_messages: errors.into_iter().map(String::from).collect(),
            warning_messages: warnings.into_iter().map(String::from).collect(),
        })
    }

    #[test]
    fn test_empty_when_nothing_recorded() {
        let results = vec![result("clean", UnitStatus::Success, vec![], vec![])];
        assert!(render_summary(&results).is_empty());
    }

    #[test]
    fn test_groups_messages_by_unit_and_kind() {
        let results = vec![
            result("clean", UnitStatus::Success, vec![], vec![]),
            result(
                "broken",
                UnitStatus::Failed,
                vec!["no such file", "permission denied"],
                vec![],
            ),
            result("flaky", UnitStatus::Warning, vec![], vec!["retried twice"]),
        ];

        let summary = render_summary(&results);
        assert!(summary.contains("broken"));
        assert!(summary.contains("no such file"));
        assert!(summary.contains("permission denied"));
        assert!(summary.contains("flaky"));
        assert!(summary.contains("retried twice"));
        assert!(!summary.contains("clean"));

        // errors are listed before warnings within a unit
        let broken = summary.find("no such file").unwrap();
        let flaky = summary.find("retried twice").unwrap();
        assert!(broken < flaky);
    }
}
