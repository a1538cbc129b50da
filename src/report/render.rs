/// Markdown rendering for improvement reports

use crate::report::model::{ImprovementReport, REPORT_TITLE};
use std::fmt::Write;

/// Render a report as the `IMPROVEMENTS.md` document
pub fn render(report: &ImprovementReport) -> String {
    let mut doc = String::new();

    // Writing into a String cannot fail
    let _ = write!(doc, "# {}\n\n", REPORT_TITLE);
    let _ = write!(doc, "Generated: {}\n\n", report.generated);

    for (i, improvement) in report.improvements.iter().enumerate() {
        let _ = write!(doc, "## Improvement {}: {}\n\n", i + 1, improvement.title());
        let _ = write!(doc, "**Description:** {}\n\n", improvement.description);
        let _ = write!(doc, "**Confidence:** {}\n\n", improvement.confidence);
        doc.push_str("**Suggested Changes:**\n");
        for change in &improvement.suggested_changes {
            let _ = writeln!(doc, "- {}", change);
        }
        doc.push('\n');
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{Confidence, Improvement, ImprovementKind};

    #[test]
    fn test_render_layout() {
        let report = ImprovementReport::with_generated(
            "2025-11-25T14:03:07.123456",
            vec![Improvement::new(
                ImprovementKind::CodeQuality,
                "General code quality and maintainability improvements",
                Confidence::new(0.6).unwrap(),
                ["Add more comprehensive error handling", "Improve logging and monitoring"],
            )],
        );

        let expected = "# Detected Code Improvements\n\n\
            Generated: 2025-11-25T14:03:07.123456\n\n\
            ## Improvement 1: Code Quality\n\n\
            **Description:** General code quality and maintainability improvements\n\n\
            **Confidence:** 60.00%\n\n\
            **Suggested Changes:**\n\
            - Add more comprehensive error handling\n\
            - Improve logging and monitoring\n\n";

        assert_eq!(render(&report), expected);
    }

    #[test]
    fn test_render_numbers_in_order() {
        let make = |kind| {
            Improvement::new(kind, "d", Confidence::new(0.5).unwrap(), ["c"])
        };
        let report = ImprovementReport::with_generated(
            "2025-11-25T14:03:07",
            vec![
                make(ImprovementKind::AutomationExpansion),
                make(ImprovementKind::FeatureEnhancement),
            ],
        );

        let doc = render(&report);
        let first = doc.find("## Improvement 1: Automation Expansion").unwrap();
        let second = doc.find("## Improvement 2: Feature Enhancement").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_empty_report() {
        let report = ImprovementReport::with_generated("2025-11-25T14:03:07", vec![]);
        assert_eq!(
            render(&report),
            "# Detected Code Improvements\n\nGenerated: 2025-11-25T14:03:07\n\n"
        );
    }
}
