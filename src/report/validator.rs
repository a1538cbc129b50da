/// Structural validation of improvement report documents
///
/// Collects every problem found instead of stopping at the first one.

use crate::report::model::{parse_generated, Confidence, REPORT_TITLE};
use crate::report::parser::{heading_regex, ParsedDocument, ParsedSection};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Index of the section the issue belongs to, if any
    pub section: Option<usize>,
    /// 1-based source line, when known
    pub line: Option<usize>,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {}): {}", self.severity, line, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Outcome of validating one document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    /// One-line summary: counts plus the first error
    pub fn summary(&self) -> String {
        let errors = self.errors().count();
        let warnings = self.warnings().count();

        match self.errors().next() {
            Some(first) => format!(
                "{} error(s), {} warning(s); first: {}",
                errors, warnings, first
            ),
            None => format!("0 error(s), {} warning(s)", warnings),
        }
    }

    fn error(&mut self, section: Option<usize>, line: Option<usize>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Error,
            section,
            line,
            message: message.into(),
        });
    }

    fn warning(&mut self, section: Option<usize>, line: Option<usize>, message: impl Into<String>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            section,
            line,
            message: message.into(),
        });
    }
}

/// Validate a parsed document against the report layout
pub fn validate(document: &ParsedDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    match document.titles.as_slice() {
        [] => report.error(None, None, "missing top-level heading"),
        [title] => {
            if title != REPORT_TITLE {
                report.warning(
                    None,
                    None,
                    format!("top-level heading is '{}', expected '{}'", title, REPORT_TITLE),
                );
            }
        }
        titles => report.error(
            None,
            None,
            format!("expected exactly one top-level heading, found {}", titles.len()),
        ),
    }

    match document.generated.as_deref() {
        None => report.error(None, None, "missing 'Generated:' line"),
        Some(stamp) if parse_generated(stamp).is_none() => report.warning(
            None,
            None,
            format!("'Generated:' value '{}' is not an ISO-8601 timestamp", stamp),
        ),
        Some(_) => {}
    }

    if document.sections.is_empty() {
        report.warning(None, None, "report lists no improvements");
    }

    for (index, section) in document.sections.iter().enumerate() {
        validate_section(&mut report, index, section);
    }

    report
}

fn validate_section(report: &mut ValidationReport, index: usize, section: &ParsedSection) {
    let at = Some(index);
    let line = Some(section.line);

    match section.number {
        None if heading_regex().is_match(&section.heading) => report.error(
            at,
            line,
            format!(
                "improvement number in '{}' is out of range",
                section.heading
            ),
        ),
        None => report.error(
            at,
            line,
            format!(
                "heading '{}' does not match 'Improvement <n>: <Title>'",
                section.heading
            ),
        ),
        Some(number) if number as usize != index + 1 => report.warning(
            at,
            line,
            format!("improvement numbered {}, expected {}", number, index + 1),
        ),
        Some(_) => {}
    }

    if section.title.as_deref().map_or(true, |t| t.trim().is_empty()) {
        report.error(at, line, "improvement has no title");
    }

    match section.description.as_deref() {
        None => report.error(at, line, "missing 'Description:'"),
        Some(d) if d.trim().is_empty() => report.error(at, line, "description is empty"),
        Some(_) => {}
    }

    match section.confidence.as_deref() {
        None => report.error(at, line, "missing 'Confidence:'"),
        Some(text) => {
            if Confidence::parse_percent(text).is_err() {
                report.error(
                    at,
                    line,
                    format!("confidence '{}' is not a percentage between 0 and 100", text),
                );
            }
        }
    }

    if !section.suggestions_label {
        report.error(at, line, "missing 'Suggested Changes:'");
    }

    if section.suggestions.is_empty() {
        report.error(at, line, "no suggested changes listed");
    } else if section.suggestions.iter().any(|s| s.trim().is_empty()) {
        report.error(at, line, "blank suggested change");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::parser::parse;

    fn messages(report: &ValidationReport) -> Vec<String> {
        report.issues.iter().map(|i| i.message.clone()).collect()
    }

    const VALID: &str = "# Detected Code Improvements

Generated: 2025-11-25T14:03:07.123456

## Improvement 1: Code Quality

**Description:** General code quality and maintainability improvements

**Confidence:** 60.00%

**Suggested Changes:**
- Add more comprehensive error handling
";

    #[test]
    fn test_valid_document() {
        let report = validate(&parse(VALID));
        assert!(report.is_valid(), "{:?}", report.issues);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_two_top_level_headings() {
        let doc = format!("{}\n# Another\n", VALID);
        let report = validate(&parse(&doc));
        assert!(!report.is_valid());
        assert!(messages(&report)
            .iter()
            .any(|m| m.contains("exactly one top-level heading")));
    }

    #[test]
    fn test_unexpected_title_is_warning() {
        let doc = VALID.replace("Detected Code Improvements", "Improvements");
        let report = validate(&parse(&doc));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_confidence_out_of_range() {
        let doc = VALID.replace("60.00%", "140.00%");
        let report = validate(&parse(&doc));
        assert!(!report.is_valid());
        assert!(report.summary().contains("140.00%"));
    }

    #[test]
    fn test_missing_suggestions() {
        let doc = VALID.replace("- Add more comprehensive error handling\n", "");
        let report = validate(&parse(&doc));
        assert!(messages(&report).contains(&"no suggested changes listed".to_string()));
    }

    #[test]
    fn test_numbering_gap_is_warning() {
        let doc = VALID.replace("Improvement 1:", "Improvement 3:");
        let report = validate(&parse(&doc));
        assert!(report.is_valid());
        assert!(messages(&report)
            .iter()
            .any(|m| m.contains("numbered 3, expected 1")));
    }

    #[test]
    fn test_missing_everything_collects_all_errors() {
        let report = validate(&parse("## Notes\n"));
        // heading, generated, format, description, confidence, label, suggestions
        assert_eq!(report.errors().count(), 7);
    }

    #[test]
    fn test_empty_report_warns() {
        let doc = "# Detected Code Improvements\n\nGenerated: 2025-11-25T14:03:07\n";
        let report = validate(&parse(doc));
        assert!(report.is_valid());
        assert!(messages(&report).contains(&"report lists no improvements".to_string()));
    }

    #[test]
    fn test_issue_display_includes_line() {
        let doc = VALID.replace("**Confidence:** 60.00%", "");
        let report = validate(&parse(&doc));
        let issue = report.errors().next().unwrap();
        assert_eq!(issue.to_string(), "error (line 5): missing 'Confidence:'");
    }

    #[test]
    fn test_number_overflow_reported_as_out_of_range() {
        let doc = VALID.replace("Improvement 1:", "Improvement 4294967296:");
        let report = validate(&parse(&doc));
        let errors: Vec<String> = report.errors().map(|i| i.message.clone()).collect();

        assert_eq!(
            errors,
            vec!["improvement number in 'Improvement 4294967296: Code Quality' is out of range"]
        );
    }
}
