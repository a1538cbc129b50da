// Stores reports in the history database
//
// Refuses empty reports and reports with incomplete improvement records.

use crate::db::Database;
use crate::error::{ReportError, Result};
use crate::report::ImprovementReport;
use std::sync::Arc;
use tracing::{info, warn};

// A report with more records than this is almost certainly not a real one
const MAX_IMPROVEMENTS: usize = 1_000;

pub struct ReportRecorder {
    db: Arc<Database>,
}

impl ReportRecorder {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    // Check the report, then store it in one transaction
    pub async fn record(&self, report: &ImprovementReport, source: Option<&str>) -> Result<i64> {
        self.validate_report(report)?;

        let id = self.db.store_report(report, source).await?;
        info!(id, improvements = report.len(), source, "stored improvement report");

        Ok(id)
    }

    /// Parse a Markdown report strictly and store it
    pub async fn import_markdown(&self, markdown: &str, source: Option<&str>) -> Result<i64> {
        let report = ImprovementReport::from_markdown(markdown)?;
        self.record(&report, source).await
    }

    fn validate_report(&self, report: &ImprovementReport) -> Result<()> {
        if report.is_empty() {
            return Err(ReportError::InvalidReport("report has no improvements".to_string()));
        }

        if report.len() > MAX_IMPROVEMENTS {
            return Err(ReportError::InvalidReport(format!(
                "report has {} improvements, at most {} are accepted",
                report.len(),
                MAX_IMPROVEMENTS
            )));
        }

        if report.generated_at().is_none() {
            // Hand-written reports may carry any stamp; keep it as text
            warn!(generated = %report.generated, "report stamp is not an ISO-8601 timestamp");
        }

        for (i, improvement) in report.improvements.iter().enumerate() {
            let problems = improvement.problems();
            if !problems.is_empty() {
                return Err(ReportError::InvalidReport(format!(
                    "improvement {} ({}): {}",
                    i + 1,
                    improvement.title(),
                    problems.join(", ")
                )));
            }
        }

        Ok(())
    }
}
