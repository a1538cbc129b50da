/// Report retriever
///
/// Loads stored reports back out of the history database.

use crate::db::{Database, ReportSummary};
use crate::error::Result;
use crate::report::ImprovementReport;
use std::sync::Arc;

/// Handles report retrieval operations
pub struct Retriever {
    db: Arc<Database>,
}

impl Retriever {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Most recently stored reports
    pub async fn recent(&self, limit: i64) -> Result<Vec<ReportSummary>> {
        self.db.get_recent_reports(limit).await
    }

    /// Rebuild a full report by ID, improvements in stored order
    pub async fn load(&self, id: i64) -> Result<Option<ImprovementReport>> {
        let Some(header) = self.db.get_report_by_id(id).await? else {
            return Ok(None);
        };

        let improvements = self
            .db
            .get_improvements(id)
            .await?
            .iter()
            .map(|row| row.to_improvement())
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(ImprovementReport::with_generated(header.generated, improvements)))
    }

    /// Delete a report; false when no such report exists
    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.db.delete_report(id).await
    }
}
