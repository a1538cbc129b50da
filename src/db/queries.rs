/// SQL query functions for database operations
///
/// All queries use sqlx with bound parameters.

use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use crate::report::ImprovementReport;
use sqlx::Row;

impl Database {
    /// Store a report and all of its improvements
    ///
    /// Runs in one transaction, so a report is never stored half-way.
    ///
    /// # Arguments
    /// * `report` - Report to store
    /// * `source` - Where it came from (file path, "detect", ...)
    ///
    /// # Returns
    /// * `Ok(i64)` - The report ID
    pub async fn store_report(&self, report: &ImprovementReport, source: Option<&str>) -> Result<i64> {
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query("INSERT INTO reports (generated, source) VALUES (?, ?) RETURNING id")
            .bind(&report.generated)
            .bind(source)
            .fetch_one(&mut *tx)
            .await?;
        let report_id: i64 = row.get(0);

        for (position, improvement) in report.improvements.iter().enumerate() {
            let changes_json = serde_json::to_string(&improvement.suggested_changes)?;

            sqlx::query(
                r#"
                INSERT INTO improvements
                    (report_id, position, kind, title, description, confidence, suggested_changes)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(report_id)
            .bind(position as i64)
            .bind(improvement.kind.slug())
            .bind(improvement.title())
            .bind(&improvement.description)
            .bind(improvement.confidence.value())
            .bind(changes_json)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(report_id)
    }

    /// Most recently stored reports first
    pub async fn get_recent_reports(&self, limit: i64) -> Result<Vec<ReportSummary>> {
        let reports = sqlx::query_as::<_, ReportSummary>(
            r#"
            SELECT r.id, r.generated, r.source, r.created_at,
                   COUNT(i.id) AS improvement_count,
                   AVG(i.confidence) AS average_confidence
            FROM reports r
            LEFT JOIN improvements i ON i.report_id = r.id
            GROUP BY r.id
            ORDER BY r.created_at DESC, r.id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(reports)
    }

    /// Get report header by ID
    pub async fn get_report_by_id(&self, id: i64) -> Result<Option<StoredReport>> {
        let report = sqlx::query_as::<_, StoredReport>("SELECT * FROM reports WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(report)
    }

    /// Improvements of one report, in report order
    pub async fn get_improvements(&self, report_id: i64) -> Result<Vec<StoredImprovement>> {
        let improvements = sqlx::query_as::<_, StoredImprovement>(
            "SELECT * FROM improvements WHERE report_id = ? ORDER BY position ASC",
        )
        .bind(report_id)
        .fetch_all(self.pool())
        .await?;

        Ok(improvements)
    }

    /// Search improvements by text (case-insensitive)
    ///
    /// `%` and `_` in the query match themselves.
    ///
    /// # Arguments
    /// * `query` - Substring matched against title, description and changes
    /// * `limit` - Maximum results
    pub async fn search_improvements(&self, query: &str, limit: i64) -> Result<Vec<StoredImprovement>> {
        let pattern = format!("%{}%", escape_like(query));

        let improvements = sqlx::query_as::<_, StoredImprovement>(
            r#"
            SELECT * FROM improvements
            WHERE title LIKE ? ESCAPE '\'
               OR description LIKE ? ESCAPE '\'
               OR suggested_changes LIKE ? ESCAPE '\'
            ORDER BY confidence DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(improvements)
    }

    /// Every stored improvement, newest first
    pub async fn all_improvements(&self, limit: i64) -> Result<Vec<StoredImprovement>> {
        let improvements = sqlx::query_as::<_, StoredImprovement>(
            "SELECT * FROM improvements ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        Ok(improvements)
    }

    /// Delete a report and its improvements
    ///
    /// # Returns
    /// * `Ok(true)` - If a report was deleted
    pub async fn delete_report(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
