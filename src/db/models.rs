/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.

use crate::error::Result;
use crate::report::{Confidence, Improvement, ImprovementKind};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored report header
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredReport {
    pub id: i64,
    pub generated: String,
    pub source: Option<String>, // file path or "detect"
    pub created_at: String,     // ISO 8601 format from SQLite
}

/// Report header plus aggregate numbers, for listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportSummary {
    pub id: i64,
    pub generated: String,
    pub source: Option<String>,
    pub created_at: String,
    pub improvement_count: i64,
    pub average_confidence: Option<f64>,
}

/// A stored improvement record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredImprovement {
    pub id: i64,
    pub report_id: i64,
    pub position: i64,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub confidence: f64,
    pub suggested_changes: String, // JSON array
}

impl StoredImprovement {
    /// Parse suggested changes from JSON
    pub fn get_changes(&self) -> Vec<String> {
        serde_json::from_str(&self.suggested_changes).unwrap_or_default()
    }

    /// Text the fuzzy searcher matches against
    pub fn search_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for change in self.get_changes() {
            text.push(' ');
            text.push_str(&change);
        }
        text
    }

    pub fn to_improvement(&self) -> Result<Improvement> {
        Ok(Improvement {
            kind: ImprovementKind::from_parts(&self.kind, &self.title),
            description: self.description.clone(),
            confidence: Confidence::new(self.confidence)?,
            suggested_changes: serde_json::from_str(&self.suggested_changes)?,
        })
    }
}

/// Search hit with fuzzy score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub improvement: StoredImprovement,
    pub score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> StoredImprovement {
        StoredImprovement {
            id: 1,
            report_id: 1,
            position: 0,
            kind: "code_quality".to_string(),
            title: "Code Quality".to_string(),
            description: "General code quality".to_string(),
            confidence: 0.6,
            suggested_changes: r#"["Add error handling","Improve logging"]"#.to_string(),
        }
    }

    #[test]
    fn test_get_changes() {
        let changes = stored().get_changes();
        assert_eq!(changes.len(), 2);
        assert!(changes.contains(&"Improve logging".to_string()));
    }

    #[test]
    fn test_get_changes_bad_json() {
        let mut row = stored();
        row.suggested_changes = "not json".to_string();
        assert!(row.get_changes().is_empty());
        assert!(row.to_improvement().is_err());
    }

    #[test]
    fn test_to_improvement() {
        let improvement = stored().to_improvement().unwrap();
        assert_eq!(improvement.kind, ImprovementKind::CodeQuality);
        assert_eq!(improvement.confidence.to_string(), "60.00%");
    }

    #[test]
    fn test_search_text() {
        let text = stored().search_text();
        assert!(text.starts_with("Code Quality General code quality"));
        assert!(text.ends_with("Improve logging"));
    }

    #[test]
    fn test_to_improvement_keeps_custom_title() {
        let mut row = stored();
        row.kind = "api_docs".to_string();
        row.title = "API Docs".to_string();

        let improvement = row.to_improvement().unwrap();
        assert_eq!(improvement.kind.slug(), "api_docs");
        assert_eq!(improvement.title(), "API Docs");
    }
}
