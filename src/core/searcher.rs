/// Improvement searcher with fuzzy matching
///
/// Provides fuzzy search over every stored improvement, plus a literal
/// substring mode backed by the database.

use crate::db::{Database, SearchResult, StoredImprovement};
use crate::error::Result;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::sync::Arc;

/// Upper bound on rows pulled in for fuzzy scoring
const SEARCH_POOL: i64 = 5_000;

/// Handles improvement searching with fuzzy matching
pub struct Searcher {
    db: Arc<Database>,
    matcher: SkimMatcherV2,
}

impl Searcher {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            matcher: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Search improvements with fuzzy matching
    ///
    /// # Arguments
    /// * `query` - Search query
    /// * `limit` - Maximum results to return
    ///
    /// # Returns
    /// * `Ok(Vec<SearchResult>)` - Search results sorted by score
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let improvements = self.db.all_improvements(SEARCH_POOL).await?;
        Ok(self.rank(improvements, query, limit))
    }

    /// Literal, case-insensitive substring search, ranked like `search`
    pub async fn search_exact(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        let improvements = self.db.search_improvements(query, SEARCH_POOL).await?;
        Ok(self.rank(improvements, query, limit))
    }

    fn rank(&self, improvements: Vec<StoredImprovement>, query: &str, limit: usize) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = improvements
            .into_iter()
            .filter_map(|improvement| {
                self.matcher
                    .fuzzy_match(&improvement.search_text(), query)
                    .map(|score| SearchResult {
                        improvement,
                        score: score as f64,
                    })
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        results
    }
}
