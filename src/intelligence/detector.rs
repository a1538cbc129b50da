// Turns research results into improvement suggestions
//
// Three rules fire on strong research signals, and two baseline
// improvements are always suggested.

use crate::error::{ReportError, Result};
use crate::intelligence::ResearchResults;
use crate::report::{Confidence, Improvement, ImprovementKind, ImprovementReport};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cut-offs the conditional rules compare against (strictly greater than)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionThresholds {
    pub intelligence_score: f64,
    pub central_concepts: usize,
    pub automation_success_rate: f64,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            intelligence_score: 80.0,
            central_concepts: 10,
            automation_success_rate: 0.9,
        }
    }
}

impl DetectionThresholds {
    pub fn validate(&self) -> Result<()> {
        if !self.intelligence_score.is_finite() || self.intelligence_score < 0.0 {
            return Err(ReportError::Config(format!(
                "intelligence_score threshold must be a non-negative number, got {}",
                self.intelligence_score
            )));
        }

        if !(0.0..=1.0).contains(&self.automation_success_rate) {
            return Err(ReportError::Config(format!(
                "automation_success_rate threshold must be between 0 and 1, got {}",
                self.automation_success_rate
            )));
        }

        Ok(())
    }
}

pub struct ImprovementDetector {
    thresholds: DetectionThresholds,
}

impl ImprovementDetector {
    pub fn new(thresholds: DetectionThresholds) -> Self {
        Self { thresholds }
    }

    // Rule order decides report order
    pub fn detect(&self, results: &ResearchResults) -> Vec<Improvement> {
        let mut improvements = Vec::new();

        let score = results.intelligence_score();
        if score > self.thresholds.intelligence_score {
            debug!(score, "intelligence score above threshold");
            improvements.push(improvement(
                ImprovementKind::PerformanceOptimization,
                "High intelligence score suggests optimization opportunities".to_string(),
                0.8,
                &[
                    "Optimize pattern matching algorithms",
                    "Improve heuristic intelligence scoring",
                    "Enhance automation task efficiency",
                ],
            ));
        }

        let concepts = results.central_concept_count();
        if concepts > self.thresholds.central_concepts {
            debug!(concepts, "many central concepts found");
            improvements.push(improvement(
                ImprovementKind::IntelligenceEnhancement,
                format!("Found {} central concepts - expand knowledge base", concepts),
                0.9,
                &[
                    "Add more sophisticated concept clustering",
                    "Implement advanced semantic analysis",
                    "Enhance cross-domain correlation detection",
                ],
            ));
        }

        let success_rate = results.automation_success_rate();
        if success_rate > self.thresholds.automation_success_rate {
            debug!(success_rate, "automation success rate above threshold");
            improvements.push(improvement(
                ImprovementKind::AutomationExpansion,
                "High automation success rate indicates expansion potential".to_string(),
                0.7,
                &[
                    "Add more automation rules",
                    "Implement intelligent task prioritization",
                    "Create automated reporting workflows",
                ],
            ));
        }

        improvements.extend(baseline_improvements());

        improvements
    }

    /// Detect and wrap the result in a freshly stamped report
    pub fn detect_report(&self, results: &ResearchResults) -> ImprovementReport {
        ImprovementReport::new(self.detect(results))
    }
}

impl Default for ImprovementDetector {
    fn default() -> Self {
        Self::new(DetectionThresholds::default())
    }
}

fn baseline_improvements() -> Vec<Improvement> {
    vec![
        improvement(
            ImprovementKind::CodeQuality,
            "General code quality and maintainability improvements".to_string(),
            0.6,
            &[
                "Add more comprehensive error handling",
                "Improve logging and monitoring",
                "Optimize memory usage and performance",
            ],
        ),
        improvement(
            ImprovementKind::FeatureEnhancement,
            "Add new capabilities based on research patterns".to_string(),
            0.5,
            &[
                "Implement advanced machine learning integration",
                "Add real-time collaboration features",
                "Enhance multi-modal research capabilities",
            ],
        ),
    ]
}

fn improvement(
    kind: ImprovementKind,
    description: String,
    confidence: f64,
    changes: &[&str],
) -> Improvement {
    Improvement::new(
        kind,
        description,
        Confidence::saturating(confidence),
        changes.iter().copied(),
    )
}
