/// Research results input
///
/// The detector reads a handful of numbers out of a research run's results.
/// Every field is optional and `null` counts as missing; unknown fields are
/// ignored.

use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchResults {
    pub intelligence_score: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub research_phases: ResearchPhases,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchPhases {
    #[serde(deserialize_with = "null_as_default")]
    pub pattern_research: PatternResearch,
    #[serde(deserialize_with = "null_as_default")]
    pub automation_results: AutomationResults,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternResearch {
    /// Usually an array; objects count keys, strings count characters
    pub central_concepts: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationResults {
    #[serde(deserialize_with = "null_as_default")]
    pub automation_metrics: AutomationMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationMetrics {
    pub success_rate: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ResearchResults {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn intelligence_score(&self) -> f64 {
        self.intelligence_score.unwrap_or(0.0)
    }

    pub fn central_concept_count(&self) -> usize {
        match &self.research_phases.pattern_research.central_concepts {
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            Some(Value::String(text)) => text.chars().count(),
            _ => 0,
        }
    }

    pub fn automation_success_rate(&self) -> f64 {
        self.research_phases
            .automation_results
            .automation_metrics
            .success_rate
            .unwrap_or(0.0)
    }
}
