/// Improvement report data model
///
/// An improvement report is a list of improvement records, each carrying a
/// kind, a description, a confidence and the changes it suggests.

use crate::error::{ReportError, Result};
use crate::report::{parser, render, validator};
use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Top-level heading every report starts with
pub const REPORT_TITLE: &str = "Detected Code Improvements";

/// Timestamp layout used for the `Generated:` line
pub const GENERATED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

fn percent_regex() -> &'static Regex {
    static PERCENT: OnceLock<Regex> = OnceLock::new();
    PERCENT.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*%\s*$").expect("percent regex is valid")
    })
}

/// Confidence as a fraction between 0.0 and 1.0
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Create a confidence from a fraction
    ///
    /// # Returns
    /// * `Err(ReportError::InvalidConfidence)` - If the value is NaN or outside 0.0-1.0
    pub fn new(value: f64) -> Result<Self> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(ReportError::InvalidConfidence(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Create a confidence from a percentage (0-100)
    pub fn from_percent(percent: f64) -> Result<Self> {
        if percent.is_nan() || !(0.0..=100.0).contains(&percent) {
            return Err(ReportError::InvalidConfidence(format!("{}%", percent)));
        }
        Ok(Self(percent / 100.0))
    }

    /// Clamp into range; NaN becomes zero
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Parse text such as `80.00%` or `80 %`
    pub fn parse_percent(text: &str) -> Result<Self> {
        let captures = percent_regex()
            .captures(text)
            .ok_or_else(|| ReportError::InvalidConfidence(text.trim().to_string()))?;

        let percent: f64 = captures[1]
            .parse()
            .map_err(|_| ReportError::InvalidConfidence(text.trim().to_string()))?;

        Self::from_percent(percent)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn percent(&self) -> f64 {
        self.0 * 100.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = ReportError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.percent())
    }
}

/// What area of the code an improvement targets
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImprovementKind {
    PerformanceOptimization,
    IntelligenceEnhancement,
    AutomationExpansion,
    CodeQuality,
    FeatureEnhancement,
    /// Any other kind; the heading title is kept as written
    Custom { slug: String, title: String },
}

impl ImprovementKind {
    /// The snake_case identifier, e.g. `code_quality`
    pub fn slug(&self) -> &str {
        match self {
            ImprovementKind::PerformanceOptimization => "performance_optimization",
            ImprovementKind::IntelligenceEnhancement => "intelligence_enhancement",
            ImprovementKind::AutomationExpansion => "automation_expansion",
            ImprovementKind::CodeQuality => "code_quality",
            ImprovementKind::FeatureEnhancement => "feature_enhancement",
            ImprovementKind::Custom { slug, .. } => slug,
        }
    }

    /// Unknown slugs become `Custom`, titled from the slug
    pub fn from_slug(slug: &str) -> Self {
        match slug {
            "performance_optimization" => ImprovementKind::PerformanceOptimization,
            "intelligence_enhancement" => ImprovementKind::IntelligenceEnhancement,
            "automation_expansion" => ImprovementKind::AutomationExpansion,
            "code_quality" => ImprovementKind::CodeQuality,
            "feature_enhancement" => ImprovementKind::FeatureEnhancement,
            other => ImprovementKind::Custom {
                slug: other.to_string(),
                title: title_case(&other.replace('_', " ")),
            },
        }
    }

    /// Rebuild a kind from a stored slug and heading title
    pub fn from_parts(slug: &str, title: &str) -> Self {
        match Self::from_slug(slug) {
            ImprovementKind::Custom { slug, .. } => ImprovementKind::Custom {
                slug,
                title: title.to_string(),
            },
            known => known,
        }
    }

    /// Recover the kind from a rendered heading title
    pub fn from_title(title: &str) -> Self {
        let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
        let slug = title.to_lowercase().replace(' ', "_");
        Self::from_parts(&slug, &title)
    }

    /// Heading title: underscores become spaces, each word capitalized
    pub fn title(&self) -> String {
        match self {
            ImprovementKind::Custom { title, .. } => title.clone(),
            known => title_case(&known.slug().replace('_', " ")),
        }
    }
}

impl From<String> for ImprovementKind {
    fn from(slug: String) -> Self {
        Self::from_slug(&slug)
    }
}

impl From<ImprovementKind> for String {
    fn from(kind: ImprovementKind) -> Self {
        kind.slug().to_string()
    }
}

impl fmt::Display for ImprovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }

    out
}

/// A single improvement record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    #[serde(rename = "type")]
    pub kind: ImprovementKind,
    pub description: String,
    pub confidence: Confidence,
    pub suggested_changes: Vec<String>,
}

impl Improvement {
    pub fn new<I, S>(
        kind: ImprovementKind,
        description: impl Into<String>,
        confidence: Confidence,
        suggested_changes: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            description: description.into(),
            confidence,
            suggested_changes: suggested_changes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn title(&self) -> String {
        self.kind.title()
    }

    /// Everything that keeps this record from being a complete one
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.description.trim().is_empty() {
            problems.push("description is empty".to_string());
        }
        if self.suggested_changes.is_empty() {
            problems.push("no suggested changes".to_string());
        }
        if self.suggested_changes.iter().any(|c| c.trim().is_empty()) {
            problems.push("blank suggested change".to_string());
        }

        problems
    }
}

/// A full report: generation stamp plus ordered improvements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementReport {
    pub generated: String,
    pub improvements: Vec<Improvement>,
}

impl ImprovementReport {
    /// Create a report stamped with the current local time
    pub fn new(improvements: Vec<Improvement>) -> Self {
        Self {
            generated: chrono::Local::now().format(GENERATED_FORMAT).to_string(),
            improvements,
        }
    }

    pub fn with_generated(generated: impl Into<String>, improvements: Vec<Improvement>) -> Self {
        Self {
            generated: generated.into(),
            improvements,
        }
    }

    /// Parse the `Generated:` stamp
    ///
    /// Accepts a zone-less ISO-8601 timestamp (fractional seconds optional)
    /// or an RFC 3339 timestamp, which is reduced to its local wall time.
    pub fn generated_at(&self) -> Option<NaiveDateTime> {
        parse_generated(&self.generated)
    }

    /// Parse, validate and convert a Markdown report
    pub fn from_markdown(markdown: &str) -> Result<Self> {
        let document = parser::parse(markdown);
        let validation = validator::validate(&document);

        if !validation.is_valid() {
            return Err(ReportError::Validation(validation.summary()));
        }

        document.into_report()
    }

    pub fn to_markdown(&self) -> String {
        render::render(self)
    }

    pub fn len(&self) -> usize {
        self.improvements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.improvements.is_empty()
    }

    pub fn average_confidence(&self) -> Option<Confidence> {
        if self.improvements.is_empty() {
            return None;
        }

        let total: f64 = self.improvements.iter().map(|i| i.confidence.value()).sum();
        Confidence::new(total / self.improvements.len() as f64).ok()
    }
}

pub(crate) fn parse_generated(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.naive_local()))
}
