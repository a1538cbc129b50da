/// Intelligence module
///
/// Reads research results and decides which code improvements to suggest.

pub mod detector;
pub mod research;

pub use detector::{DetectionThresholds, ImprovementDetector};
pub use research::ResearchResults;
