/// improvement-report library
///
/// Detects code improvements from research results, renders them as a
/// Markdown report, parses and validates such reports, and keeps a history.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod intelligence;
pub mod logging;
pub mod report;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{ReportError, Result};
pub use report::{Improvement, ImprovementReport};
