/// Database module for improvement-report
///
/// Keeps the history of detected and imported reports in SQLite via sqlx.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::{Database, DatabaseStats};
pub use models::*;
