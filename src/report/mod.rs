/// Report module
///
/// The improvement report model and its Markdown form: rendering, parsing
/// and structural validation.

pub mod model;
pub mod parser;
pub mod render;
pub mod validator;

pub use model::{Confidence, Improvement, ImprovementKind, ImprovementReport, REPORT_TITLE};
pub use parser::{parse, ParsedDocument, ParsedSection};
pub use render::render;
pub use validator::{validate, Issue, Severity, ValidationReport};
