/// Core functionality modules
///
/// Recording, retrieving and searching the report history.

pub mod recorder;
pub mod retriever;
pub mod searcher;

pub use recorder::ReportRecorder;
pub use retriever::Retriever;
pub use searcher::Searcher;
