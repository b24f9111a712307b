//! Report renderer trait and error types

use crate::orchestrator::AnalysisResult;
use thiserror::Error;

/// Errors that can occur while rendering a report
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to format report: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Turns a completed analysis into a downloadable document
///
/// A PDF renderer lives outside this crate; it plugs in through this trait.
pub trait ReportRenderer: Send + Sync {
    /// MIME type sent with the rendered bytes
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn file_extension(&self) -> &'static str;

    fn render(&self, result: &AnalysisResult) -> RenderResult<Vec<u8>>;
}
