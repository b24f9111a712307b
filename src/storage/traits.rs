//! Result store trait and error types

use crate::orchestrator::AnalysisResult;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during result store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No analysis found with id {0}")]
    NotFound(Uuid),

    #[error("No analysis found for {0}")]
    NoResultForUrl(String),

    #[error("Result store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// True when the caller asked for something that is not (or no longer) stored
    pub fn is_missing(&self) -> bool {
        !matches!(self, Self::Poisoned)
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Short-lived storage for completed analyses
///
/// Implementations must be safe to share between request handlers.
pub trait ResultStore: Send + Sync {
    /// Stores a result, evicting expired or excess entries
    fn insert(&self, result: AnalysisResult) -> StoreResult<Arc<AnalysisResult>>;

    /// Gets a result by analysis id
    fn get(&self, id: Uuid) -> StoreResult<Arc<AnalysisResult>>;

    /// Gets the most recent result whose requested or final URL matches
    fn latest_for_url(&self, url: &str) -> StoreResult<Arc<AnalysisResult>>;

    /// Number of live entries
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
