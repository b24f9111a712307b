//! Analysis orchestration
//!
//! Validated requests go in, one consolidated [`AnalysisResult`] comes out.
//!
//! # Components
//!
//! - `AnalysisRequest`, `ArticleRequest`, `Language`: validated input
//! - `AnalysisPhase`: forward-only phase machine for one run
//! - `Orchestrator`: fan-out/fan-in coordinator with the fetch-failure policy
//! - `AnalysisResult`: the fully-keyed report

mod coordinator;
mod phase;
mod request;
mod result;

pub use coordinator::Orchestrator;
pub use phase::AnalysisPhase;
pub use request::{AnalysisRequest, ArticleRequest, Language, MAX_ARTICLE_CHARS};
pub use result::{AnalysisResult, Failures};
