//! Independent analyzers run by the orchestrator
//!
//! Each analyzer produces its own result type and never fails the request:
//! problems are reported in the result's `error` field or as unknown values.

pub mod ai;
pub mod domain_trust;
pub mod page_speed;
mod reading;
pub mod seo;
pub mod ux;

pub use ai::{
    AiInsight, AiInsightAggregator, AiRecommendations, ArticleAnalysis, GeminiClient,
    GenerativeText, InsightContext,
};
pub use domain_trust::{DomainTrustAnalyzer, DomainTrustResult};
pub use page_speed::{PageSpeedClient, PageSpeedError, PageSpeedResult};
pub use reading::Reading;
pub use seo::{SeoAnalyzer, SeoResult};
pub use ux::{UxAnalyzer, UxResult};
