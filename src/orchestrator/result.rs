use crate::analyzers::{
    AiInsight, AiRecommendations, DomainTrustResult, PageSpeedResult, SeoResult, UxResult,
};
use crate::orchestrator::Language;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Which sub-results failed or degraded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Failures {
    pub fetch: bool,
    pub seo: bool,
    pub ux: bool,
    pub domain_trust: bool,
    pub page_speed: bool,
    pub ai_insight: bool,
    pub ai_recommendations: bool,
}

impl Failures {
    pub fn any(&self) -> bool {
        self.fetch
            || self.seo
            || self.ux
            || self.domain_trust
            || self.page_speed
            || self.ai_insight
            || self.ai_recommendations
    }
}

/// The consolidated report for one analysis
///
/// Immutable once returned; optional fields serialize as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub url: String,
    pub final_url: Option<String>,
    pub language: Language,
    pub analyzed_at: DateTime<Utc>,
    pub status_code: Option<u16>,
    pub fetch_error: Option<String>,
    pub seo: SeoResult,
    pub ux: UxResult,
    pub domain_trust: DomainTrustResult,
    pub page_speed: PageSpeedResult,
    pub ai_insight: AiInsight,
    pub ai_recommendations: AiRecommendations,
    pub failures: Failures,
}

impl AnalysisResult {
    /// Derives the failure flags from the sub-results
    pub fn compute_failures(&mut self) {
        self.failures = Failures {
            fetch: self.fetch_error.is_some(),
            seo: self.seo.error.is_some(),
            ux: self.ux.error.is_some(),
            domain_trust: self.domain_trust.is_all_unknown(),
            page_speed: self.page_speed.error.is_some(),
            ai_insight: self.ai_insight.error.is_some(),
            ai_recommendations: self.ai_recommendations.error.is_some(),
        };
    }
}
