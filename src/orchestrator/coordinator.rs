//! Analysis coordinator
//!
//! Fetches the page once and fans out to every analyzer. Analyzers that only
//! need the URL (domain trust, page speed) start immediately as spawned tasks
//! and run while the page is fetched; page-based analyzers start once the page
//! arrives. Everything is joined at a single barrier before the AI insight and
//! recommendations are requested. A whole-run deadline bounds every await;
//! work still pending when it passes is cancelled and reported as failed.

use crate::analyzers::{
    AiInsight, AiInsightAggregator, AiRecommendations, ArticleAnalysis, DomainTrustAnalyzer,
    DomainTrustResult, GeminiClient, GenerativeText, InsightContext, PageSpeedClient,
    PageSpeedResult, SeoAnalyzer, SeoResult, UxAnalyzer, UxResult,
};
use crate::config::{Capabilities, Config, FetchFailurePolicy};
use crate::fetch::{build_http_client, FetchError, FetchedPage, PageFetcher};
use crate::orchestrator::{
    AnalysisPhase, AnalysisRequest, AnalysisResult, ArticleRequest, Failures,
};
use crate::url::extract_domain;
use crate::SitelensError;
use chrono::Utc;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

const DEADLINE_EXCEEDED: &str = "analysis deadline exceeded";

/// Spawned task that is aborted when its handle is dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

/// Coordinates one analysis from fetch to consolidated report
#[derive(Debug, Clone)]
pub struct Orchestrator {
    fetcher: PageFetcher,
    seo: SeoAnalyzer,
    ux: UxAnalyzer,
    domain_trust: DomainTrustAnalyzer,
    page_speed: PageSpeedClient,
    ai: AiInsightAggregator,
    policy: FetchFailurePolicy,
    deadline: Duration,
}

impl Orchestrator {
    /// Builds the shared HTTP client and every analyzer from configuration
    pub fn new(config: &Config, capabilities: &Capabilities) -> Result<Self, SitelensError> {
        let client = build_http_client(&config.user_agent, &config.fetch)?;
        Ok(Self::with_client(client, config, capabilities))
    }

    /// Builds every analyzer around an existing client
    pub fn with_client(client: Client, config: &Config, capabilities: &Capabilities) -> Self {
        let ai = match &capabilities.generative_key {
            Some(key) => AiInsightAggregator::new(Arc::new(GeminiClient::new(
                client.clone(),
                &config.generative_text,
                key.clone(),
            ))),
            None => AiInsightAggregator::disabled(),
        };

        Self {
            fetcher: PageFetcher::new(client.clone(), &config.fetch),
            seo: SeoAnalyzer::new(client.clone(), config),
            ux: UxAnalyzer,
            domain_trust: DomainTrustAnalyzer::new(client.clone(), &config.domain),
            page_speed: PageSpeedClient::new(
                client,
                &config.page_speed,
                capabilities.page_speed_key.clone(),
            ),
            ai,
            policy: config.server.fetch_failure_policy,
            deadline: Duration::from_secs(config.server.request_deadline_secs),
        }
    }

    /// Replaces the generative-text collaborator
    pub fn with_generative_text(mut self, generator: Arc<dyn GenerativeText>) -> Self {
        self.ai = AiInsightAggregator::new(generator);
        self
    }

    /// Replaces the domain trust analyzer
    pub fn with_domain_trust(mut self, analyzer: DomainTrustAnalyzer) -> Self {
        self.domain_trust = analyzer;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Runs a complete analysis
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisResult)` - Always, under the per-analyzer policy
    /// * `Err(SitelensError::Fetch)` - The page could not be fetched and the
    ///   global policy is configured
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, SitelensError> {
        let deadline = Instant::now() + self.deadline;
        let url = request.target_url.clone();
        let domain = extract_domain(&url).unwrap_or_default();
        info!("Analyzing {} ({})", url, request.language.code());

        let mut phase = AnalysisPhase::Idle.transition(AnalysisPhase::Fetching)?;

        let domain_task = {
            let analyzer = self.domain_trust.clone();
            let domain = domain.clone();
            AbortOnDrop(tokio::spawn(async move { analyzer.analyze(&domain).await }))
        };
        let page_speed_task = {
            let client = self.page_speed.clone();
            let url = url.clone();
            AbortOnDrop(tokio::spawn(
                async move { client.fetch_or_unavailable(&url).await },
            ))
        };

        let fetched: Result<Arc<FetchedPage>, FetchError> =
            match timeout_at(deadline, self.fetcher.fetch(&url)).await {
                Ok(result) => result.map(Arc::new),
                Err(_) => Err(FetchError::Timeout),
            };

        if let Err(e) = &fetched {
            warn!("Fetching {} failed: {}", url, e);
            if self.policy == FetchFailurePolicy::Global {
                phase = phase.transition(AnalysisPhase::Failed)?;
                debug!("Analysis of {} is {}", url, phase);
                return Err(SitelensError::Fetch {
                    url: url.to_string(),
                    source: e.clone(),
                });
            }
        }

        phase = phase.transition(AnalysisPhase::Analyzing)?;

        let page_analysis = async {
            match &fetched {
                Ok(page) => {
                    let ux = self.ux.analyze(page);
                    let seo = match timeout_at(deadline, self.seo.analyze(page, request.language))
                        .await
                    {
                        Ok(seo) => seo,
                        Err(_) => SeoResult::failed(DEADLINE_EXCEEDED),
                    };
                    (seo, ux)
                }
                Err(e) => {
                    let reason = format!("page could not be fetched: {}", e);
                    (SeoResult::failed(&reason), UxResult::failed(reason))
                }
            }
        };

        let (page_results, domain_trust, page_speed) = tokio::join!(
            page_analysis,
            timeout_at(deadline, domain_task),
            timeout_at(deadline, page_speed_task),
        );
        let (seo, ux) = page_results;
        let domain_trust = settle(domain_trust, |reason| {
            DomainTrustResult::unknown(domain.as_str(), reason)
        });
        let page_speed = settle(page_speed, |reason| PageSpeedResult::unavailable(&url, reason));

        phase = phase.transition(AnalysisPhase::Aggregating)?;

        let context = InsightContext::from_results(url.as_str(), &seo, &ux, &domain_trust, &page_speed);
        let (ai_insight, ai_recommendations) = tokio::join!(
            timeout_at(
                deadline,
                self.ai.summarize(url.as_str(), &context, request.language),
            ),
            timeout_at(deadline, self.ai.recommend(&context, request.language)),
        );
        let ai_insight =
            ai_insight.unwrap_or_else(|_| AiInsight::unavailable(DEADLINE_EXCEEDED));
        let ai_recommendations = ai_recommendations
            .unwrap_or_else(|_| AiRecommendations::unavailable(DEADLINE_EXCEEDED));

        let (final_url, status_code, fetch_error) = match &fetched {
            Ok(page) => (Some(page.final_url.to_string()), Some(page.status_code), None),
            Err(e) => (None, None, Some(e.to_string())),
        };

        let mut result = AnalysisResult {
            analysis_id: Uuid::new_v4(),
            url: url.to_string(),
            final_url,
            language: request.language,
            analyzed_at: Utc::now(),
            status_code,
            fetch_error,
            seo,
            ux,
            domain_trust,
            page_speed,
            ai_insight,
            ai_recommendations,
            failures: Failures::default(),
        };
        result.compute_failures();

        phase = phase.transition(AnalysisPhase::Done)?;
        info!(
            "Analysis {} of {} is {}: SEO score {}, failures {:?}",
            result.analysis_id, url, phase, result.seo.score, result.failures
        );

        Ok(result)
    }

    /// Runs the article prompts under the same whole-run deadline
    pub async fn analyze_article(&self, request: &ArticleRequest) -> ArticleAnalysis {
        info!(
            "Analyzing article of {} character(s) ({})",
            request.text.chars().count(),
            request.language.code()
        );

        match timeout(
            self.deadline,
            self.ai.analyze_article(&request.text, request.language),
        )
        .await
        {
            Ok(analysis) => analysis,
            Err(_) => {
                warn!("Article analysis hit the {:?} deadline", self.deadline);
                ArticleAnalysis::unavailable(DEADLINE_EXCEEDED)
            }
        }
    }
}

/// Resolves a deadline-bounded task into its value or a fallback
fn settle<T>(
    outcome: Result<Result<T, JoinError>, tokio::time::error::Elapsed>,
    fallback: impl FnOnce(&str) -> T,
) -> T {
    match outcome {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!("Analyzer task failed: {}", e);
            fallback("analyzer task failed")
        }
        Err(_) => fallback(DEADLINE_EXCEEDED),
    }
}
