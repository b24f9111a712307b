//! HTTP surface
//!
//! Three endpoints, no business logic:
//! - `POST /analyze` - run an analysis, store it, return it as JSON
//! - `POST /generate_report` - render a stored analysis as a download
//! - `POST /article_analyze` - AI review of submitted article text

mod handlers;

use crate::orchestrator::Orchestrator;
use crate::output::ReportRenderer;
use crate::storage::ResultStore;
use axum::routing::post;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use handlers::{
    analyze_handler, article_analyze_handler, generate_report_handler, AnalyzeBody, ArticleBody,
    ReportBody,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub store: Arc<dyn ResultStore>,
    pub renderer: Arc<dyn ReportRenderer>,
}

impl AppState {
    pub fn new(
        orchestrator: Orchestrator,
        store: Arc<dyn ResultStore>,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            store,
            renderer,
        }
    }
}

/// Builds the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze_handler))
        .route("/generate_report", post(generate_report_handler))
        .route("/article_analyze", post(article_analyze_handler))
        .with_state(state)
}

/// Serves the router on an already-bound listener until the process stops
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on http://{}/", addr);
        info!("  - Analyze: POST http://{}/analyze", addr);
        info!("  - Report: POST http://{}/generate_report", addr);
        info!("  - Article: POST http://{}/article_analyze", addr);
    }

    axum::serve(listener, router(state)).await
}
