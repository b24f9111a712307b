//! Request handlers

use crate::orchestrator::{AnalysisRequest, AnalysisResult, ArticleRequest, Language};
use crate::server::AppState;
use crate::storage::StoreError;
use crate::url::parse_target_url;
use crate::{InputError, SitelensError};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Body of `POST /analyze`
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    pub url: Option<String>,
}

/// Body of `POST /generate_report`; one of the two fields names the analysis
#[derive(Debug, Default, Deserialize)]
pub struct ReportBody {
    pub analysis_id: Option<Uuid>,
    pub url: Option<String>,
}

/// Body of `POST /article_analyze`
#[derive(Debug, Default, Deserialize)]
pub struct ArticleBody {
    pub article_text: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Parses a JSON body; an empty body yields the default value
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| format!("Invalid request body: {}", e))
}

/// `POST /analyze`
pub async fn analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: AnalyzeBody = match parse_body(&body) {
        Ok(body) => body,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let language = Language::from_accept_language(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    );

    let target = body.url.unwrap_or_default();
    let request = match AnalysisRequest::new(&target, language) {
        Ok(request) => request,
        Err(e) => {
            info!("Rejected analysis request for '{}': {}", target, e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let result = match state.orchestrator.analyze(&request).await {
        Ok(result) => result,
        Err(e @ SitelensError::Fetch { .. }) => {
            warn!("Analysis aborted: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
        Err(e) => {
            error!("Analysis of {} failed: {}", request.target_url, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    if let Err(e) = state.store.insert(result.clone()) {
        warn!("Could not store analysis {}: {}", result.analysis_id, e);
    }
    Json(result).into_response()
}

/// `POST /article_analyze`
///
/// The outcome is not stored; AI failures degrade to `"unavailable: ..."`
/// fields with a 200 response.
pub async fn article_analyze_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: ArticleBody = match parse_body(&body) {
        Ok(body) => body,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let language = Language::from_accept_language(
        headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok()),
    );

    let text = body.article_text.unwrap_or_default();
    let request = match ArticleRequest::new(&text, language) {
        Ok(request) => request,
        Err(e) => {
            info!("Rejected article analysis request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    Json(state.orchestrator.analyze_article(&request).await).into_response()
}

/// `POST /generate_report`
pub async fn generate_report_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let body: ReportBody = match parse_body(&body) {
        Ok(body) => body,
        Err(message) => return error_response(StatusCode::BAD_REQUEST, message),
    };

    let result = match lookup(&state, &body) {
        Ok(result) => result,
        Err(LookupError::Input(e)) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
        Err(LookupError::Unspecified) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Missing prior analysis: give an analysis_id or url. Run /analyze first.",
            )
        }
        Err(LookupError::Store(e)) if e.is_missing() => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("{}. Run /analyze first.", e),
            )
        }
        Err(LookupError::Store(e)) => {
            error!("Result store failure: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let bytes = match state.renderer.render(&result) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Rendering report for {} failed: {}", result.analysis_id, e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    let disposition = format!(
        "attachment; filename=\"sitelens-report-{}.{}\"",
        result.analysis_id,
        state.renderer.file_extension()
    );

    let mut response = (StatusCode::OK, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(state.renderer.content_type()),
    );
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

enum LookupError {
    /// Neither an id nor a URL was given
    Unspecified,
    Input(InputError),
    Store(StoreError),
}

fn lookup(state: &AppState, body: &ReportBody) -> Result<Arc<AnalysisResult>, LookupError> {
    if let Some(id) = body.analysis_id {
        return state.store.get(id).map_err(LookupError::Store);
    }

    match body.url.as_deref() {
        Some(url) => {
            let url = parse_target_url(url).map_err(LookupError::Input)?;
            state
                .store
                .latest_for_url(url.as_str())
                .map_err(LookupError::Store)
        }
        None => Err(LookupError::Unspecified),
    }
}
