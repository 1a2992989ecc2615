use axum::{Json, extract::State};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};

use super::error::GatewayError;
use super::payload::{AnalyzeRequest, ClassifyRequest, CompareRequest, DomainsResponse};
use super::state::AppState;
use crate::document::{Classification, ParagraphRecord};
use crate::report::ComparisonReport;

fn parse_request<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(value).map_err(|e| GatewayError::InvalidSchema(e.to_string()))
}

#[instrument(skip_all)]
pub async fn domains_handler(State(state): State<AppState>) -> Json<DomainsResponse> {
    Json(DomainsResponse {
        domains: state.domains.as_ref().clone(),
    })
}

#[instrument(skip_all)]
pub async fn classify_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<Classification>, GatewayError> {
    let request: ClassifyRequest = parse_request(request)?;
    request.validate()?;

    let domains = request.domains.as_deref().unwrap_or(state.domains.as_slice());
    let classification = state.classifier.classify(&request.text, domains).await;

    debug!(
        domain = ?classification.domain,
        method = %classification.method,
        "Classification served"
    );

    Ok(Json(classification))
}

#[instrument(skip_all)]
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<ComparisonReport>, GatewayError> {
    let request: AnalyzeRequest = parse_request(request)?;
    request.validate()?;

    let vendor = request.vendor_records();
    let report = state
        .matcher
        .analyze_paragraph(&request.client_record(), &vendor)
        .await;

    info!(
        comparison_id = %report.comparison_id,
        gaps = report.document_summary.gap_count,
        "Paragraph analysis served"
    );

    Ok(Json(report))
}

#[instrument(skip_all)]
pub async fn compare_handler(
    State(state): State<AppState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<ComparisonReport>, GatewayError> {
    let mut request: CompareRequest = parse_request(request)?;
    request.validate()?;

    if request.classify_missing {
        classify_missing(&state, &mut request.client).await;
        classify_missing(&state, &mut request.vendor).await;
    }

    let report = state.matcher.compare(&request.client, &request.vendor).await;
    Ok(Json(report))
}

/// Fills in a classification for every record that arrived without one.
async fn classify_missing(state: &AppState, records: &mut [ParagraphRecord]) {
    let mut classified = 0usize;

    for record in records.iter_mut().filter(|r| r.classification.is_none()) {
        let classification = state.classifier.classify(&record.text, &state.domains).await;
        record.classification = Some(classification);
        classified += 1;
    }

    if classified > 0 {
        debug!(classified, "Classified paragraphs without a stored domain");
    }
}
