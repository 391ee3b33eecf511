use std::collections::HashMap;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use reelscope_catalog::Aggregator;
use reelscope_core::error::ApiError;
use reelscope_core::types::{Insight, Resolved};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::intent::{parse_insight, parse_intent};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer()),
        )
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/tmdb", get(catalog).options(preflight))
        .route("/process", get(process).options(preflight))
}

/// Open CORS: any origin, read-only methods.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

type QueryParams = Result<Query<HashMap<String, String>>, QueryRejection>;

fn query_params(query: QueryParams) -> Result<HashMap<String, String>, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::bad_request("query", e.body_text()))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    credential_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        credential_configured: state.catalog.is_configured(),
    })
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

async fn catalog(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<Resolved>, AppError> {
    let intent = query_params(query)
        .and_then(|params| parse_intent(&params))
        .inspect_err(|e| debug!(error = %e, "rejected catalog request"))?;

    let aggregator = Aggregator::new(state.catalog.as_ref(), &state.settings);
    let resolved = aggregator.resolve(&intent).await.map_err(|e| {
        warn!(intent = intent.kind(), error = %e, "catalog request failed");
        AppError::from(e)
    })?;

    Ok(Json(resolved))
}

// ---------------------------------------------------------------------------
// Insights
// ---------------------------------------------------------------------------

async fn process(
    State(state): State<AppState>,
    query: QueryParams,
) -> Result<Json<Insight>, AppError> {
    let intent = query_params(query)
        .and_then(|params| parse_insight(&params))
        .inspect_err(|e| debug!(error = %e, "rejected insight request"))?;

    let aggregator = Aggregator::new(state.catalog.as_ref(), &state.settings);
    let insight = aggregator.insight(&intent).await.map_err(|e| {
        warn!(?intent, error = %e, "insight request failed");
        AppError::from(e)
    })?;

    Ok(Json(insight))
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn not_found() -> AppError {
    ApiError::NotFound("no such route".into()).into()
}
