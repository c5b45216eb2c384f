//! Analysis API routes: per-symbol scoring, batch scan, discovery, and
//! personalized recommendations.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use scan_orchestrator::{DiscoverResult, RecommendResult, ScanResult};
use scoring_engine::ScorerProfile;
use serde::Deserialize;
use valuation_core::TickerAnalysis;

use crate::{ApiResponse, AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/analyze/:symbol", get(analyze_symbol))
        .route("/api/scan", get(scan_symbols))
        .route("/api/discover", get(discover_picks))
        .route("/api/recommend", get(recommend_stocks))
}

#[derive(Deserialize)]
pub struct AnalyzeQuery {
    /// Scorer profile name; the analyze endpoint defaults to the classic
    /// cliff-edge checklist
    pub profile: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/analyze/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Full analysis: fundamentals, fair value, score, recommendation"),
        (status = 404, description = "Symbol unknown or no price available")
    ),
    tag = "Analysis"
)]
pub async fn analyze_symbol(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<ApiResponse<TickerAnalysis>>, AppError> {
    let profile = match query.profile.as_deref() {
        Some(name) => ScorerProfile::parse(name),
        None => ScorerProfile::Standard,
    };

    let analysis = state.orchestrator.analyze(&symbol, profile).await?;
    Ok(Json(ApiResponse::success(analysis)))
}

#[derive(Deserialize)]
pub struct ScanQuery {
    /// Comma-separated symbols; omitted means the default universe
    pub symbols: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/scan",
    responses((status = 200, description = "Scored opportunities, best first")),
    tag = "Analysis"
)]
pub async fn scan_symbols(
    State(state): State<AppState>,
    Query(query): Query<ScanQuery>,
) -> Json<ApiResponse<ScanResult>> {
    let symbols = query.symbols.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
    });

    let result = state.orchestrator.clone().scan(symbols).await;
    Json(ApiResponse::success(result))
}

#[utoipa::path(
    get,
    path = "/api/discover",
    responses((status = 200, description = "Three random picks from distinct market pools")),
    tag = "Analysis"
)]
pub async fn discover_picks(State(state): State<AppState>) -> Json<ApiResponse<DiscoverResult>> {
    let mut rng = StdRng::from_entropy();
    let result = state.orchestrator.discover(&mut rng).await;
    Json(ApiResponse::success(result))
}

#[derive(Deserialize)]
pub struct RecommendQuery {
    /// Quality scorer profile; defaults to the proportional scorer
    pub profile: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recommend",
    responses((status = 200, description = "Top picks blended from quality and watchlist affinity")),
    tag = "Analysis"
)]
pub async fn recommend_stocks(
    State(state): State<AppState>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<ApiResponse<RecommendResult>>, AppError> {
    let profile = query
        .profile
        .as_deref()
        .map(ScorerProfile::parse)
        .unwrap_or_default();

    let entries = state.store.list().await?;
    let mut rng = StdRng::from_entropy();
    let result = state
        .orchestrator
        .clone()
        .recommend(&entries, profile, &mut rng)
        .await;

    Ok(Json(ApiResponse::success(result)))
}
