//! Market data routes: quotes, history, search, and the ticker list.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use scan_orchestrator::PerformanceResult;
use serde::{Deserialize, Serialize};
use valuation_core::{Quote, SymbolMatch};

use crate::{ApiResponse, AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/quote/:symbol", get(get_quote))
        .route("/api/batch-quotes", get(get_batch_quotes))
        .route("/api/performance/:symbol", get(get_performance))
        .route("/api/search/:query", get(search_symbols))
        .route("/api/tickers", get(get_tickers))
}

#[utoipa::path(
    get,
    path = "/api/quote/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Current quote"),
        (status = 404, description = "Symbol not found")
    ),
    tag = "Market"
)]
pub async fn get_quote(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<Quote>>, AppError> {
    let quote = state.orchestrator.provider().get_quote(&symbol).await?;
    Ok(Json(ApiResponse::success(quote)))
}

#[derive(Deserialize)]
pub struct BatchQuotesQuery {
    pub symbols: String,
}

#[derive(Serialize)]
pub struct BatchQuotesResponse {
    pub quotes: Vec<Quote>,
}

#[utoipa::path(
    get,
    path = "/api/batch-quotes",
    responses((status = 200, description = "Quotes for a comma-separated symbol list")),
    tag = "Market"
)]
pub async fn get_batch_quotes(
    State(state): State<AppState>,
    Query(query): Query<BatchQuotesQuery>,
) -> Result<Json<ApiResponse<BatchQuotesResponse>>, AppError> {
    let symbols: Vec<String> = query
        .symbols
        .split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        return Ok(Json(ApiResponse::error("No symbols provided")));
    }

    let quotes = state
        .orchestrator
        .provider()
        .get_batch_quotes(&symbols)
        .await?;
    Ok(Json(ApiResponse::success(BatchQuotesResponse { quotes })))
}

#[utoipa::path(
    get,
    path = "/api/performance/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, description = "Price changes over 1D/1W/1M/3M/6M/1Y"),
        (status = 404, description = "No price history available")
    ),
    tag = "Market"
)]
pub async fn get_performance(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<PerformanceResult>>, AppError> {
    if symbol.is_empty() || symbol.len() > 10 {
        return Ok(Json(ApiResponse::error("Invalid symbol")));
    }
    let performance = state.orchestrator.performance(&symbol).await?;
    Ok(Json(ApiResponse::success(performance)))
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SymbolMatch>,
}

#[utoipa::path(
    get,
    path = "/api/search/{query}",
    params(("query" = String, Path, description = "Company name or partial ticker")),
    responses((status = 200, description = "Matching US-listed symbols, at most 8")),
    tag = "Market"
)]
pub async fn search_symbols(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<ApiResponse<SearchResponse>>, AppError> {
    let trimmed = query.trim().to_string();
    if trimmed.is_empty() {
        return Ok(Json(ApiResponse::error("Query required")));
    }

    let results = state
        .orchestrator
        .provider()
        .search_symbols(&trimmed)
        .await?;
    Ok(Json(ApiResponse::success(SearchResponse {
        query: trimmed,
        results,
    })))
}

#[derive(Serialize)]
pub struct TickersResponse {
    pub tickers: Vec<String>,
    pub count: usize,
    pub source: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/tickers",
    responses((status = 200, description = "All known US ticker symbols")),
    tag = "Market"
)]
pub async fn get_tickers(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TickersResponse>>, AppError> {
    let tickers = state.orchestrator.tickers().await?;
    let count = tickers.len();
    Ok(Json(ApiResponse::success(TickersResponse {
        tickers,
        count,
        source: "github/rreichel3/US-Stock-Symbols",
        timestamp: Utc::now(),
    })))
}
