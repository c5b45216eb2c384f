//! Watchlist CRUD routes.

use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use watchlist::WatchlistEntry;

use crate::{ApiResponse, AppError, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/watchlist", get(list_watchlist))
        .route("/api/watchlist", post(add_to_watchlist))
        .route("/api/watchlist/:symbol", delete(remove_from_watchlist))
}

#[derive(Serialize)]
pub struct WatchlistResponse {
    pub watchlist: Vec<WatchlistEntry>,
}

#[utoipa::path(
    get,
    path = "/api/watchlist",
    responses((status = 200, description = "Saved entries, newest first")),
    tag = "Watchlist"
)]
pub async fn list_watchlist(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WatchlistResponse>>, AppError> {
    let watchlist = state.store.list().await?;
    Ok(Json(ApiResponse::success(WatchlistResponse { watchlist })))
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AddWatchlistRequest {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
}

#[utoipa::path(
    post,
    path = "/api/watchlist",
    responses(
        (status = 200, description = "Entry saved"),
        (status = 409, description = "Symbol already saved")
    ),
    tag = "Watchlist"
)]
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(req): Json<AddWatchlistRequest>,
) -> Result<Json<ApiResponse<WatchlistEntry>>, AppError> {
    let symbol = req.symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Ok(Json(ApiResponse::error("Symbol required")));
    }

    let entry = WatchlistEntry {
        id: None,
        name: req.name.unwrap_or_else(|| symbol.clone()),
        symbol,
        sector: req.sector.unwrap_or_default(),
        industry: req.industry.unwrap_or_default(),
        score: req.score.unwrap_or(0),
        price_at_save: req.price.unwrap_or(0.0),
        added_at: Utc::now(),
    };

    let saved = state.store.add(&entry).await?;
    Ok(Json(ApiResponse::success(saved)))
}

#[derive(Serialize)]
pub struct RemoveResponse {
    pub removed: String,
    pub existed: bool,
}

#[utoipa::path(
    delete,
    path = "/api/watchlist/{symbol}",
    params(("symbol" = String, Path, description = "Ticker symbol")),
    responses((status = 200, description = "Entry removed if it existed")),
    tag = "Watchlist"
)]
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<RemoveResponse>>, AppError> {
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Ok(Json(ApiResponse::error("Symbol required")));
    }

    let existed = state.store.remove(&symbol).await?;
    Ok(Json(ApiResponse::success(RemoveResponse {
        removed: symbol,
        existed,
    })))
}
