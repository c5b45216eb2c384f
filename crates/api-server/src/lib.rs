//! HTTP surface for the stock scoring service.
//!
//! Route modules mirror the endpoint families: analysis (analyze, scan,
//! discover, recommend), market data (quote, search, tickers, performance),
//! and the watchlist CRUD. Provider credentials are read from the
//! environment exactly once here and handed to the client as an explicit
//! config struct; handlers never touch the environment.

pub mod analysis_routes;
pub mod market_routes;
pub mod watchlist_routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use fmp_client::{FmpClient, ProviderConfig};
use scan_orchestrator::ScanOrchestrator;
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use valuation_core::AnalysisError;
use watchlist::WatchlistStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScanOrchestrator>,
    pub store: WatchlistStore,
    pub provider_status: ProviderStatus,
}

/// Which provider credentials were configured at startup
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderStatus {
    pub tradier_configured: bool,
    pub fmp_configured: bool,
}

/// Uniform response envelope
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Route-level error: wraps anyhow, maps known analysis errors to useful
/// status codes, everything else to 500.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<AnalysisError>() {
            Some(AnalysisError::SymbolNotFound(_)) | Some(AnalysisError::InsufficientData(_)) => {
                StatusCode::NOT_FOUND
            }
            Some(AnalysisError::AlreadySaved(_)) => StatusCode::CONFLICT,
            Some(AnalysisError::InvalidData(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {:#}", self.0);
        }
        (status, Json(ApiResponse::<()>::error(self.0.to_string()))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: chrono::DateTime<Utc>,
    pub tradier_configured: bool,
    pub fmp_configured: bool,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health and configured providers")),
    tag = "System"
)]
pub async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        tradier_configured: state.provider_status.tradier_configured,
        fmp_configured: state.provider_status.fmp_configured,
    }))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        analysis_routes::analyze_symbol,
        analysis_routes::scan_symbols,
        analysis_routes::discover_picks,
        analysis_routes::recommend_stocks,
        market_routes::get_quote,
        market_routes::get_batch_quotes,
        market_routes::get_performance,
        market_routes::search_symbols,
        market_routes::get_tickers,
        watchlist_routes::list_watchlist,
        watchlist_routes::add_to_watchlist,
        watchlist_routes::remove_from_watchlist,
    ),
    tags(
        (name = "Analysis", description = "Scoring and valuation endpoints"),
        (name = "Market", description = "Quotes, search, and reference data"),
        (name = "Watchlist", description = "Saved symbols"),
        (name = "System", description = "Health and docs")
    )
)]
struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(analysis_routes::routes())
        .merge(market_routes::routes())
        .merge(watchlist_routes::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Process entry point: config, provider client, store, router, listener.
pub async fn run_server() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Read credentials exactly once, here
    let config = ProviderConfig::from_env();
    let provider_status = ProviderStatus {
        tradier_configured: config.tradier_configured(),
        fmp_configured: config.fmp_configured(),
    };
    if !provider_status.tradier_configured && !provider_status.fmp_configured {
        tracing::warn!(
            "No provider API keys configured — set FMP_API_KEY or TRADIER_API_KEY"
        );
    }

    let client = FmpClient::new(config);
    let orchestrator = Arc::new(ScanOrchestrator::new(Arc::new(client)));

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:watchlist.db?mode=rwc".to_string());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    let store = WatchlistStore::new(pool);
    store.init().await?;

    let state = AppState {
        orchestrator,
        store,
        provider_status,
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
