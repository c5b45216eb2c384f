//! Market data client: Financial Modeling Prep REST API for fundamentals,
//! with a Tradier quote fallback and a GitHub mirror for exchange ticker
//! lists. Every fundamentals sub-fetch degrades to missing fields instead of
//! failing the whole record.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use valuation_core::{
    AnalysisError, DailyClose, MarketDataProvider, Quote, StockMetrics, SymbolMatch,
};

const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api";
const TRADIER_BASE_URL: &str = "https://sandbox.tradier.com/v1";
const TICKER_LIST_BASE_URL: &str =
    "https://raw.githubusercontent.com/rreichel3/US-Stock-Symbols/main";

const US_EXCHANGES: &[&str] = &["NASDAQ", "NYSE", "AMEX", "ARCA", "BATS"];

/// Provider credentials and limits, built once by the process entry point
/// and handed to the client. Request handlers never read the environment.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub fmp_api_key: Option<String>,
    pub tradier_api_key: Option<String>,
    /// Requests per minute across all provider endpoints
    pub rate_limit_per_minute: usize,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Read configuration from the environment. Call this from `main` only.
    pub fn from_env() -> Self {
        let non_empty = |v: Result<String, std::env::VarError>| v.ok().filter(|s| !s.is_empty());
        Self {
            fmp_api_key: non_empty(std::env::var("FMP_API_KEY")),
            tradier_api_key: non_empty(std::env::var("TRADIER_API_KEY")),
            rate_limit_per_minute: std::env::var("PROVIDER_RATE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            timeout_secs: 10,
        }
    }

    pub fn fmp_configured(&self) -> bool {
        self.fmp_api_key.is_some()
    }

    pub fn tradier_configured(&self) -> bool {
        self.tradier_api_key.is_some()
    }
}

/// Sliding-window rate limiter: at most `max_requests` per `window`.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            let wait_until = ts.front().unwrap().checked_add(self.window).unwrap();
            let sleep_dur = wait_until.duration_since(now) + Duration::from_millis(50);
            drop(ts);
            tracing::debug!(
                "Rate limiter: waiting {:.1}s for provider slot",
                sleep_dur.as_secs_f64()
            );
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

#[derive(Clone)]
pub struct FmpClient {
    config: ProviderConfig,
    client: Client,
    rate_limiter: RateLimiter,
}

impl FmpClient {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .unwrap_or_else(|_| Client::new());
        let rate_limiter = RateLimiter::new(config.rate_limit_per_minute, Duration::from_secs(60));

        Self {
            config,
            client,
            rate_limiter,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Send a request with rate limiting and automatic 429 retry
    async fn send_request(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, AnalysisError> {
        let request = builder
            .build()
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        for attempt in 0..3u32 {
            self.rate_limiter.acquire().await;
            let req_clone = request
                .try_clone()
                .ok_or_else(|| AnalysisError::ApiError("Cannot clone request".to_string()))?;
            let response = self
                .client
                .execute(req_clone)
                .await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

            if response.status().as_u16() != 429 {
                return Ok(response);
            }

            let wait_secs = 15u64;
            tracing::warn!(
                "Provider 429 rate limited, waiting {}s before retry {}/3",
                wait_secs,
                attempt + 1
            );
            tokio::time::sleep(Duration::from_secs(wait_secs)).await;
        }

        Err(AnalysisError::ApiError(
            "Rate limited by provider after 3 retries".to_string(),
        ))
    }

    /// GET an FMP v3/v4 endpoint and deserialize the JSON body.
    /// 401/403 (plan-gated endpoints) come back as `None` so callers degrade
    /// to missing fields instead of erroring.
    async fn fmp_get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra_query: &[(&str, String)],
    ) -> Result<Option<T>, AnalysisError> {
        let api_key = self
            .config
            .fmp_api_key
            .as_ref()
            .ok_or_else(|| AnalysisError::ApiError("FMP API key not configured".to_string()))?;

        let url = format!("{FMP_BASE_URL}{path}");
        let mut query: Vec<(&str, String)> = vec![("apikey", api_key.clone())];
        query.extend(extra_query.iter().cloned());

        let response = self.send_request(self.client.get(&url).query(&query)).await?;
        let status = response.status();

        if status.as_u16() == 401 || status.as_u16() == 403 {
            tracing::debug!("FMP {} gated ({}), skipping", path, status);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        Ok(Some(body))
    }

    async fn tradier_quotes(&self, symbols: &str) -> Result<Vec<TradierQuote>, AnalysisError> {
        let api_key = match &self.config.tradier_api_key {
            Some(k) => k,
            None => return Ok(Vec::new()),
        };

        let url = format!("{TRADIER_BASE_URL}/markets/quotes");
        let response = self
            .send_request(
                self.client
                    .get(&url)
                    .bearer_auth(api_key)
                    .header("Accept", "application/json")
                    .query(&[("symbols", symbols)]),
            )
            .await?;

        if !response.status().is_success() {
            tracing::warn!("Tradier HTTP {}, falling back", response.status());
            return Ok(Vec::new());
        }

        let body: TradierQuotesResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        Ok(body.quotes.map(|q| q.quote.into_vec()).unwrap_or_default())
    }

    async fn fmp_quote(&self, symbols: &str) -> Result<Vec<FmpQuote>, AnalysisError> {
        Ok(self
            .fmp_get::<Vec<FmpQuote>>(&format!("/v3/quote/{symbols}"), &[])
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl MarketDataProvider for FmpClient {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, AnalysisError> {
        let symbol = symbol.to_uppercase();

        if !self.config.tradier_configured() && !self.config.fmp_configured() {
            return Err(AnalysisError::ApiError(
                "No provider API key configured".to_string(),
            ));
        }

        if self.config.tradier_configured() {
            if let Some(q) = self.tradier_quotes(&symbol).await?.into_iter().next() {
                if q.last.unwrap_or(0.0) > 0.0 {
                    return Ok(q.into_quote());
                }
            }
        }

        if self.config.fmp_configured() {
            if let Some(q) = self.fmp_quote(&symbol).await?.into_iter().next() {
                if q.price.unwrap_or(0.0) > 0.0 {
                    return Ok(q.into_quote());
                }
            }
        }

        Err(AnalysisError::SymbolNotFound(symbol))
    }

    async fn get_batch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, AnalysisError> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }
        let joined = symbols
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join(",");

        if self.config.tradier_configured() {
            let quotes = self.tradier_quotes(&joined).await?;
            if !quotes.is_empty() {
                return Ok(quotes.into_iter().map(|q| q.into_quote()).collect());
            }
        }

        Ok(self
            .fmp_quote(&joined)
            .await?
            .into_iter()
            .map(|q| q.into_quote())
            .collect())
    }

    async fn get_metrics(&self, symbol: &str) -> Result<StockMetrics, AnalysisError> {
        let symbol = symbol.to_uppercase();
        let mut metrics = StockMetrics::new(symbol.clone());
        let fmp = self.config.fmp_configured();

        // Quote first: without a price the record is useless downstream
        if fmp {
            match self.fmp_quote(&symbol).await {
                Ok(rows) => {
                    if let Some(q) = rows.into_iter().next() {
                        metrics.name = q.name.clone();
                        metrics.price = q.price.filter(|p| *p > 0.0);
                        metrics.change_percent = q.changes_percentage;
                        metrics.market_cap = q.market_cap.filter(|m| *m > 0.0);
                        metrics.week_52_high = q.year_high;
                        metrics.week_52_low = q.year_low;
                        metrics.trailing_eps = q.eps;
                        metrics.trailing_pe = q.pe;
                        metrics.shares_outstanding = q.shares_outstanding;
                    }
                }
                Err(e) => tracing::debug!("quote failed for {}: {}", symbol, e),
            }
        }

        if metrics.price.is_none() && self.config.tradier_configured() {
            if let Some(q) = self.tradier_quotes(&symbol).await?.into_iter().next() {
                metrics.price = q.last.filter(|p| *p > 0.0);
                metrics.change_percent = q.change_percentage;
                metrics.week_52_high = q.week_52_high;
                metrics.week_52_low = q.week_52_low;
                if metrics.name.is_none() {
                    metrics.name = q.description.clone();
                }
            }
        }

        // TTM ratios: fractions as delivered; normalization happens in the
        // scoring engine
        match self
            .fmp_get::<Vec<FmpRatiosTtm>>(&format!("/v3/ratios-ttm/{symbol}"), &[])
            .await
        {
            Ok(Some(rows)) => {
                if let Some(r) = rows.into_iter().next() {
                    metrics.roa = r.return_on_assets_ttm;
                    metrics.roe = r.return_on_equity_ttm;
                    metrics.profit_margin = r.net_profit_margin_ttm;
                    metrics.gross_margin = r.gross_profit_margin_ttm;
                    metrics.ps_ratio = r.price_to_sales_ratio_ttm;
                    metrics.pb_ratio = r.price_book_value_ratio_ttm;
                    metrics.dividend_yield = r.dividend_yield_ttm;
                    metrics.payout_ratio = r.payout_ratio_ttm;
                    if metrics.trailing_pe.is_none() {
                        metrics.trailing_pe = r.pe_ratio_ttm;
                    }
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("ratios-ttm failed for {}: {}", symbol, e),
        }

        // Balance sheet: cash vs debt
        match self
            .fmp_get::<Vec<FmpBalanceSheet>>(
                &format!("/v3/balance-sheet-statement/{symbol}"),
                &[("limit", "1".to_string())],
            )
            .await
        {
            Ok(Some(rows)) => {
                if let Some(b) = rows.into_iter().next() {
                    metrics.total_cash = b.cash_and_cash_equivalents;
                    metrics.total_debt = b.total_debt;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("balance sheet failed for {}: {}", symbol, e),
        }

        // Cash flow: FCF
        match self
            .fmp_get::<Vec<FmpCashFlow>>(
                &format!("/v3/cash-flow-statement/{symbol}"),
                &[("limit", "1".to_string())],
            )
            .await
        {
            Ok(Some(rows)) => {
                if let Some(c) = rows.into_iter().next() {
                    metrics.free_cash_flow = c.free_cash_flow;
                    metrics.total_revenue = c.revenue;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("cash flow failed for {}: {}", symbol, e),
        }

        // Profile: name, sector, industry
        match self
            .fmp_get::<Vec<FmpProfile>>(&format!("/v3/profile/{symbol}"), &[])
            .await
        {
            Ok(Some(rows)) => {
                if let Some(p) = rows.into_iter().next() {
                    if p.company_name.is_some() {
                        metrics.name = p.company_name;
                    }
                    metrics.sector = p.sector.filter(|s| !s.is_empty());
                    metrics.industry = p.industry.filter(|s| !s.is_empty());
                    if metrics.market_cap.is_none() {
                        metrics.market_cap = p.mkt_cap.filter(|m| *m > 0.0);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("profile failed for {}: {}", symbol, e),
        }

        // Growth rates
        match self
            .fmp_get::<Vec<FmpFinancialGrowth>>(
                &format!("/v3/financial-growth/{symbol}"),
                &[("limit", "1".to_string())],
            )
            .await
        {
            Ok(Some(rows)) => {
                if let Some(g) = rows.into_iter().next() {
                    metrics.revenue_growth = g.revenue_growth;
                    metrics.earnings_growth = g.eps_growth.or(g.net_income_growth);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("financial growth failed for {}: {}", symbol, e),
        }

        // Analyst forward EPS estimate
        match self
            .fmp_get::<Vec<FmpAnalystEstimate>>(
                &format!("/v3/analyst-estimates/{symbol}"),
                &[("limit", "1".to_string())],
            )
            .await
        {
            Ok(Some(rows)) => {
                if let Some(est) = rows.into_iter().next() {
                    metrics.forward_eps = est.estimated_eps_avg.filter(|e| *e > 0.0);
                    if let (Some(price), Some(fwd)) = (metrics.price, metrics.forward_eps) {
                        if fwd > 0.0 {
                            metrics.forward_pe = Some(price / fwd);
                        }
                    }
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("analyst estimates failed for {}: {}", symbol, e),
        }

        // Analyst price-target consensus
        match self
            .fmp_get::<Vec<FmpPriceTargetConsensus>>(
                "/v4/price-target-consensus",
                &[("symbol", symbol.clone())],
            )
            .await
        {
            Ok(Some(rows)) => {
                if let Some(pt) = rows.into_iter().next() {
                    metrics.target_mean_price = pt.target_consensus.filter(|t| *t > 0.0);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::debug!("price target failed for {}: {}", symbol, e),
        }

        if metrics.price.is_none() {
            return Err(AnalysisError::SymbolNotFound(symbol));
        }

        Ok(metrics)
    }

    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, AnalysisError> {
        let rows: Vec<FmpSearchResult> = self
            .fmp_get(
                "/v3/search",
                &[
                    ("query", query.to_string()),
                    ("limit", "15".to_string()),
                ],
            )
            .await?
            .unwrap_or_default();

        Ok(filter_search_results(rows))
    }

    async fn get_tickers(&self) -> Result<Vec<String>, AnalysisError> {
        let mut tickers: BTreeSet<String> = BTreeSet::new();

        for exchange in ["nasdaq", "nyse", "amex"] {
            let url = format!("{TICKER_LIST_BASE_URL}/{exchange}/{exchange}_tickers.json");
            let response = self.send_request(self.client.get(&url)).await?;
            if !response.status().is_success() {
                tracing::warn!("Ticker list {} returned {}", exchange, response.status());
                continue;
            }
            let list: Vec<String> = response
                .json()
                .await
                .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
            tickers.extend(list);
        }

        if tickers.is_empty() {
            return Err(AnalysisError::ApiError(
                "No ticker lists available".to_string(),
            ));
        }

        Ok(tickers.into_iter().collect())
    }

    async fn get_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyClose>, AnalysisError> {
        let symbol = symbol.to_uppercase();
        let body: FmpHistoricalResponse = self
            .fmp_get(
                &format!("/v3/historical-price-full/{symbol}"),
                &[
                    ("serietype", "line".to_string()),
                    ("timeseries", days.to_string()),
                ],
            )
            .await?
            .ok_or_else(|| AnalysisError::ApiError("History endpoint gated".to_string()))?;

        // FMP returns newest first; callers want oldest first
        let mut closes: Vec<DailyClose> = body
            .historical
            .into_iter()
            .filter_map(|row| {
                let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").ok()?;
                Some(DailyClose {
                    date,
                    close: row.close,
                })
            })
            .collect();
        closes.sort_by_key(|c| c.date);

        if closes.is_empty() {
            return Err(AnalysisError::SymbolNotFound(symbol));
        }

        Ok(closes)
    }
}

/// Keep US-listed, dot-free equity/ETF symbols, capped at 8
fn filter_search_results(rows: Vec<FmpSearchResult>) -> Vec<SymbolMatch> {
    rows.into_iter()
        .filter(|r| !r.symbol.contains('.'))
        .filter(|r| {
            r.exchange_short_name
                .as_deref()
                .map(|e| US_EXCHANGES.contains(&e))
                .unwrap_or(false)
        })
        .take(8)
        .map(|r| SymbolMatch {
            symbol: r.symbol,
            name: r.name.unwrap_or_default(),
            exchange: r.exchange_short_name.unwrap_or_default(),
            symbol_type: "EQUITY".to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Tradier nests a single quote as an object and several as an array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TradierQuotesResponse {
    quotes: Option<TradierQuotes>,
}

#[derive(Debug, Deserialize)]
struct TradierQuotes {
    quote: OneOrMany<TradierQuote>,
}

#[derive(Debug, Deserialize)]
struct TradierQuote {
    symbol: String,
    description: Option<String>,
    last: Option<f64>,
    change: Option<f64>,
    change_percentage: Option<f64>,
    volume: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    open: Option<f64>,
    prevclose: Option<f64>,
    week_52_high: Option<f64>,
    week_52_low: Option<f64>,
}

impl TradierQuote {
    fn into_quote(self) -> Quote {
        Quote {
            name: self.description.clone().unwrap_or_else(|| self.symbol.clone()),
            symbol: self.symbol,
            price: self.last.unwrap_or(0.0),
            change: self.change,
            change_percent: self.change_percentage,
            volume: self.volume,
            high: self.high,
            low: self.low,
            open: self.open,
            prev_close: self.prevclose,
            week_52_high: self.week_52_high,
            week_52_low: self.week_52_low,
            market_cap: None,
            source: "tradier".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpQuote {
    symbol: String,
    name: Option<String>,
    price: Option<f64>,
    changes_percentage: Option<f64>,
    change: Option<f64>,
    day_high: Option<f64>,
    day_low: Option<f64>,
    open: Option<f64>,
    previous_close: Option<f64>,
    year_high: Option<f64>,
    year_low: Option<f64>,
    market_cap: Option<f64>,
    volume: Option<f64>,
    pe: Option<f64>,
    eps: Option<f64>,
    shares_outstanding: Option<f64>,
}

impl FmpQuote {
    fn into_quote(self) -> Quote {
        Quote {
            name: self.name.clone().unwrap_or_else(|| self.symbol.clone()),
            symbol: self.symbol,
            price: self.price.unwrap_or(0.0),
            change: self.change,
            change_percent: self.changes_percentage,
            volume: self.volume,
            high: self.day_high,
            low: self.day_low,
            open: self.open,
            prev_close: self.previous_close,
            week_52_high: self.year_high,
            week_52_low: self.year_low,
            market_cap: self.market_cap,
            source: "fmp".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpRatiosTtm {
    #[serde(rename = "returnOnAssetsTTM")]
    return_on_assets_ttm: Option<f64>,
    #[serde(rename = "returnOnEquityTTM")]
    return_on_equity_ttm: Option<f64>,
    #[serde(rename = "netProfitMarginTTM")]
    net_profit_margin_ttm: Option<f64>,
    #[serde(rename = "grossProfitMarginTTM")]
    gross_profit_margin_ttm: Option<f64>,
    #[serde(rename = "priceToSalesRatioTTM")]
    price_to_sales_ratio_ttm: Option<f64>,
    #[serde(rename = "priceBookValueRatioTTM")]
    price_book_value_ratio_ttm: Option<f64>,
    #[serde(rename = "peRatioTTM")]
    pe_ratio_ttm: Option<f64>,
    // FMP spells this field without the d
    #[serde(rename = "dividendYielTTM", alias = "dividendYieldTTM")]
    dividend_yield_ttm: Option<f64>,
    #[serde(rename = "payoutRatioTTM")]
    payout_ratio_ttm: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpBalanceSheet {
    cash_and_cash_equivalents: Option<f64>,
    total_debt: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpCashFlow {
    free_cash_flow: Option<f64>,
    revenue: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpProfile {
    company_name: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    mkt_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpFinancialGrowth {
    revenue_growth: Option<f64>,
    #[serde(rename = "epsgrowth")]
    eps_growth: Option<f64>,
    net_income_growth: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpAnalystEstimate {
    estimated_eps_avg: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FmpPriceTargetConsensus {
    target_consensus: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FmpSearchResult {
    symbol: String,
    name: Option<String>,
    #[serde(rename = "exchangeShortName")]
    exchange_short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalResponse {
    #[serde(default)]
    historical: Vec<FmpHistoricalRow>,
}

#[derive(Debug, Deserialize)]
struct FmpHistoricalRow {
    date: String,
    close: f64,
}
