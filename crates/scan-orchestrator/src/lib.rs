//! Request-scoped analysis pipeline over a market data provider.
//!
//! One orchestrator is shared by all HTTP handlers. It owns the TTL result
//! caches and the fan-out for batch endpoints; the arithmetic itself lives in
//! `scoring-engine` and is pure. Per-ticker failures inside a batch are
//! logged and skipped, never propagated.

pub mod universe;

use chrono::{DateTime, Datelike, Duration, Utc};
use dashmap::DashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use scoring_engine::{
    classify, estimate_fair_value, normalize_percent, score_metrics, sticker_price,
    MissingPolicy, ScorerProfile,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinSet;
use valuation_core::{
    AnalysisError, FundamentalsView, MarketDataProvider, QuoteSummary, Recommendation,
    StockMetrics, TickerAnalysis,
};
use watchlist::{
    affinity_score, blended_rank, build_profile, pick_candidates, WatchlistEntry, QUALITY_FLOOR,
};

const ANALYSIS_CACHE_TTL_SECS: i64 = 300;
const TICKERS_CACHE_TTL_SECS: i64 = 3600;

struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

impl<T: Clone> CacheEntry<T> {
    fn fresh(&self, ttl_secs: i64) -> Option<T> {
        let age = (Utc::now() - self.cached_at).num_seconds();
        (age < ttl_secs).then(|| self.data.clone())
    }
}

/// One row of a batch scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanOpportunity {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub score: u32,
    pub upside: f64,
    pub recommendation: Recommendation,
    pub roa: Option<f64>,
    pub roe: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub opportunities: Vec<ScanOpportunity>,
    pub scanned: usize,
    pub timestamp: DateTime<Utc>,
}

/// One serendipitous pick from the discovery pools
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryPick {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub score: u32,
    pub upside: f64,
    pub sector: String,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub roa: Option<f64>,
    pub roe: Option<f64>,
    pub dividend_yield: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResult {
    pub picks: Vec<DiscoveryPick>,
    pub timestamp: DateTime<Utc>,
}

/// One personalized recommendation
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedStock {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub price: f64,
    pub score: u32,
    pub upside: f64,
    pub sticker_price: Option<f64>,
    pub mos_price: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(skip)]
    pub blended: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub top_sectors: Vec<String>,
    pub avg_score: i64,
    pub watchlist_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendResult {
    pub recommendations: Vec<RecommendedStock>,
    pub profile: Option<ProfileSummary>,
    pub analyzed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Percentage moves over standard display horizons
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceTimeframes {
    #[serde(rename = "1D")]
    pub one_day: Option<f64>,
    #[serde(rename = "1W")]
    pub one_week: Option<f64>,
    #[serde(rename = "1M")]
    pub one_month: Option<f64>,
    #[serde(rename = "3M")]
    pub three_months: Option<f64>,
    #[serde(rename = "6M")]
    pub six_months: Option<f64>,
    #[serde(rename = "1Y")]
    pub one_year: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceResult {
    pub symbol: String,
    pub current_price: f64,
    pub timeframes: PerformanceTimeframes,
    pub week_52_high: f64,
    pub week_52_low: f64,
    pub off_high_pct: f64,
}

pub struct ScanOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    analysis_cache: DashMap<String, CacheEntry<TickerAnalysis>>,
    tickers_cache: DashMap<&'static str, CacheEntry<Vec<String>>>,
}

impl ScanOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            analysis_cache: DashMap::new(),
            tickers_cache: DashMap::new(),
        }
    }

    pub fn provider(&self) -> &Arc<dyn MarketDataProvider> {
        &self.provider
    }

    /// Analyze one ticker under the given scorer profile (cached, 5-min TTL)
    pub async fn analyze(
        &self,
        symbol: &str,
        profile: ScorerProfile,
    ) -> Result<TickerAnalysis, AnalysisError> {
        let cache_key = format!("{}:{:?}", symbol.to_uppercase(), profile);
        if let Some(entry) = self.analysis_cache.get(&cache_key) {
            if let Some(hit) = entry.fresh(ANALYSIS_CACHE_TTL_SECS) {
                return Ok(hit);
            }
        }

        let metrics = self.provider.get_metrics(symbol).await?;
        let analysis = analyze_metrics(&metrics, profile)?;

        self.analysis_cache.insert(
            cache_key,
            CacheEntry {
                data: analysis.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(analysis)
    }

    /// Scan a list of symbols concurrently. Per-ticker failures are skipped;
    /// the rest come back sorted by score, then upside, descending.
    pub async fn scan(self: Arc<Self>, symbols: Option<Vec<String>>) -> ScanResult {
        let tickers: Vec<String> = match symbols {
            Some(list) if !list.is_empty() => list
                .into_iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .take(universe::MAX_SCAN_SYMBOLS)
                .collect(),
            _ => universe::DEFAULT_SCAN_SYMBOLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        };
        let scanned = tickers.len();

        let mut tasks = JoinSet::new();
        for symbol in tickers {
            let orchestrator = Arc::clone(&self);
            tasks.spawn(async move {
                let result = orchestrator.analyze(&symbol, ScorerProfile::Standard).await;
                (symbol, result)
            });
        }

        let mut opportunities = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(analysis))) => opportunities.push(ScanOpportunity {
                    symbol: analysis.symbol.clone(),
                    name: analysis.quote.name.clone(),
                    price: analysis.quote.price,
                    score: analysis.investment_score,
                    upside: analysis.upside_percent,
                    recommendation: analysis.recommendation.clone(),
                    roa: analysis.fundamentals.roa,
                    roe: analysis.fundamentals.roe,
                }),
                Ok((symbol, Err(e))) => {
                    tracing::warn!("Scan skipping {}: {}", symbol, e);
                }
                Err(e) => {
                    tracing::error!("Scan task error: {}", e);
                }
            }
        }

        opportunities.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| {
                b.upside
                    .partial_cmp(&a.upside)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        ScanResult {
            opportunities,
            scanned,
            timestamp: Utc::now(),
        }
    }

    /// Three serendipitous picks from three random discovery pools.
    ///
    /// The pool/symbol draw is random by design; scoring of the drawn
    /// symbols is deterministic.
    pub async fn discover<R: Rng>(&self, rng: &mut R) -> DiscoverResult {
        let mut pools: Vec<&(&str, &[&str])> = universe::DISCOVERY_POOLS.iter().collect();
        pools.shuffle(rng);
        let draws: Vec<(String, String)> = pools
            .into_iter()
            .take(3)
            .filter_map(|(label, symbols)| {
                symbols
                    .choose(rng)
                    .map(|s| (s.to_string(), label.to_string()))
            })
            .collect();

        let mut picks = Vec::new();
        for (symbol, pool_label) in draws {
            match self.provider.get_metrics(&symbol).await {
                Ok(metrics) => match discovery_pick(&metrics, &pool_label) {
                    Some(pick) => picks.push(pick),
                    None => tracing::warn!("Discovery skipping {}: no price", symbol),
                },
                Err(e) => tracing::warn!("Discovery skipping {}: {}", symbol, e),
            }
        }

        DiscoverResult {
            picks,
            timestamp: Utc::now(),
        }
    }

    /// Personalized recommendations from the saved watchlist.
    ///
    /// Builds the preference profile, draws candidates (randomized), gates on
    /// quality, blends quality with affinity, and returns the top six.
    pub async fn recommend<R: Rng>(
        self: Arc<Self>,
        entries: &[WatchlistEntry],
        quality_profile: ScorerProfile,
        rng: &mut R,
    ) -> RecommendResult {
        let Some(profile) = build_profile(entries) else {
            return RecommendResult {
                recommendations: Vec::new(),
                profile: None,
                analyzed: 0,
                message: Some(
                    "Save some stocks first — recommendations are built from your watchlist."
                        .to_string(),
                ),
                timestamp: Utc::now(),
            };
        };

        let candidate_pool = universe::recommendation_universe();
        let candidates = pick_candidates(&profile, &candidate_pool, rng);
        let analyzed = candidates.len();

        let mut tasks = JoinSet::new();
        for candidate in candidates {
            let orchestrator = Arc::clone(&self);
            tasks.spawn(async move {
                let result = orchestrator.provider.get_metrics(&candidate.symbol).await;
                (candidate, result)
            });
        }

        let mut recommendations = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (candidate, result) = match joined {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!("Recommend task error: {}", e);
                    continue;
                }
            };
            let metrics = match result {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!("Recommend skipping {}: {}", candidate.symbol, e);
                    continue;
                }
            };
            let Some(price) = metrics.price.filter(|p| *p > 0.0) else {
                continue;
            };

            let fair = estimate_fair_value(&metrics, price);
            let quality = score_metrics(&metrics, price, fair.value, quality_profile).score;
            if quality < QUALITY_FLOOR {
                continue;
            }

            let sector = metrics
                .sector
                .clone()
                .unwrap_or_else(|| candidate.sector.clone());
            let affinity = affinity_score(&profile, &sector, quality, price);
            let blended = blended_rank(quality, affinity);

            let sticker = sticker_price(&metrics);
            let upside = sticker
                .as_ref()
                .map(|s| (s.sticker_price - price) / price * 100.0)
                .unwrap_or(0.0);

            recommendations.push(RecommendedStock {
                symbol: metrics.symbol.clone(),
                name: metrics.name.clone().unwrap_or_else(|| metrics.symbol.clone()),
                sector,
                price,
                score: quality,
                upside,
                sticker_price: sticker.as_ref().map(|s| s.sticker_price),
                mos_price: sticker.as_ref().map(|s| s.mos_price),
                market_cap: metrics.market_cap,
                blended,
            });
        }

        recommendations.sort_by(|a, b| {
            b.blended
                .cmp(&a.blended)
                .then_with(|| b.score.cmp(&a.score))
                .then_with(|| {
                    b.upside
                        .partial_cmp(&a.upside)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        recommendations.truncate(6);

        RecommendResult {
            recommendations,
            profile: Some(ProfileSummary {
                top_sectors: profile.top_sectors.clone(),
                avg_score: profile.avg_score.round() as i64,
                watchlist_count: profile.count,
            }),
            analyzed,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Price performance over standard horizons, from daily closes
    pub async fn performance(&self, symbol: &str) -> Result<PerformanceResult, AnalysisError> {
        // ~13 months of trading days so the 1Y lookback always lands
        let closes = self.provider.get_daily_closes(symbol, 280).await?;
        if closes.len() < 2 {
            return Err(AnalysisError::InsufficientData(format!(
                "Not enough history for {symbol}"
            )));
        }

        let current = closes[closes.len() - 1];
        let today = current.date;

        let change_since = |target: chrono::NaiveDate| -> Option<f64> {
            let old = closes.iter().rev().find(|c| c.date <= target)?;
            if old.close > 0.0 {
                Some((current.close - old.close) / old.close * 100.0)
            } else {
                None
            }
        };

        let months_ago = |months: u32| -> chrono::NaiveDate {
            let target_day = today.day().min(28);
            today
                .with_day(target_day)
                .and_then(|d| d.checked_sub_months(chrono::Months::new(months)))
                .unwrap_or(today - Duration::days(months as i64 * 30))
        };

        let prev = closes[closes.len() - 2];
        let one_day = (prev.close > 0.0)
            .then(|| (current.close - prev.close) / prev.close * 100.0);

        let high = closes.iter().map(|c| c.close).fold(f64::MIN, f64::max);
        let low = closes.iter().map(|c| c.close).fold(f64::MAX, f64::min);
        let off_high_pct = if high > 0.0 {
            (current.close - high) / high * 100.0
        } else {
            0.0
        };

        Ok(PerformanceResult {
            symbol: symbol.to_uppercase(),
            current_price: current.close,
            timeframes: PerformanceTimeframes {
                one_day,
                one_week: change_since(today - Duration::days(7)),
                one_month: change_since(months_ago(1)),
                three_months: change_since(months_ago(3)),
                six_months: change_since(months_ago(6)),
                one_year: change_since(months_ago(12)),
            },
            week_52_high: high,
            week_52_low: low,
            off_high_pct,
        })
    }

    /// All known US tickers (cached, 1-hour TTL)
    pub async fn tickers(&self) -> Result<Vec<String>, AnalysisError> {
        if let Some(entry) = self.tickers_cache.get("all") {
            if let Some(hit) = entry.fresh(TICKERS_CACHE_TTL_SECS) {
                return Ok(hit);
            }
        }

        let tickers = self.provider.get_tickers().await?;
        self.tickers_cache.insert(
            "all",
            CacheEntry {
                data: tickers.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(tickers)
    }
}

/// Assemble the full analysis for already-fetched metrics.
///
/// Fails only when no positive price is present — every other missing field
/// degrades to a skipped method or an unearned criterion.
pub fn analyze_metrics(
    metrics: &StockMetrics,
    profile: ScorerProfile,
) -> Result<TickerAnalysis, AnalysisError> {
    let price = metrics
        .price
        .filter(|p| *p > 0.0)
        .ok_or_else(|| AnalysisError::InsufficientData(format!("No price for {}", metrics.symbol)))?;

    let fair = estimate_fair_value(metrics, price);
    let upside = fair.upside_percent(price);
    let score = score_metrics(metrics, price, fair.value, profile);
    let sticker = sticker_price(metrics);
    let sticker_verdict = sticker.as_ref().map(|s| s.verdict(price));
    let recommendation = classify(score.score, upside);

    // Display path: preserve nulls so missing data renders as N/A
    let display = MissingPolicy::PreserveNull;
    let fundamentals = FundamentalsView {
        pe_ratio: metrics.trailing_pe,
        ps_ratio: metrics.ps_ratio,
        pb_ratio: metrics.pb_ratio,
        eps: metrics.trailing_eps,
        roa: normalize_percent(metrics.roa, display),
        roe: normalize_percent(metrics.roe, display),
        profit_margin: normalize_percent(metrics.profit_margin, display),
        gross_margin: normalize_percent(metrics.gross_margin, display),
        cash: metrics.total_cash,
        debt: metrics.total_debt,
        fcf: metrics.free_cash_flow,
        dividend_yield: normalize_percent(metrics.dividend_yield, display),
    };

    Ok(TickerAnalysis {
        symbol: metrics.symbol.clone(),
        timestamp: Utc::now(),
        quote: QuoteSummary {
            name: metrics.name.clone().unwrap_or_else(|| metrics.symbol.clone()),
            price,
            change_percent: metrics.change_percent,
            market_cap: metrics.market_cap,
            week_52_high: metrics.week_52_high,
            week_52_low: metrics.week_52_low,
            sector: metrics.sector.clone(),
            industry: metrics.industry.clone(),
        },
        fundamentals,
        fair_value: fair.value,
        fair_value_components: fair.components,
        upside_percent: upside,
        investment_score: score.score,
        checklist: score.checks,
        sticker,
        sticker_verdict,
        recommendation,
    })
}

/// Quick-score a discovery draw: cliff-edge checklist with the analyst
/// target as the fair-value input. Returns `None` without a price.
fn discovery_pick(metrics: &StockMetrics, pool_label: &str) -> Option<DiscoveryPick> {
    let price = metrics.price.filter(|p| *p > 0.0)?;

    let target_fair = metrics.target_mean_price.filter(|t| *t > 0.0).unwrap_or(price);
    let score = score_metrics(metrics, price, target_fair, ScorerProfile::Standard);
    let upside = if target_fair > 0.0 {
        (target_fair - price) / price * 100.0
    } else {
        0.0
    };

    let display = MissingPolicy::PreserveNull;
    Some(DiscoveryPick {
        symbol: metrics.symbol.clone(),
        name: metrics.name.clone().unwrap_or_else(|| metrics.symbol.clone()),
        price,
        score: score.score,
        upside,
        sector: metrics
            .sector
            .clone()
            .unwrap_or_else(|| pool_label.to_string()),
        industry: metrics.industry.clone(),
        market_cap: metrics.market_cap,
        pe_ratio: metrics.trailing_pe,
        roa: normalize_percent(metrics.roa, display),
        roe: normalize_percent(metrics.roe, display),
        dividend_yield: normalize_percent(metrics.dividend_yield, display),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use valuation_core::{DailyClose, Quote, SymbolMatch};

    /// Provider stub: canned metrics per symbol, errors for the rest
    struct StubProvider {
        metrics: HashMap<String, StockMetrics>,
        closes: Vec<DailyClose>,
    }

    impl StubProvider {
        fn new(metrics: Vec<StockMetrics>) -> Self {
            Self {
                metrics: metrics
                    .into_iter()
                    .map(|m| (m.symbol.clone(), m))
                    .collect(),
                closes: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl MarketDataProvider for StubProvider {
        async fn get_quote(&self, _symbol: &str) -> Result<Quote, AnalysisError> {
            Err(AnalysisError::ApiError("not stubbed".to_string()))
        }

        async fn get_batch_quotes(&self, _symbols: &[String]) -> Result<Vec<Quote>, AnalysisError> {
            Err(AnalysisError::ApiError("not stubbed".to_string()))
        }

        async fn get_metrics(&self, symbol: &str) -> Result<StockMetrics, AnalysisError> {
            self.metrics
                .get(&symbol.to_uppercase())
                .cloned()
                .ok_or_else(|| AnalysisError::SymbolNotFound(symbol.to_string()))
        }

        async fn search_symbols(&self, _query: &str) -> Result<Vec<SymbolMatch>, AnalysisError> {
            Ok(Vec::new())
        }

        async fn get_tickers(&self) -> Result<Vec<String>, AnalysisError> {
            Ok(vec!["AAPL".to_string()])
        }

        async fn get_daily_closes(
            &self,
            _symbol: &str,
            _days: u32,
        ) -> Result<Vec<DailyClose>, AnalysisError> {
            if self.closes.is_empty() {
                Err(AnalysisError::SymbolNotFound("none".to_string()))
            } else {
                Ok(self.closes.clone())
            }
        }
    }

    fn metrics_with_score(symbol: &str, roa: f64) -> StockMetrics {
        StockMetrics {
            symbol: symbol.to_string(),
            name: Some(format!("{symbol} Inc")),
            price: Some(100.0),
            roa: Some(roa),
            roe: Some(roa),
            total_cash: Some(10e9),
            total_debt: Some(1e9),
            profit_margin: Some(0.2),
            free_cash_flow: Some(1e9),
            market_cap: Some(50e9),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn batch_scan_isolates_failures_and_sorts() {
        // Five symbols requested, one unknown to the provider
        let provider = StubProvider::new(vec![
            metrics_with_score("AAA", 0.02),
            metrics_with_score("BBB", 0.12),
            metrics_with_score("CCC", 0.07),
            metrics_with_score("DDD", 0.15),
        ]);
        let orchestrator = Arc::new(ScanOrchestrator::new(Arc::new(provider)));

        let result = orchestrator
            .scan(Some(
                ["AAA", "BBB", "CCC", "DDD", "FAIL"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ))
            .await;

        assert_eq!(result.scanned, 5);
        assert_eq!(result.opportunities.len(), 4);
        let scores: Vec<u32> = result.opportunities.iter().map(|o| o.score).collect();
        let mut sorted = scores.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn analyze_requires_a_price() {
        let mut m = StockMetrics::new("NOPX");
        m.roa = Some(0.2);
        let provider = StubProvider::new(vec![m]);
        let orchestrator = ScanOrchestrator::new(Arc::new(provider));

        let err = orchestrator
            .analyze("NOPX", ScorerProfile::Standard)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::InsufficientData(_)));
    }

    #[tokio::test]
    async fn analyze_assembles_the_full_payload() {
        let mut m = metrics_with_score("FULL", 0.12);
        m.sector = Some("Technology".to_string());
        m.trailing_eps = Some(5.0);
        m.earnings_growth = Some(0.20);
        m.target_mean_price = Some(140.0);
        let provider = StubProvider::new(vec![m]);
        let orchestrator = ScanOrchestrator::new(Arc::new(provider));

        let analysis = orchestrator
            .analyze("FULL", ScorerProfile::Standard)
            .await
            .unwrap();

        assert_eq!(analysis.symbol, "FULL");
        assert!(!analysis.fair_value_components.is_empty());
        assert!(analysis.investment_score <= 100);
        assert!(analysis.sticker.is_some());
        assert!(analysis.sticker_verdict.is_some());
        // Display fundamentals are normalized percentages
        assert_eq!(analysis.fundamentals.roa, Some(12.0));
        // Missing display fields stay None rather than zero
        assert_eq!(analysis.fundamentals.gross_margin, None);
    }

    #[tokio::test]
    async fn recommend_empty_watchlist_yields_message() {
        let provider = StubProvider::new(Vec::new());
        let orchestrator = Arc::new(ScanOrchestrator::new(Arc::new(provider)));
        let mut rng = StdRng::seed_from_u64(1);

        let result = orchestrator
            .recommend(&[], ScorerProfile::Proportional, &mut rng)
            .await;

        assert!(result.recommendations.is_empty());
        assert!(result.profile.is_none());
        assert!(result.message.is_some());
    }

    #[tokio::test]
    async fn recommend_gates_on_quality_and_caps_at_six() {
        // Every Technology symbol in the universe resolves to strong metrics
        let strong: Vec<StockMetrics> = universe::recommendation_universe()
            .into_iter()
            .filter(|c| c.sector == "Technology")
            .map(|c| {
                let mut m = metrics_with_score(&c.symbol, 0.15);
                m.sector = Some("Technology".to_string());
                m
            })
            .collect();
        let provider = StubProvider::new(strong);
        let orchestrator = Arc::new(ScanOrchestrator::new(Arc::new(provider)));

        let saved = vec![WatchlistEntry {
            id: None,
            symbol: "AAPL".to_string(),
            name: "Apple".to_string(),
            sector: "Technology".to_string(),
            industry: String::new(),
            score: 70,
            price_at_save: 100.0,
            added_at: Utc::now(),
        }];

        let mut rng = StdRng::seed_from_u64(99);
        let result = orchestrator
            .recommend(&saved, ScorerProfile::Proportional, &mut rng)
            .await;

        assert!(result.recommendations.len() <= 6);
        assert!(!result.recommendations.is_empty());
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.score >= QUALITY_FLOOR));
        assert!(result
            .recommendations
            .iter()
            .all(|r| r.symbol != "AAPL"));
        let summary = result.profile.unwrap();
        assert_eq!(summary.watchlist_count, 1);
        assert_eq!(summary.top_sectors, vec!["Technology".to_string()]);
    }

    #[tokio::test]
    async fn performance_computes_timeframe_changes() {
        use chrono::NaiveDate;

        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let closes: Vec<DailyClose> = (0..400)
            .map(|i| DailyClose {
                date: start + Duration::days(i),
                close: 100.0 + i as f64 * 0.25,
            })
            .collect();

        let mut provider = StubProvider::new(Vec::new());
        provider.closes = closes.clone();
        let orchestrator = ScanOrchestrator::new(Arc::new(provider));

        let perf = orchestrator.performance("trend").await.unwrap();
        assert_eq!(perf.symbol, "TREND");
        let last = closes.last().unwrap().close;
        assert!((perf.current_price - last).abs() < 1e-9);
        // Monotonic uptrend: every horizon is positive and the 52-week high
        // is the latest close
        assert!(perf.timeframes.one_day.unwrap() > 0.0);
        assert!(perf.timeframes.one_week.unwrap() > 0.0);
        assert!(perf.timeframes.one_year.unwrap() > perf.timeframes.one_month.unwrap());
        assert!((perf.week_52_high - last).abs() < 1e-9);
        assert!((perf.off_high_pct - 0.0).abs() < 1e-9);
    }

    #[test]
    fn discovery_pick_quick_scores_against_target() {
        let mut m = metrics_with_score("DISC", 0.12);
        m.target_mean_price = Some(140.0);
        let pick = discovery_pick(&m, "Large Cap Tech").unwrap();
        assert!((pick.upside - 40.0).abs() < 1e-9);
        assert!(pick.score > 0);
        assert_eq!(pick.sector, "Large Cap Tech");

        m.price = None;
        assert!(discovery_pick(&m, "Large Cap Tech").is_none());
    }
}
