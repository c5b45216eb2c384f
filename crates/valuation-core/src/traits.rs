use crate::{AnalysisError, DailyClose, Quote, StockMetrics, SymbolMatch};
use async_trait::async_trait;

/// Seam between the scoring pipeline and whatever vendor backs it.
///
/// Implementations must tolerate partial data: any metric the vendor cannot
/// supply stays `None` rather than failing the whole fetch.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn get_quote(&self, symbol: &str) -> Result<Quote, AnalysisError>;

    async fn get_batch_quotes(&self, symbols: &[String]) -> Result<Vec<Quote>, AnalysisError>;

    /// Full metric record for one ticker, assembled from however many vendor
    /// endpoints it takes.
    async fn get_metrics(&self, symbol: &str) -> Result<StockMetrics, AnalysisError>;

    /// Free-text symbol search (company name or partial ticker)
    async fn search_symbols(&self, query: &str) -> Result<Vec<SymbolMatch>, AnalysisError>;

    /// All known US ticker symbols
    async fn get_tickers(&self) -> Result<Vec<String>, AnalysisError>;

    /// Daily closes, most recent last
    async fn get_daily_closes(
        &self,
        symbol: &str,
        days: u32,
    ) -> Result<Vec<DailyClose>, AnalysisError>;
}
