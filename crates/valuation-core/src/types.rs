use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Real-time quote data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub high: Option<f64>,
    #[serde(default)]
    pub low: Option<f64>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default)]
    pub prev_close: Option<f64>,
    #[serde(default)]
    pub week_52_high: Option<f64>,
    #[serde(default)]
    pub week_52_low: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Which provider answered ("tradier" or "fmp")
    pub source: String,
}

/// Raw per-ticker financial fields as returned by the provider.
///
/// Every field may be absent. Ratio-like fields arrive in whatever scale the
/// upstream source uses (decimal fraction or percentage) and are only
/// normalized downstream by the scoring engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockMetrics {
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub week_52_high: Option<f64>,
    #[serde(default)]
    pub week_52_low: Option<f64>,
    #[serde(default)]
    pub roa: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub total_cash: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
    #[serde(default)]
    pub profit_margin: Option<f64>,
    #[serde(default)]
    pub gross_margin: Option<f64>,
    #[serde(default)]
    pub ps_ratio: Option<f64>,
    #[serde(default)]
    pub pb_ratio: Option<f64>,
    #[serde(default)]
    pub trailing_eps: Option<f64>,
    #[serde(default)]
    pub forward_eps: Option<f64>,
    #[serde(default)]
    pub trailing_pe: Option<f64>,
    #[serde(default)]
    pub forward_pe: Option<f64>,
    #[serde(default)]
    pub target_mean_price: Option<f64>,
    #[serde(default)]
    pub earnings_growth: Option<f64>,
    #[serde(default)]
    pub revenue_growth: Option<f64>,
    #[serde(default)]
    pub earnings_quarterly_growth: Option<f64>,
    #[serde(default)]
    pub free_cash_flow: Option<f64>,
    #[serde(default)]
    pub total_revenue: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub payout_ratio: Option<f64>,
    #[serde(default)]
    pub book_value_per_share: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
}

impl StockMetrics {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }
}

/// One valuation method that contributed to the blended fair value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairValueComponent {
    pub method: String,
    pub value: f64,
}

/// Blended fair-value figure plus the methods that produced it.
///
/// `components` is empty when no method fired; in that case `value` is the
/// current price and upside is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairValueEstimate {
    pub value: f64,
    pub components: Vec<FairValueComponent>,
}

impl FairValueEstimate {
    /// Upside percentage of `value` over `price`; zero when price is zero.
    pub fn upside_percent(&self, price: f64) -> f64 {
        if price > 0.0 {
            (self.value - price) / price * 100.0
        } else {
            0.0
        }
    }
}

/// Display status for a scoring criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// One row of the scoring checklist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreCheck {
    pub status: CheckStatus,
    pub text: String,
    pub points: u32,
    pub max_points: u32,
}

impl ScoreCheck {
    pub fn new(status: CheckStatus, text: impl Into<String>, points: u32, max_points: u32) -> Self {
        Self {
            status,
            text: text.into(),
            points,
            max_points,
        }
    }
}

/// Aggregate investment score with the per-criterion breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Clamped to [0, 100]
    pub score: u32,
    pub checks: Vec<ScoreCheck>,
}

/// Ten-year growth-projection buy-price model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StickerPrice {
    pub eps: f64,
    /// Annual growth rate as a percentage, capped at 30
    pub growth_rate: f64,
    pub future_eps: f64,
    /// Capped at 50
    pub future_pe: f64,
    pub future_price: f64,
    pub sticker_price: f64,
    /// Half the sticker price
    pub mos_price: f64,
}

/// Where the current price sits relative to the sticker-price thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceVerdict {
    #[serde(rename = "ON SALE")]
    OnSale,
    #[serde(rename = "FAIR VALUE")]
    FairValue,
    #[serde(rename = "OVERPRICED")]
    Overpriced,
}

impl StickerPrice {
    pub fn verdict(&self, price: f64) -> PriceVerdict {
        if price <= self.mos_price {
            PriceVerdict::OnSale
        } else if price <= self.sticker_price {
            PriceVerdict::FairValue
        } else {
            PriceVerdict::Overpriced
        }
    }
}

/// Discrete recommendation signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    #[serde(rename = "STRONG BUY")]
    StrongBuy,
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "HOLD")]
    Hold,
    #[serde(rename = "WATCH")]
    Watch,
    #[serde(rename = "AVOID")]
    Avoid,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::StrongBuy => "STRONG BUY",
            Signal::Buy => "BUY",
            Signal::Hold => "HOLD",
            Signal::Watch => "WATCH",
            Signal::Avoid => "AVOID",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Signal::StrongBuy | Signal::Buy => "#00d374",
            Signal::Hold | Signal::Watch => "#ffb800",
            Signal::Avoid => "#ff5252",
        }
    }
}

/// Signal plus its display color and explanation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub signal: Signal,
    pub color: String,
    pub reason: String,
}

/// Quote block of the analyze payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub week_52_high: Option<f64>,
    #[serde(default)]
    pub week_52_low: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

/// Fundamentals block of the analyze payload.
///
/// All ratios are percentages where applicable. Fields stay `None` when the
/// provider had no data, so the UI renders N/A instead of a fake zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FundamentalsView {
    pub pe_ratio: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub eps: Option<f64>,
    pub roa: Option<f64>,
    pub roe: Option<f64>,
    pub profit_margin: Option<f64>,
    pub gross_margin: Option<f64>,
    pub cash: Option<f64>,
    pub debt: Option<f64>,
    pub fcf: Option<f64>,
    pub dividend_yield: Option<f64>,
}

/// Full analysis result for a single ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerAnalysis {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub quote: QuoteSummary,
    pub fundamentals: FundamentalsView,
    pub fair_value: f64,
    pub fair_value_components: Vec<FairValueComponent>,
    pub upside_percent: f64,
    pub investment_score: u32,
    pub checklist: Vec<ScoreCheck>,
    #[serde(default)]
    pub sticker: Option<StickerPrice>,
    #[serde(default)]
    pub sticker_verdict: Option<PriceVerdict>,
    pub recommendation: Recommendation,
}

/// Symbol search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    #[serde(rename = "type")]
    pub symbol_type: String,
}

/// One daily closing price
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}
