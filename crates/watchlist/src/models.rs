use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One saved watchlist row, keyed by symbol
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub industry: String,
    /// Investment score at save time
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub price_at_save: f64,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// Preference profile aggregated from saved entries.
///
/// Rebuilt per request, never persisted. Range fields carry the defaults
/// from the original heuristics when the watchlist has no usable scores or
/// prices (avg score 50, avg price 200).
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistProfile {
    /// Save count per sector
    pub sectors: HashMap<String, usize>,
    /// Save share per sector, normalized to sum to 1
    pub sector_weights: HashMap<String, f64>,
    /// Up to three most-saved sectors, descending
    pub top_sectors: Vec<String>,
    pub avg_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub count: usize,
    pub saved_symbols: HashSet<String>,
}
