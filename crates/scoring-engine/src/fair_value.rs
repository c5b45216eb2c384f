//! Multi-method fair-value estimation.
//!
//! Up to five independent valuation methods fire depending on which metrics
//! are present; the blended figure is the unweighted mean of whatever fired.
//! Missing data excludes a method instead of erroring, so the estimate is
//! always defined — with nothing to go on it degrades to the current price
//! (zero upside).

use crate::normalize::as_percent;
use valuation_core::{FairValueComponent, FairValueEstimate, StockMetrics};

/// Forward-P/E expansion factor and its cap
const FORWARD_PE_EXPANSION: f64 = 1.2;
const FORWARD_PE_CAP: f64 = 30.0;
/// Growth-derived P/E cap for the PEG model
const GROWTH_PE_CAP: f64 = 40.0;
/// Trailing-P/E cutoff between "mildly cheap" and "mildly rich"
const TRAILING_PE_CUTOFF: f64 = 25.0;

/// Estimate fair value for one ticker. `price` must be the current price
/// (used both by the trailing-P/E heuristic and as the no-data fallback).
pub fn estimate_fair_value(metrics: &StockMetrics, price: f64) -> FairValueEstimate {
    let mut components: Vec<FairValueComponent> = Vec::new();
    let eps = metrics.trailing_eps.unwrap_or(0.0);

    // 1. Analyst consensus target, used as-is
    if let Some(target) = metrics.target_mean_price {
        if target > 0.0 {
            components.push(FairValueComponent {
                method: "analyst_target".to_string(),
                value: target,
            });
        }
    }

    // 2. Forward-P/E model: allow modest multiple expansion, capped
    if let Some(forward_pe) = metrics.forward_pe {
        if forward_pe > 0.0 && eps > 0.0 {
            let pe = (forward_pe * FORWARD_PE_EXPANSION).min(FORWARD_PE_CAP);
            components.push(FairValueComponent {
                method: "forward_pe".to_string(),
                value: eps * pe,
            });
        }
    }

    // 3. PEG model: fair P/E equals growth percentage, capped
    if let Some(growth) = metrics.earnings_growth {
        let growth_pct = as_percent(growth);
        if growth_pct > 0.0 && eps > 0.0 {
            components.push(FairValueComponent {
                method: "peg_growth".to_string(),
                value: eps * growth_pct.min(GROWTH_PE_CAP),
            });
        }
    }

    // 4. Trailing-P/E heuristic: cheap stocks get a mild premium, rich ones
    //    a mild haircut
    if let Some(pe) = metrics.trailing_pe {
        if pe > 0.0 && price > 0.0 {
            let value = if pe < TRAILING_PE_CUTOFF {
                price * 1.1
            } else {
                price * 0.95
            };
            components.push(FairValueComponent {
                method: "trailing_pe".to_string(),
                value,
            });
        }
    }

    // 5. Sector-multiple fallback, only when nothing else fired
    if components.is_empty() && eps > 0.0 {
        let multiple = sector_multiple(metrics.sector.as_deref());
        components.push(FairValueComponent {
            method: "sector_multiple".to_string(),
            value: eps * multiple,
        });
    }

    let value = if components.is_empty() {
        price
    } else {
        components.iter().map(|c| c.value).sum::<f64>() / components.len() as f64
    };

    FairValueEstimate { value, components }
}

fn sector_multiple(sector: Option<&str>) -> f64 {
    match sector {
        Some(s) if s.contains("Technology") => 25.0,
        Some(s) if s.contains("Consumer") => 20.0,
        _ => 18.0,
    }
}
