//! Conservative buy-price model: project EPS ten years out, price it at a
//! growth-derived multiple, discount back at 15% a year, then demand half of
//! that as the buy threshold.

use crate::normalize::as_percent;
use valuation_core::{StickerPrice, StockMetrics};

/// Annual growth cap applied before projection
const GROWTH_CAP: f64 = 0.30;
/// Projection horizon in years
const YEARS: i32 = 10;
/// Annual discount rate
const DISCOUNT_RATE: f64 = 1.15;
/// Ceiling on the projected future P/E
const FUTURE_PE_CAP: f64 = 50.0;

/// Compute the sticker price for one ticker.
///
/// Requires positive trailing EPS and a positive growth signal from one of
/// three sources, tried in order: analyst earnings-growth estimate, the
/// forward-vs-trailing EPS delta, revenue growth. Returns `None` when
/// neither holds — callers treat that as "margin of safety unavailable",
/// never as an error.
pub fn sticker_price(metrics: &StockMetrics) -> Option<StickerPrice> {
    let eps = metrics.trailing_eps.filter(|e| *e > 0.0)?;

    let growth = resolve_growth_rate(metrics, eps)?;
    let growth = growth.min(GROWTH_CAP);

    let future_eps = eps * (1.0 + growth).powi(YEARS);
    let future_pe = (2.0 * growth * 100.0).min(FUTURE_PE_CAP);
    let future_price = future_eps * future_pe;
    let sticker = future_price / DISCOUNT_RATE.powi(YEARS);

    Some(StickerPrice {
        eps,
        growth_rate: growth * 100.0,
        future_eps,
        future_pe,
        future_price,
        sticker_price: sticker,
        mos_price: sticker / 2.0,
    })
}

/// First positive growth signal wins, as an annual fraction
fn resolve_growth_rate(metrics: &StockMetrics, eps: f64) -> Option<f64> {
    if let Some(eg) = metrics.earnings_growth {
        let pct = as_percent(eg);
        if pct > 0.0 {
            return Some(pct / 100.0);
        }
    }

    if let Some(forward) = metrics.forward_eps {
        if forward > eps {
            return Some((forward - eps) / eps);
        }
    }

    if let Some(rg) = metrics.revenue_growth {
        let pct = as_percent(rg);
        if pct > 0.0 {
            return Some(pct / 100.0);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuation_core::PriceVerdict;

    #[test]
    fn reference_projection() {
        let mut m = StockMetrics::new("REF");
        m.trailing_eps = Some(5.0);
        m.earnings_growth = Some(0.20);

        let sticker = sticker_price(&m).expect("sticker available");
        assert!((sticker.growth_rate - 20.0).abs() < 1e-9);
        assert!((sticker.future_eps - 5.0 * 1.2f64.powi(10)).abs() < 1e-6);
        assert_eq!(sticker.future_pe, 40.0);
        let expected_future = 5.0 * 1.2f64.powi(10) * 40.0;
        assert!((sticker.future_price - expected_future).abs() < 1e-6);
        assert!((sticker.sticker_price - 306.1).abs() < 0.1);
        assert!((sticker.mos_price - 153.05).abs() < 0.1);
        assert_eq!(sticker.verdict(50.0), PriceVerdict::OnSale);
        assert_eq!(sticker.verdict(200.0), PriceVerdict::FairValue);
        assert_eq!(sticker.verdict(400.0), PriceVerdict::Overpriced);
    }

    #[test]
    fn negative_eps_is_unavailable() {
        let mut m = StockMetrics::new("LOSS");
        m.trailing_eps = Some(-1.5);
        m.earnings_growth = Some(0.25);
        assert!(sticker_price(&m).is_none());
    }

    #[test]
    fn growth_fallback_chain() {
        // Analyst estimate missing, forward EPS above trailing -> delta used
        let mut m = StockMetrics::new("FWD");
        m.trailing_eps = Some(4.0);
        m.forward_eps = Some(5.0);
        let sticker = sticker_price(&m).unwrap();
        assert!((sticker.growth_rate - 25.0).abs() < 1e-9);

        // Forward below trailing -> revenue growth is the last resort
        let mut m = StockMetrics::new("REV");
        m.trailing_eps = Some(4.0);
        m.forward_eps = Some(3.0);
        m.revenue_growth = Some(0.12);
        let sticker = sticker_price(&m).unwrap();
        assert!((sticker.growth_rate - 12.0).abs() < 1e-9);
    }

    #[test]
    fn no_positive_growth_signal_is_unavailable() {
        let mut m = StockMetrics::new("FLAT");
        m.trailing_eps = Some(4.0);
        m.earnings_growth = Some(-0.10);
        m.forward_eps = Some(3.5);
        m.revenue_growth = Some(-0.02);
        assert!(sticker_price(&m).is_none());
    }

    #[test]
    fn growth_is_capped_at_30_percent() {
        let mut m = StockMetrics::new("HYPER");
        m.trailing_eps = Some(2.0);
        m.earnings_growth = Some(0.80); // 80% capped to 30%
        let sticker = sticker_price(&m).unwrap();
        assert!((sticker.growth_rate - 30.0).abs() < 1e-9);
        assert_eq!(sticker.future_pe, 50.0); // 2 * 30 = 60 capped at 50
    }

    #[test]
    fn already_percent_growth_passes_heuristic() {
        let mut m = StockMetrics::new("PCT");
        m.trailing_eps = Some(3.0);
        m.earnings_growth = Some(15.0); // magnitude > 10: already a percent
        let sticker = sticker_price(&m).unwrap();
        assert!((sticker.growth_rate - 15.0).abs() < 1e-9);
    }
}
