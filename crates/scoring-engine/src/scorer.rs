//! Rule-of-thumb investment scorer.
//!
//! Six scoring policies share one entry point. `Standard` is the classic
//! cliff-edge checklist (points awarded only past hard thresholds),
//! `Proportional` interpolates each criterion linearly, and the four style
//! profiles (Value, Growth, Quality, Dividend) re-weight toward a single
//! factor family for discovery ranking. All of them clamp the aggregate to
//! [0, 100] and attach a pass/warn/fail checklist for display.

use crate::fmt::format_abbrev;
use crate::normalize::percent_or_zero;
use valuation_core::{CheckStatus, ScoreCheck, ScoreResult, StockMetrics};

/// Scoring policy, selected by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScorerProfile {
    /// Cliff-edge thresholds (the original checklist)
    Standard,
    /// Linear interpolation per criterion
    #[default]
    Proportional,
    /// Classic value factors: P/E, P/B, yield, leverage, FCF yield
    Value,
    /// Expansion factors: growth rates, ROE, margin, momentum
    Growth,
    /// Durability factors: returns on capital, margins, FCF yield
    Quality,
    /// Income factors: yield, payout discipline, coverage
    Dividend,
}

impl ScorerProfile {
    /// Parse a profile name from a query parameter. Unknown names fall back
    /// to the proportional default.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "standard" => ScorerProfile::Standard,
            "proportional" => ScorerProfile::Proportional,
            "value" => ScorerProfile::Value,
            "growth" => ScorerProfile::Growth,
            "quality" => ScorerProfile::Quality,
            "dividend" => ScorerProfile::Dividend,
            _ => ScorerProfile::Proportional,
        }
    }
}

/// Score one ticker under the chosen profile.
///
/// `fair_value` feeds the valuation-upside criterion; pass the blended
/// estimate (or the price itself, which zeroes the upside).
pub fn score_metrics(
    metrics: &StockMetrics,
    price: f64,
    fair_value: f64,
    profile: ScorerProfile,
) -> ScoreResult {
    let mut checks = match profile {
        ScorerProfile::Standard => standard_checks(metrics, price, fair_value),
        ScorerProfile::Proportional => proportional_checks(metrics, price, fair_value),
        ScorerProfile::Value => value_checks(metrics),
        ScorerProfile::Growth => growth_checks(metrics, price),
        ScorerProfile::Quality => quality_checks(metrics),
        ScorerProfile::Dividend => dividend_checks(metrics),
    };

    for check in checks.iter_mut() {
        check.points = check.points.min(check.max_points);
    }
    let score: u32 = checks.iter().map(|c| c.points).sum::<u32>().min(100);

    ScoreResult { score, checks }
}

fn upside_percent(price: f64, fair_value: f64) -> Option<f64> {
    if price > 0.0 && fair_value > 0.0 {
        Some((fair_value - price) / price * 100.0)
    } else {
        None
    }
}

/// FCF yield in percent, when market cap is known
fn fcf_yield(metrics: &StockMetrics) -> Option<f64> {
    let fcf = metrics.free_cash_flow?;
    let mcap = metrics.market_cap.filter(|m| *m > 0.0)?;
    Some(fcf / mcap * 100.0)
}

// ---------------------------------------------------------------------------
// Standard (cliff-edge) profile
// ---------------------------------------------------------------------------

fn standard_checks(metrics: &StockMetrics, price: f64, fair_value: f64) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let roa = percent_or_zero(metrics.roa);
    let roe = percent_or_zero(metrics.roe);
    let margin = percent_or_zero(metrics.profit_margin);
    let cash = metrics.total_cash.unwrap_or(0.0);
    let debt = metrics.total_debt.unwrap_or(0.0);
    let ps_ratio = metrics.ps_ratio.unwrap_or(0.0);
    let fcf = metrics.free_cash_flow.unwrap_or(0.0);

    // ROA
    if roa > 10.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("ROA ({roa:.1}%) > 10%"),
            15,
            15,
        ));
    } else if roa > 5.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            format!("ROA ({roa:.1}%) moderate"),
            7,
            15,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Fail,
            format!("ROA ({roa:.1}%) < 10%"),
            0,
            15,
        ));
    }

    // ROE
    if roe > 10.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("ROE ({roe:.1}%) > 10%"),
            15,
            15,
        ));
    } else if roe > 5.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            format!("ROE ({roe:.1}%) moderate"),
            7,
            15,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Fail,
            format!("ROE ({roe:.1}%) < 10%"),
            0,
            15,
        ));
    }

    // Cash vs debt
    if cash > 0.0 && cash >= debt {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("Cash (${}) covers debt", format_abbrev(cash)),
            15,
            15,
        ));
    } else if debt > 0.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Fail,
            format!("Debt (${}) exceeds cash", format_abbrev(debt)),
            0,
            15,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            "Cash/debt data unavailable",
            0,
            15,
        ));
    }

    // Valuation upside
    if let Some(upside) = upside_percent(price, fair_value) {
        if upside > 30.0 {
            checks.push(ScoreCheck::new(
                CheckStatus::Pass,
                format!("{upside:.0}% undervalued"),
                20,
                20,
            ));
        } else if upside > 10.0 {
            checks.push(ScoreCheck::new(
                CheckStatus::Warn,
                format!("{upside:.0}% below fair value"),
                10,
                20,
            ));
        } else if upside > 0.0 {
            checks.push(ScoreCheck::new(CheckStatus::Warn, "Near fair value", 5, 20));
        } else {
            checks.push(ScoreCheck::new(
                CheckStatus::Fail,
                format!("Overvalued by {:.0}%", upside.abs()),
                0,
                20,
            ));
        }
    }

    // Profit margin
    if margin > 15.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("Strong margin ({margin:.1}%)"),
            10,
            10,
        ));
    } else if margin > 5.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            format!("Margin ({margin:.1}%)"),
            5,
            10,
        ));
    } else if margin > 0.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            format!("Low margin ({margin:.1}%)"),
            0,
            10,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Fail,
            "Negative/no margin data",
            0,
            10,
        ));
    }

    // Price/sales
    if ps_ratio > 0.0 && ps_ratio < 2.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("P/S ({ps_ratio:.2}x) attractive"),
            10,
            10,
        ));
    } else if ps_ratio > 0.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            format!("P/S ({ps_ratio:.2}x) high"),
            0,
            10,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            "P/S data unavailable",
            0,
            10,
        ));
    }

    // Free cash flow
    if fcf > 0.0 {
        checks.push(ScoreCheck::new(
            CheckStatus::Pass,
            format!("Positive FCF (${})", format_abbrev(fcf)),
            15,
            15,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Fail,
            "Negative/no FCF data",
            0,
            15,
        ));
    }

    checks
}

// ---------------------------------------------------------------------------
// Proportional profile
// ---------------------------------------------------------------------------

fn clamp_points(raw: f64, max: u32) -> u32 {
    if !raw.is_finite() {
        return 0;
    }
    (raw.clamp(0.0, max as f64)).round() as u32
}

fn proportional_checks(metrics: &StockMetrics, price: f64, fair_value: f64) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let roa = percent_or_zero(metrics.roa);
    let roe = percent_or_zero(metrics.roe);
    let margin = percent_or_zero(metrics.profit_margin);
    let cash = metrics.total_cash.unwrap_or(0.0);
    let debt = metrics.total_debt.unwrap_or(0.0);
    let ps_ratio = metrics.ps_ratio.unwrap_or(0.0);
    let fcf = metrics.free_cash_flow.unwrap_or(0.0);

    // ROA: -5% -> 0 pts, 15% -> 15 pts, linear between
    let roa_pts = clamp_points((roa + 5.0) * 15.0 / 20.0, 15);
    checks.push(ScoreCheck::new(
        if roa > 10.0 {
            CheckStatus::Pass
        } else if roa > 5.0 {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        },
        format!("ROA {roa:.1}%"),
        roa_pts,
        15,
    ));

    // ROE: same ramp as ROA
    let roe_pts = clamp_points((roe + 5.0) * 15.0 / 20.0, 15);
    checks.push(ScoreCheck::new(
        if roe > 10.0 {
            CheckStatus::Pass
        } else if roe > 5.0 {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        },
        format!("ROE {roe:.1}%"),
        roe_pts,
        15,
    ));

    // Cash coverage of debt: 2x coverage -> full points
    if debt > 0.0 {
        let coverage = cash / debt;
        let pts = clamp_points(coverage * 7.5, 15);
        checks.push(ScoreCheck::new(
            if coverage >= 1.0 {
                CheckStatus::Pass
            } else if coverage >= 0.5 {
                CheckStatus::Warn
            } else {
                CheckStatus::Fail
            },
            format!("Cash covers {:.0}% of debt", coverage * 100.0),
            pts,
            15,
        ));
    } else if cash > 0.0 {
        checks.push(ScoreCheck::new(CheckStatus::Pass, "Debt-free", 15, 15));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            "Cash/debt data unavailable",
            0,
            15,
        ));
    }

    // Valuation upside: 30% undervalued -> full points
    if let Some(upside) = upside_percent(price, fair_value) {
        let pts = clamp_points(upside * 20.0 / 30.0, 20);
        checks.push(ScoreCheck::new(
            if upside > 30.0 {
                CheckStatus::Pass
            } else if upside > 0.0 {
                CheckStatus::Warn
            } else {
                CheckStatus::Fail
            },
            format!("{upside:.0}% vs fair value"),
            pts,
            20,
        ));
    }

    // Profit margin: 15% -> full points
    let margin_pts = clamp_points(margin * 10.0 / 15.0, 10);
    checks.push(ScoreCheck::new(
        if margin > 15.0 {
            CheckStatus::Pass
        } else if margin > 0.0 {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        },
        format!("Margin {margin:.1}%"),
        margin_pts,
        10,
    ));

    // Price/sales: 5x or worse -> 0, linear up to 10 as it approaches 1x
    if ps_ratio > 0.0 {
        let pts = clamp_points((5.0 - ps_ratio) * 2.5, 10);
        checks.push(ScoreCheck::new(
            if ps_ratio < 2.0 {
                CheckStatus::Pass
            } else {
                CheckStatus::Warn
            },
            format!("P/S {ps_ratio:.2}x"),
            pts,
            10,
        ));
    } else {
        checks.push(ScoreCheck::new(
            CheckStatus::Warn,
            "P/S data unavailable",
            0,
            10,
        ));
    }

    // FCF yield: 10% yield -> full points; flat 10 when market cap unknown
    let fcf_status = if fcf > 0.0 {
        CheckStatus::Pass
    } else {
        CheckStatus::Fail
    };
    match fcf_yield(metrics) {
        Some(yield_pct) => {
            let pts = clamp_points(yield_pct * 1.5, 15);
            checks.push(ScoreCheck::new(
                fcf_status,
                format!("FCF yield {yield_pct:.1}%"),
                pts,
                15,
            ));
        }
        None if fcf > 0.0 => {
            checks.push(ScoreCheck::new(
                CheckStatus::Pass,
                format!("Positive FCF (${})", format_abbrev(fcf)),
                10,
                15,
            ));
        }
        None => {
            checks.push(ScoreCheck::new(
                CheckStatus::Fail,
                "Negative/no FCF data",
                0,
                15,
            ));
        }
    }

    checks
}

// ---------------------------------------------------------------------------
// Style profiles (discovery ranking)
// ---------------------------------------------------------------------------

/// Tier helper: first threshold met (descending) wins its points
fn tier(value: f64, tiers: &[(f64, u32)]) -> u32 {
    for &(threshold, points) in tiers {
        if value >= threshold {
            return points;
        }
    }
    0
}

fn style_check(label: &str, value_text: String, points: u32, max: u32) -> ScoreCheck {
    let status = if points * 2 >= max {
        CheckStatus::Pass
    } else if points > 0 {
        CheckStatus::Warn
    } else {
        CheckStatus::Fail
    };
    ScoreCheck::new(status, format!("{label}: {value_text}"), points, max)
}

fn value_checks(metrics: &StockMetrics) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let pe = metrics.trailing_pe.unwrap_or(0.0);
    let pb = metrics.pb_ratio.unwrap_or(0.0);
    let div_yield = percent_or_zero(metrics.dividend_yield);
    let cash = metrics.total_cash.unwrap_or(0.0);
    let debt = metrics.total_debt.unwrap_or(0.0);

    // P/E (25): cheaper is better
    let pe_pts = if pe > 0.0 {
        tier(-pe, &[(-10.0, 25), (-15.0, 20), (-20.0, 12), (-25.0, 6)])
    } else {
        0
    };
    checks.push(style_check("P/E", format!("{pe:.1}x"), pe_pts, 25));

    // P/B (20)
    let pb_pts = if pb > 0.0 {
        tier(-pb, &[(-1.0, 20), (-2.0, 15), (-3.0, 8)])
    } else {
        0
    };
    checks.push(style_check("P/B", format!("{pb:.2}x"), pb_pts, 20));

    // Dividend yield (15)
    let dy_pts = tier(div_yield, &[(4.0, 15), (2.0, 10), (1.0, 5)]);
    checks.push(style_check(
        "Dividend yield",
        format!("{div_yield:.2}%"),
        dy_pts,
        15,
    ));

    // Leverage (20): cash against debt
    let lev_pts = if debt <= 0.0 && cash > 0.0 {
        20
    } else if debt > 0.0 && cash >= debt {
        20
    } else if debt > 0.0 && cash >= debt * 0.5 {
        12
    } else {
        0
    };
    checks.push(style_check(
        "Balance sheet",
        format!("${} cash vs ${} debt", format_abbrev(cash), format_abbrev(debt)),
        lev_pts,
        20,
    ));

    // FCF yield (20)
    let fy = fcf_yield(metrics).unwrap_or(0.0);
    let fy_pts = tier(fy, &[(8.0, 20), (5.0, 14), (2.0, 7)]);
    checks.push(style_check("FCF yield", format!("{fy:.1}%"), fy_pts, 20));

    checks
}

fn growth_checks(metrics: &StockMetrics, price: f64) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let revenue_growth = percent_or_zero(metrics.revenue_growth);
    let earnings_growth = percent_or_zero(metrics.earnings_growth);
    let roe = percent_or_zero(metrics.roe);
    let margin = percent_or_zero(metrics.profit_margin);

    // Revenue growth (25)
    let rg_pts = tier(revenue_growth, &[(20.0, 25), (10.0, 18), (5.0, 8)]);
    checks.push(style_check(
        "Revenue growth",
        format!("{revenue_growth:.1}%"),
        rg_pts,
        25,
    ));

    // Earnings growth (25)
    let eg_pts = tier(earnings_growth, &[(20.0, 25), (10.0, 18), (5.0, 8)]);
    checks.push(style_check(
        "Earnings growth",
        format!("{earnings_growth:.1}%"),
        eg_pts,
        25,
    ));

    // ROE (20)
    let roe_pts = tier(roe, &[(20.0, 20), (15.0, 14), (10.0, 7)]);
    checks.push(style_check("ROE", format!("{roe:.1}%"), roe_pts, 20));

    // Margin (15)
    let margin_pts = tier(margin, &[(15.0, 15), (8.0, 9), (3.0, 4)]);
    checks.push(style_check("Margin", format!("{margin:.1}%"), margin_pts, 15));

    // Momentum (15): position in the 52-week range
    let momentum_pts = match (metrics.week_52_high, metrics.week_52_low) {
        (Some(high), Some(low)) if high > low && low > 0.0 && price > 0.0 => {
            let position = (price - low) / (high - low);
            tier(position, &[(0.9, 15), (0.5, 9)])
        }
        _ => 0,
    };
    checks.push(style_check(
        "Momentum",
        "52-week range position".to_string(),
        momentum_pts,
        15,
    ));

    checks
}

fn quality_checks(metrics: &StockMetrics) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let roe = percent_or_zero(metrics.roe);
    let roa = percent_or_zero(metrics.roa);
    let gross_margin = percent_or_zero(metrics.gross_margin);
    let margin = percent_or_zero(metrics.profit_margin);

    // ROE as ROIC proxy (25)
    let roe_pts = tier(roe, &[(15.0, 25), (10.0, 17), (5.0, 8)]);
    checks.push(style_check("Return on capital", format!("{roe:.1}%"), roe_pts, 25));

    // ROA (20)
    let roa_pts = tier(roa, &[(10.0, 20), (5.0, 12)]);
    checks.push(style_check("ROA", format!("{roa:.1}%"), roa_pts, 20));

    // Gross margin (20)
    let gm_pts = tier(gross_margin, &[(50.0, 20), (30.0, 12), (15.0, 6)]);
    checks.push(style_check(
        "Gross margin",
        format!("{gross_margin:.1}%"),
        gm_pts,
        20,
    ));

    // Profit margin (20)
    let pm_pts = tier(margin, &[(15.0, 20), (8.0, 12), (3.0, 5)]);
    checks.push(style_check("Profit margin", format!("{margin:.1}%"), pm_pts, 20));

    // FCF yield (15)
    let fy = fcf_yield(metrics).unwrap_or(0.0);
    let fy_pts = if fy >= 8.0 {
        15
    } else if fy >= 4.0 {
        9
    } else if fy > 0.0 {
        4
    } else {
        0
    };
    checks.push(style_check("FCF yield", format!("{fy:.1}%"), fy_pts, 15));

    checks
}

fn dividend_checks(metrics: &StockMetrics) -> Vec<ScoreCheck> {
    let mut checks = Vec::new();

    let div_yield = percent_or_zero(metrics.dividend_yield);
    let payout = percent_or_zero(metrics.payout_ratio);
    let margin = percent_or_zero(metrics.profit_margin);
    let cash = metrics.total_cash.unwrap_or(0.0);
    let debt = metrics.total_debt.unwrap_or(0.0);
    let fcf = metrics.free_cash_flow.unwrap_or(0.0);

    // Yield (30)
    let dy_pts = if div_yield >= 4.0 {
        30
    } else if div_yield >= 2.5 {
        22
    } else if div_yield >= 1.5 {
        12
    } else if div_yield > 0.0 {
        5
    } else {
        0
    };
    checks.push(style_check("Yield", format!("{div_yield:.2}%"), dy_pts, 30));

    // Payout discipline (25): 30-60% is the sweet spot
    let payout_pts = if (30.0..=60.0).contains(&payout) {
        25
    } else if (20.0..=70.0).contains(&payout) {
        15
    } else if payout > 0.0 {
        5
    } else {
        0
    };
    checks.push(style_check("Payout ratio", format!("{payout:.0}%"), payout_pts, 25));

    // FCF coverage of the dividend (20)
    let fy = fcf_yield(metrics).unwrap_or(0.0);
    let coverage_pts = if div_yield > 0.0 && fy >= div_yield * 2.0 {
        20
    } else if div_yield > 0.0 && fy >= div_yield {
        12
    } else if fcf > 0.0 {
        6
    } else {
        0
    };
    checks.push(style_check(
        "FCF coverage",
        format!("{fy:.1}% FCF yield vs {div_yield:.2}% payout"),
        coverage_pts,
        20,
    ));

    // Leverage (15)
    let lev_pts = if cash > 0.0 && cash >= debt {
        15
    } else if debt > 0.0 && cash >= debt * 0.5 {
        8
    } else {
        0
    };
    checks.push(style_check(
        "Leverage",
        format!("${} cash vs ${} debt", format_abbrev(cash), format_abbrev(debt)),
        lev_pts,
        15,
    ));

    // Margin (10)
    let margin_pts = tier(margin, &[(10.0, 10), (5.0, 5)]);
    checks.push(style_check("Margin", format!("{margin:.1}%"), margin_pts, 10));

    checks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_metrics() -> StockMetrics {
        StockMetrics {
            symbol: "STRONG".to_string(),
            roa: Some(0.15),
            roe: Some(0.22),
            total_cash: Some(50e9),
            total_debt: Some(10e9),
            profit_margin: Some(0.25),
            ps_ratio: Some(1.5),
            free_cash_flow: Some(20e9),
            market_cap: Some(200e9),
            ..Default::default()
        }
    }

    #[test]
    fn standard_perfect_score_is_100() {
        // Every criterion passes, including >30% upside
        let result = score_metrics(&strong_metrics(), 100.0, 140.0, ScorerProfile::Standard);
        assert_eq!(result.score, 100);
        let max_total: u32 = result.checks.iter().map(|c| c.max_points).sum();
        assert_eq!(max_total, 100);
    }

    #[test]
    fn standard_awards_nothing_on_empty_metrics() {
        let m = StockMetrics::new("EMPTY");
        let result = score_metrics(&m, 100.0, 100.0, ScorerProfile::Standard);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn standard_partial_credit_tiers() {
        let mut m = StockMetrics::new("MID");
        m.roa = Some(0.07); // 7% -> moderate tier
        m.roe = Some(0.07);
        let result = score_metrics(&m, 100.0, 100.0, ScorerProfile::Standard);
        // 7 + 7, everything else fails or is near fair value
        assert_eq!(result.score, 14);
    }

    #[test]
    fn score_is_clamped_for_pathological_inputs() {
        let mut m = strong_metrics();
        m.roa = Some(f64::INFINITY);
        m.roe = Some(-f64::INFINITY);
        m.total_debt = Some(f64::NEG_INFINITY);
        m.free_cash_flow = Some(f64::MAX);
        for profile in [
            ScorerProfile::Standard,
            ScorerProfile::Proportional,
            ScorerProfile::Value,
            ScorerProfile::Growth,
            ScorerProfile::Quality,
            ScorerProfile::Dividend,
        ] {
            let result = score_metrics(&m, 100.0, 1e308, profile);
            assert!(result.score <= 100, "profile {profile:?} exceeded 100");
            for check in &result.checks {
                assert!(check.points <= check.max_points);
            }
        }
    }

    #[test]
    fn scorer_is_idempotent() {
        let m = strong_metrics();
        let a = score_metrics(&m, 100.0, 120.0, ScorerProfile::Proportional);
        let b = score_metrics(&m, 100.0, 120.0, ScorerProfile::Proportional);
        assert_eq!(a.score, b.score);
        assert_eq!(a.checks.len(), b.checks.len());
        for (x, y) in a.checks.iter().zip(b.checks.iter()) {
            assert_eq!(x.points, y.points);
            assert_eq!(x.text, y.text);
        }
    }

    #[test]
    fn proportional_roa_interpolates() {
        let mut m = StockMetrics::new("ROA");
        // -5% -> 0 pts
        m.roa = Some(-0.05);
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        assert_eq!(r.checks[0].points, 0);
        // 15% -> full 15 pts
        m.roa = Some(0.15);
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        assert_eq!(r.checks[0].points, 15);
        // 5% -> halfway, 7.5 rounds to 8
        m.roa = Some(0.05);
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        assert_eq!(r.checks[0].points, 8);
    }

    #[test]
    fn proportional_debt_free_gets_full_coverage_points() {
        let mut m = StockMetrics::new("NODEBT");
        m.total_cash = Some(1e9);
        m.total_debt = Some(0.0);
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        let coverage = r.checks.iter().find(|c| c.text == "Debt-free").unwrap();
        assert_eq!(coverage.points, 15);
    }

    #[test]
    fn proportional_fcf_flat_award_without_market_cap() {
        let mut m = StockMetrics::new("FCF");
        m.free_cash_flow = Some(5e9);
        m.market_cap = None;
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        let fcf_check = r.checks.iter().find(|c| c.text.contains("FCF")).unwrap();
        assert_eq!(fcf_check.points, 10);
    }

    #[test]
    fn proportional_ps_ramp() {
        let mut m = StockMetrics::new("PS");
        m.ps_ratio = Some(1.0); // (5-1)*2.5 = 10 -> full
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        let ps = r.checks.iter().find(|c| c.text.contains("P/S")).unwrap();
        assert_eq!(ps.points, 10);

        m.ps_ratio = Some(6.0); // negative raw -> clamped to 0
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Proportional);
        let ps = r.checks.iter().find(|c| c.text.contains("P/S")).unwrap();
        assert_eq!(ps.points, 0);
    }

    #[test]
    fn style_profiles_cap_at_100() {
        let m = StockMetrics {
            symbol: "ALL".to_string(),
            trailing_pe: Some(8.0),
            pb_ratio: Some(0.8),
            dividend_yield: Some(0.05),
            payout_ratio: Some(0.45),
            total_cash: Some(10e9),
            total_debt: Some(1e9),
            free_cash_flow: Some(10e9),
            market_cap: Some(100e9),
            revenue_growth: Some(0.25),
            earnings_growth: Some(0.30),
            roe: Some(0.25),
            roa: Some(0.15),
            gross_margin: Some(0.60),
            profit_margin: Some(0.20),
            week_52_high: Some(110.0),
            week_52_low: Some(60.0),
            ..Default::default()
        };
        for profile in [
            ScorerProfile::Value,
            ScorerProfile::Growth,
            ScorerProfile::Quality,
            ScorerProfile::Dividend,
        ] {
            let r = score_metrics(&m, 108.0, 120.0, profile);
            assert_eq!(r.score, 100, "profile {profile:?}");
            let max_total: u32 = r.checks.iter().map(|c| c.max_points).sum();
            assert_eq!(max_total, 100, "profile {profile:?}");
        }
    }

    #[test]
    fn dividend_profile_rewards_sweet_spot_payout() {
        let mut m = StockMetrics::new("DIV");
        m.dividend_yield = Some(0.03);
        m.payout_ratio = Some(0.45);
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Dividend);
        let payout = r
            .checks
            .iter()
            .find(|c| c.text.contains("Payout ratio"))
            .unwrap();
        assert_eq!(payout.points, 25);

        m.payout_ratio = Some(0.90); // outside even the loose band
        let r = score_metrics(&m, 100.0, 100.0, ScorerProfile::Dividend);
        let payout = r
            .checks
            .iter()
            .find(|c| c.text.contains("Payout ratio"))
            .unwrap();
        assert_eq!(payout.points, 5);
    }

    #[test]
    fn parse_profile_names() {
        assert_eq!(ScorerProfile::parse("value"), ScorerProfile::Value);
        assert_eq!(ScorerProfile::parse("GROWTH"), ScorerProfile::Growth);
        assert_eq!(ScorerProfile::parse("standard"), ScorerProfile::Standard);
        // Unknown names fall back to the proportional default
        assert_eq!(ScorerProfile::parse("momentum"), ScorerProfile::Proportional);
    }
}
