//! Recommendation decision table.

use valuation_core::{Recommendation, Signal};

/// Map (score, upside%) to a discrete signal. Evaluated top-down, first
/// match wins; every input pair yields exactly one signal.
pub fn classify(score: u32, upside: f64) -> Recommendation {
    let (signal, reason) = if score >= 70 && upside > 30.0 {
        (Signal::StrongBuy, "High score with significant undervaluation")
    } else if score >= 60 && upside > 15.0 {
        (Signal::Buy, "Good fundamentals and undervalued")
    } else if score >= 50 && upside > 0.0 {
        (Signal::Hold, "Decent fundamentals, fair price")
    } else if score >= 40 {
        (Signal::Watch, "Some concerns, monitor closely")
    } else {
        (Signal::Avoid, "Does not meet investment criteria")
    };

    Recommendation {
        signal,
        color: signal.color().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows() {
        assert_eq!(classify(75, 35.0).signal, Signal::StrongBuy);
        assert_eq!(classify(65, 20.0).signal, Signal::Buy);
        assert_eq!(classify(55, 5.0).signal, Signal::Hold);
        assert_eq!(classify(45, -5.0).signal, Signal::Watch);
        assert_eq!(classify(20, -10.0).signal, Signal::Avoid);
    }

    #[test]
    fn first_match_wins() {
        // High score but no upside skips the buy rows entirely
        assert_eq!(classify(90, 0.0).signal, Signal::Watch);
        // Score 70 with 20% upside misses STRONG BUY, takes BUY
        assert_eq!(classify(70, 20.0).signal, Signal::Buy);
    }

    #[test]
    fn total_over_extremes() {
        // Every pair yields exactly one signal, even absurd inputs
        let r = classify(0, f64::MIN);
        assert_eq!(r.signal, Signal::Avoid);
        let r = classify(100, f64::MAX);
        assert_eq!(r.signal, Signal::StrongBuy);
    }

    #[test]
    fn colors_match_signals() {
        assert_eq!(classify(75, 35.0).color, "#00d374");
        assert_eq!(classify(55, 5.0).color, "#ffb800");
        assert_eq!(classify(10, 0.0).color, "#ff5252");
    }
}
