//! Canonical percentage representation for ratio-like metrics.
//!
//! Upstream sources disagree on scale: some report 0.15, some report 15 for
//! the same 15% margin. The `abs(value) > 10` cutoff below disambiguates the
//! two. It is lossy at the boundary (a genuine 11x ratio and an
//! already-percent 11.0 are indistinguishable); this is a known accuracy
//! limitation carried over for compatibility, not something to "fix".

/// How a missing metric is treated during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Missing becomes 0 — scoring paths, where absence means no credit
    ZeroFill,
    /// Missing stays `None` — display paths, where absence renders as N/A
    PreserveNull,
}

/// Convert a ratio-like value to a percentage.
///
/// Values with magnitude strictly above 10 are assumed to already be
/// percentages and pass through unchanged; everything else is multiplied by
/// 100 (0.10 → 10.0, 24.4 → 24.4). Non-finite input is treated as absent.
pub fn as_percent(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    if value.abs() > 10.0 {
        value
    } else {
        value * 100.0
    }
}

/// Normalize an optional ratio under the given missing-value policy
pub fn normalize_percent(value: Option<f64>, policy: MissingPolicy) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() => Some(as_percent(v)),
        _ => match policy {
            MissingPolicy::ZeroFill => Some(0.0),
            MissingPolicy::PreserveNull => None,
        },
    }
}

/// Scoring-path shorthand: missing or non-finite → 0
pub fn percent_or_zero(value: Option<f64>) -> f64 {
    normalize_percent(value, MissingPolicy::ZeroFill).unwrap_or(0.0)
}
