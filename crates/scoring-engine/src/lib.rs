//! Pure scoring and valuation engine.
//!
//! Everything in this crate is synchronous arithmetic over a single ticker's
//! metrics: no I/O, no shared state, no suspension points. Callers fetch the
//! data, this crate turns it into a score, a fair-value estimate, and a
//! recommendation.

pub mod fair_value;
pub mod fmt;
pub mod normalize;
pub mod recommend;
pub mod scorer;
pub mod sticker;

pub use fair_value::estimate_fair_value;
pub use fmt::format_abbrev;
pub use normalize::{as_percent, normalize_percent, percent_or_zero, MissingPolicy};
pub use recommend::classify;
pub use scorer::{score_metrics, ScorerProfile};
pub use sticker::sticker_price;
