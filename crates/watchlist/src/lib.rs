//! Watchlist persistence and the preference profile derived from it.
//!
//! The store is the only durable state in the system. The profile and the
//! affinity ranker are rebuilt from saved entries on every recommendation
//! request; nothing here is cached.

pub mod models;
pub mod profile;
pub mod ranker;
pub mod store;

pub use models::{WatchlistEntry, WatchlistProfile};
pub use profile::build_profile;
pub use ranker::{
    affinity_score, blended_rank, pick_candidates, Candidate, OTHER_QUOTA, QUALITY_FLOOR,
    SECTOR_MATCH_QUOTA,
};
pub use store::WatchlistStore;
