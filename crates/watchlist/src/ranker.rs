//! Personalized candidate selection and affinity scoring.
//!
//! Candidate *selection* is intentionally randomized (repeated calls explore
//! different slices of the universe); the RNG is caller-supplied so tests
//! seed it. *Scoring* of whatever was drawn is deterministic.

use crate::models::WatchlistProfile;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many candidates to draw from the user's preferred sectors
pub const SECTOR_MATCH_QUOTA: usize = 12;
/// How many to draw from everywhere else
pub const OTHER_QUOTA: usize = 8;
/// Minimum quality score a candidate must reach to be recommendable
pub const QUALITY_FLOOR: u32 = 25;
/// Ceiling on the preference-fit component
pub const MAX_AFFINITY: f64 = 40.0;

/// A (symbol, sector) pair from the discovery universe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub sector: String,
}

fn sectors_match(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Partition the universe into sector matches and others, shuffle each, and
/// take a fixed quota from both. Already-saved symbols are excluded.
pub fn pick_candidates<R: Rng + ?Sized>(
    profile: &WatchlistProfile,
    universe: &[Candidate],
    rng: &mut R,
) -> Vec<Candidate> {
    let mut sector_matches: Vec<Candidate> = Vec::new();
    let mut others: Vec<Candidate> = Vec::new();

    for candidate in universe {
        if profile.saved_symbols.contains(&candidate.symbol.to_uppercase()) {
            continue;
        }
        let matched = profile
            .top_sectors
            .iter()
            .any(|ts| sectors_match(ts, &candidate.sector));
        if matched {
            sector_matches.push(candidate.clone());
        } else {
            others.push(candidate.clone());
        }
    }

    sector_matches.shuffle(rng);
    others.shuffle(rng);

    sector_matches
        .into_iter()
        .take(SECTOR_MATCH_QUOTA)
        .chain(others.into_iter().take(OTHER_QUOTA))
        .collect()
}

/// Preference-fit score in [0, 40]: sector affinity (15), score-range
/// closeness (10), price-tier closeness (10), diversification bonus (5).
pub fn affinity_score(
    profile: &WatchlistProfile,
    sector: &str,
    quality_score: u32,
    price: f64,
) -> f64 {
    let mut affinity = 0.0;

    // Sector affinity, weighted by how often the user saves that sector
    let mut best_weight: f64 = 0.0;
    for (user_sector, weight) in &profile.sector_weights {
        if sectors_match(user_sector, sector) {
            best_weight = best_weight.max(*weight);
        }
    }
    affinity += best_weight * 15.0;

    // Score closeness: is this candidate's quality near what the user saves?
    let score_mid = (profile.min_score + profile.max_score) / 2.0;
    let score_range = (profile.max_score - profile.min_score).max(20.0);
    let score_dist = (quality_score as f64 - score_mid).abs();
    if score_dist <= score_range / 2.0 {
        affinity += 10.0;
    } else if score_dist <= score_range {
        affinity += 5.0;
    }

    // Price tier: does the price fit the user's usual range?
    let price_range = (profile.max_price - profile.min_price).max(50.0);
    let price_dist = (price - profile.avg_price).abs();
    if price_dist <= price_range * 0.5 {
        affinity += 10.0;
    } else if price_dist <= price_range {
        affinity += 5.0;
    } else if price_dist <= price_range * 2.0 {
        affinity += 2.0;
    }

    // Diversification nudge for users concentrated in under three sectors
    if !profile.sectors.contains_key(sector) && profile.sectors.len() < 3 {
        affinity += 5.0;
    }

    affinity.min(MAX_AFFINITY)
}

/// 60/40 blend of quality and preference fit, truncated to an integer
pub fn blended_rank(quality_score: u32, affinity: f64) -> i64 {
    (quality_score as f64 * 0.6 + affinity.min(MAX_AFFINITY) * 0.4) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WatchlistProfile;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn profile() -> WatchlistProfile {
        let mut sectors = HashMap::new();
        sectors.insert("Technology".to_string(), 3);
        sectors.insert("Healthcare".to_string(), 1);
        sectors.insert("Financial Services".to_string(), 1);
        let mut sector_weights = HashMap::new();
        sector_weights.insert("Technology".to_string(), 0.6);
        sector_weights.insert("Healthcare".to_string(), 0.2);
        sector_weights.insert("Financial Services".to_string(), 0.2);
        WatchlistProfile {
            sectors,
            sector_weights,
            top_sectors: vec![
                "Technology".to_string(),
                "Healthcare".to_string(),
                "Financial Services".to_string(),
            ],
            avg_score: 65.0,
            min_score: 55.0,
            max_score: 75.0,
            avg_price: 200.0,
            min_price: 100.0,
            max_price: 300.0,
            count: 5,
            saved_symbols: HashSet::from(["AAPL".to_string()]),
        }
    }

    fn universe() -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for i in 0..20 {
            candidates.push(Candidate {
                symbol: format!("TECH{i}"),
                sector: "Technology".to_string(),
            });
        }
        for i in 0..20 {
            candidates.push(Candidate {
                symbol: format!("ENGY{i}"),
                sector: "Energy".to_string(),
            });
        }
        candidates.push(Candidate {
            symbol: "AAPL".to_string(),
            sector: "Technology".to_string(),
        });
        candidates
    }

    #[test]
    fn quotas_and_exclusion() {
        let mut rng = StdRng::seed_from_u64(7);
        let picks = pick_candidates(&profile(), &universe(), &mut rng);
        assert_eq!(picks.len(), SECTOR_MATCH_QUOTA + OTHER_QUOTA);
        assert!(picks.iter().all(|c| c.symbol != "AAPL"));
        let tech = picks.iter().filter(|c| c.sector == "Technology").count();
        assert_eq!(tech, SECTOR_MATCH_QUOTA);
    }

    #[test]
    fn seeded_selection_is_reproducible() {
        let a = pick_candidates(&profile(), &universe(), &mut StdRng::seed_from_u64(42));
        let b = pick_candidates(&profile(), &universe(), &mut StdRng::seed_from_u64(42));
        let syms_a: Vec<&str> = a.iter().map(|c| c.symbol.as_str()).collect();
        let syms_b: Vec<&str> = b.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(syms_a, syms_b);
    }

    #[test]
    fn sector_affinity_scales_with_save_weight() {
        let p = profile();
        // Technology weight 0.6 -> 9 sector points; score 65 is mid-range
        // (+10), price 200 is the average (+10)
        let a = affinity_score(&p, "Technology", 65, 200.0);
        assert!((a - (0.6 * 15.0 + 10.0 + 10.0)).abs() < 1e-9);

        // Unknown sector with three saved sectors gets no diversification
        // bonus
        let a = affinity_score(&p, "Energy", 65, 200.0);
        assert!((a - 20.0).abs() < 1e-9);
    }

    #[test]
    fn diversification_bonus_for_concentrated_users() {
        let mut p = profile();
        p.sectors.remove("Healthcare");
        let with_bonus = affinity_score(&p, "Energy", 65, 200.0);
        let without = affinity_score(&p, "Technology", 65, 200.0);
        // Energy is new and the user holds < 3 sectors
        assert!((with_bonus - 25.0).abs() < 1e-9);
        assert!(without > with_bonus); // sector weight still dominates
    }

    #[test]
    fn price_distance_bands() {
        let p = profile(); // range 200, avg 200
        assert!((affinity_score(&p, "Energy", 65, 250.0) - 20.0).abs() < 1e-9); // within half range
        assert!((affinity_score(&p, "Energy", 65, 350.0) - 15.0).abs() < 1e-9); // within range
        assert!((affinity_score(&p, "Energy", 65, 550.0) - 12.0).abs() < 1e-9); // within 2x
        assert!((affinity_score(&p, "Energy", 65, 900.0) - 10.0).abs() < 1e-9); // beyond
    }

    #[test]
    fn blend_is_60_40() {
        assert_eq!(blended_rank(100, 40.0), 76);
        assert_eq!(blended_rank(50, 0.0), 30);
        assert_eq!(blended_rank(0, 40.0), 16);
        // Affinity above the cap is clamped before blending
        assert_eq!(blended_rank(0, 400.0), 16);
    }
}
