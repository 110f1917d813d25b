use serde::Serialize;

use super::reach_boosts;
use crate::config::AlumniConfig;

/// Yearly contribution of every alumnus to date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlumniEffect {
    pub awareness_boost: f64,
    pub preference_boost: f64,
    pub donations: f64,
}

/// Word of mouth (awareness), career success (preference), and donations.
pub fn alumni_phase(
    alumni_count: f64,
    awareness: f64,
    preference: f64,
    cfg: &AlumniConfig,
    market_size: f64,
) -> AlumniEffect {
    let reached = alumni_count * cfg.candidates_reached_per_year;
    let influenced = alumni_count * cfg.candidates_influenced_per_year;
    let (awareness_boost, preference_boost) =
        reach_boosts(reached, influenced, awareness, preference, market_size);

    AlumniEffect {
        awareness_boost,
        preference_boost,
        donations: alumni_count * cfg.donation_per_year,
    }
}
