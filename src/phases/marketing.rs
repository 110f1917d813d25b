use serde::Serialize;

use super::reach_boosts;
use crate::config::MarketingConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketingEffect {
    pub awareness_boost: f64,
    pub preference_boost: f64,
}

/// Dollars to candidates reached/influenced to reputation points.
///
/// A non-positive cost per candidate buys nothing.
pub fn marketing_phase(
    spend: f64,
    awareness: f64,
    preference: f64,
    cfg: &MarketingConfig,
    market_size: f64,
) -> MarketingEffect {
    let reached = per_candidate(spend, cfg.cost_to_reach_one_candidate);
    let influenced = per_candidate(spend, cfg.cost_to_influence_one_candidate);
    let (awareness_boost, preference_boost) =
        reach_boosts(reached, influenced, awareness, preference, market_size);
    MarketingEffect { awareness_boost, preference_boost }
}

fn per_candidate(spend: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        spend / cost
    } else {
        0.0
    }
}
