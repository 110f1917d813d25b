use serde::Serialize;

use crate::config::{EnrollmentConfig, MarketConfig};
use crate::state::Reputation;

/// Each stage of the enrollment funnel, narrowest last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrollmentResult {
    pub aware_population: f64,
    pub price_position: f64,
    pub price_factor: f64,
    pub effective_choice_rate: f64,
    pub applicants: f64,
    pub students_enrolled: f64,
}

/// Where `price` sits in `[low, high]`, clamped to [0, 1]. Zero-width range means no penalty.
pub fn price_position(price: f64, low: f64, high: f64) -> f64 {
    let range = high - low;
    if range > 0.0 {
        ((price - low) / range).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Funnel from reputation and full-program price to new students.
///
/// High preference dampens price sensitivity, and capacity is a hard ceiling.
pub fn enrollment_phase(
    reputation: &Reputation,
    total_program_price: f64,
    cfg: &EnrollmentConfig,
    market: &MarketConfig,
    market_size: f64,
) -> EnrollmentResult {
    let aware_population = market_size * reputation.awareness;
    let base_choice_rate = reputation.preference;

    let position = price_position(total_program_price, market.tuition_low, market.tuition_high);
    let effective_sensitivity = cfg.price_sensitivity * (1.0 - base_choice_rate);
    let price_factor = (1.0 - effective_sensitivity * position).max(0.0);
    let effective_choice_rate = base_choice_rate * price_factor;

    let would_choose = aware_population * effective_choice_rate;
    let applicants = would_choose * cfg.application_rate;

    EnrollmentResult {
        aware_population,
        price_position: position,
        price_factor,
        effective_choice_rate,
        applicants,
        students_enrolled: applicants.min(cfg.max_students),
    }
}
