//! The four pure economic phases composed by the year orchestrator.
//!
//! ```text
//! alumni ─┐
//!         ├─► reputation ─► enrollment ─► education (fall) ─► revenue
//! marketing┘
//! ```
//!
//! None of them keep state between calls.

pub mod alumni;
pub mod education;
pub mod enrollment;
pub mod marketing;

pub use alumni::{alumni_phase, AlumniEffect};
pub use education::{education_phase, EducationResult};
pub use enrollment::{enrollment_phase, price_position, EnrollmentResult};
pub use marketing::{marketing_phase, MarketingEffect};

/// Awareness/preference gains from reaching and influencing candidates.
///
/// Only the unaware share of the market can become aware and only the
/// unconvinced share of the aware population can be won over, so both
/// boosts shrink as their fraction approaches 1.
pub(crate) fn reach_boosts(
    people_reached: f64,
    people_influenced: f64,
    awareness: f64,
    preference: f64,
    market_size: f64,
) -> (f64, f64) {
    let awareness_boost = if market_size > 0.0 {
        people_reached * (1.0 - awareness) / market_size
    } else {
        0.0
    };

    let aware_population = market_size * awareness;
    let preference_boost = if aware_population > 0.0 {
        people_influenced * (1.0 - preference) / aware_population
    } else {
        0.0
    };

    (awareness_boost, preference_boost)
}
