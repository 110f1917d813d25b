//! One year of the program: prior year-end state in, next year-end state out.
//!
//! Fixed step order:
//!
//! | Step | What happens |
//! |------|--------------|
//! | 1 | Reputation decays |
//! | 2 | Spring/summer block for last fall's survivors (or skipped in year 1) |
//! | 3 | Alumni boosts and donations |
//! | 4 | Marketing boosts from last fall's reserve plus this spring's reserve |
//! | 5 | Awareness and preference clamped to [0, 1] |
//! | 6 | Enrollment funnel at the full-program price |
//! | 7 | Fall block for the new cohort, reserving next year's marketing |
//! | 8 | Marketing spend from step 4 charged against net revenue |

use crate::config::{EducationConfig, SimulationConfig};
use crate::error::Result;
use crate::phases::{alumni_phase, education_phase, enrollment_phase, marketing_phase};
use crate::state::YearResult;

/// Per-credit price and the full-program price it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    pub tuition_per_credit: f64,
    pub total_program_price: f64,
}

impl Pricing {
    /// Fails with `EmptyProgram` when the program has no billable credits.
    pub fn new(tuition_per_credit: f64, education: &EducationConfig) -> Result<Self> {
        let credits = education.credits_per_year()?;
        Ok(Self {
            tuition_per_credit,
            total_program_price: tuition_per_credit * credits,
        })
    }
}

/// Advance `prior` by one year. `year` is 1-based.
pub fn run_year(
    prior: &YearResult,
    pricing: &Pricing,
    cfg: &SimulationConfig,
    year: usize,
    skip_spring_summer: bool,
) -> YearResult {
    let headcount = cfg.policy.headcount;
    let market_size = cfg.market_size_for_year(year);
    let spend_pct = cfg.marketing.spend_pct;
    let mut net_revenue = 0.0;

    let reputation = prior.reputation.decayed(&cfg.reputation);

    // Skipped block: survivors still graduate but are funded elsewhere.
    let (reputation, spring_summer_reserve) = if skip_spring_summer {
        (reputation.with_graduates(prior.fall_students_remaining), 0.0)
    } else {
        let block = education_phase(
            prior.fall_students_remaining,
            cfg.education.secondary_block(),
            pricing.tuition_per_credit,
            &cfg.education,
        );
        net_revenue += block.net_revenue;
        (
            reputation.with_graduates(headcount.apply(block.students_remaining)),
            (block.net_revenue * spend_pct).max(0.0),
        )
    };

    let alumni = alumni_phase(
        reputation.alumni_count,
        reputation.awareness,
        reputation.preference,
        &cfg.alumni,
        market_size,
    );
    let reputation = reputation.boosted(alumni.awareness_boost, alumni.preference_boost);
    net_revenue += alumni.donations;

    let marketing_spend = prior.fall_marketing_spend + spring_summer_reserve;
    let marketing = marketing_phase(
        marketing_spend,
        reputation.awareness,
        reputation.preference,
        &cfg.marketing,
        market_size,
    );
    let reputation = reputation
        .boosted(marketing.awareness_boost, marketing.preference_boost)
        .clamped();

    let enrollment = enrollment_phase(
        &reputation,
        pricing.total_program_price,
        &cfg.enrollment,
        &cfg.market,
        market_size,
    );
    let students_enrolled = headcount
        .apply(enrollment.students_enrolled)
        .min(headcount.capacity(cfg.enrollment.max_students));

    let fall = education_phase(
        students_enrolled,
        cfg.education.primary_block(),
        pricing.tuition_per_credit,
        &cfg.education,
    );
    net_revenue += fall.net_revenue;
    let fall_marketing_spend = (fall.net_revenue * spend_pct).max(0.0);

    net_revenue -= marketing_spend;

    YearResult {
        fall_marketing_spend,
        fall_students_remaining: headcount.apply(fall.students_remaining),
        students_enrolled,
        net_revenue,
        reputation,
    }
}
