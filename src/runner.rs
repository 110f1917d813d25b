//! Drives the year orchestrator across a planning horizon.

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::logging::{self, Domain, Level};
use crate::state::YearResult;
use crate::year::{run_year, Pricing};

/// Simulate `num_years` years at `tuition_per_credit`.
///
/// Index 0 of the result is year 1. Fails before computing any year when the
/// program has no billable credits; zero years is an empty, successful run.
pub fn run_model(
    tuition_per_credit: f64,
    num_years: usize,
    cfg: &SimulationConfig,
) -> Result<Vec<YearResult>> {
    let pricing = Pricing::new(tuition_per_credit, &cfg.education)?;
    Ok(run_priced(&pricing, num_years, cfg))
}

pub(crate) fn run_priced(
    pricing: &Pricing,
    num_years: usize,
    cfg: &SimulationConfig,
) -> Vec<YearResult> {
    let trace = logging::enabled(Level::Trace, Domain::Simulation);
    let mut results = Vec::with_capacity(num_years);
    let mut prior = YearResult::initial(&cfg.initial_state);

    for year in 1..=num_years {
        let skip = year == 1 && cfg.initial_state.skip_first_spring_summer;
        prior = run_year(&prior, pricing, cfg, year, skip);
        if trace {
            logging::log_year(
                year,
                pricing.tuition_per_credit,
                prior.students_enrolled,
                prior.net_revenue,
                prior.reputation.awareness,
                prior.reputation.preference,
                prior.reputation.alumni_count,
            );
        }
        results.push(prior);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{minimal_config, term};
    use crate::config::Semester;
    use crate::error::ModelError;

    #[test]
    fn test_zero_years_is_empty() {
        let cfg = minimal_config();
        assert!(run_model(500.0, 0, &cfg).unwrap().is_empty());
    }

    #[test]
    fn test_empty_program_fails_even_for_zero_years() {
        let mut cfg = minimal_config();
        cfg.education.years = vec![vec![], vec![]];
        assert!(matches!(run_model(500.0, 0, &cfg), Err(ModelError::EmptyProgram)));
        assert!(matches!(run_model(500.0, 5, &cfg), Err(ModelError::EmptyProgram)));
    }

    #[test]
    fn test_steady_state_without_effects() {
        let cfg = minimal_config();
        let results = run_model(500.0, 3, &cfg).unwrap();
        assert_eq!(results.len(), 3);
        for r in &results {
            assert_eq!(r.net_revenue, 500_000.0);
            assert_eq!(r.students_enrolled, 100.0);
        }
    }

    #[test]
    fn test_skip_only_applies_to_year_one() {
        let mut cfg = minimal_config();
        cfg.education.years.push(vec![Semester {
            name: "Spring".into(),
            terms: vec![term(false, false, false)],
        }]);
        cfg.initial_state.skip_first_spring_summer = true;
        cfg.initial_state.prior_fall_students_remaining = 10.0;
        let results = run_model(100.0, 2, &cfg).unwrap();

        // year 1: no spring revenue, fall 100 * 100 * 10
        assert_eq!(results[0].net_revenue, 100_000.0);
        assert_eq!(results[0].reputation.alumni_count, 10.0);
        // year 2: spring for last fall's 100 plus a new fall cohort
        assert_eq!(results[1].net_revenue, 200_000.0);
        assert_eq!(results[1].reputation.alumni_count, 110.0);
    }

    #[test]
    fn test_alumni_never_decrease() {
        let mut cfg = crate::config::SimulationConfig::embedded_default().unwrap();
        cfg.initial_state.alumni_count = 3.0;
        let results = run_model(2_000.0, 15, &cfg).unwrap();
        let mut last = cfg.initial_state.alumni_count;
        for r in &results {
            assert!(r.reputation.alumni_count >= last);
            last = r.reputation.alumni_count;
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let cfg = crate::config::SimulationConfig::embedded_default().unwrap();
        let a = run_model(1_750.0, 10, &cfg).unwrap();
        let b = run_model(1_750.0, 10, &cfg).unwrap();
        assert_eq!(a, b);
    }
}
