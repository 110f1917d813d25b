//! Grid search for the tuition that maximizes a revenue objective.
//!
//! Candidates are scored independently, so the grid can be split across
//! threads. Ties always go to the lowest price: each worker scans its chunk
//! in ascending order keeping the first strict maximum, and chunk winners are
//! merged in ascending chunk order with the same rule.

use std::ops::Range;
use std::thread;

use serde::Serialize;

use crate::config::{EducationConfig, Objective, RunSettings, SimulationConfig};
use crate::error::{ModelError, Result};
use crate::logging::{self, v_num, Domain, Level, ProfileScope};
use crate::runner::run_priced;
use crate::state::YearResult;
use crate::year::Pricing;

/// Upper bound on grid size; finer steps are rejected rather than truncated.
pub const MAX_CANDIDATES: usize = 10_000_000;

/// Annual (full-program) tuition bounds and step, in dollars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchSpace {
    pub min_annual_tuition: f64,
    pub max_annual_tuition: f64,
    pub step: f64,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self { min_annual_tuition: 0.0, max_annual_tuition: 90_000.0, step: 50.0 }
    }
}

impl SearchSpace {
    pub fn new(min_annual_tuition: f64, max_annual_tuition: f64, step: f64) -> Self {
        Self { min_annual_tuition, max_annual_tuition, step }
    }

    fn check(&self) -> Result<()> {
        let Self { min_annual_tuition: min, max_annual_tuition: max, step } = *self;
        if !(min.is_finite() && max.is_finite() && step.is_finite()) {
            return Err(ModelError::InvalidSearch(format!(
                "bounds and step must be finite (min={}, max={}, step={})",
                min, max, step
            )));
        }
        if min < 0.0 {
            return Err(ModelError::InvalidSearch(format!("minimum tuition {} is negative", min)));
        }
        if min > max {
            return Err(ModelError::InvalidSearch(format!(
                "minimum {} exceeds maximum {}",
                min, max
            )));
        }
        if min < max && step <= 0.0 {
            return Err(ModelError::InvalidSearch(format!("step must be positive, got {}", step)));
        }
        Ok(())
    }
}

/// Per-credit candidate prices derived from a [`SearchSpace`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuitionGrid {
    pub credits_per_year: f64,
    pub min_per_credit: f64,
    pub step_per_credit: f64,
    pub len: usize,
}

impl TuitionGrid {
    pub fn new(space: &SearchSpace, education: &EducationConfig) -> Result<Self> {
        let credits_per_year = education.credits_per_year()?;
        space.check()?;

        let span = space.max_annual_tuition - space.min_annual_tuition;
        let steps = if span > 0.0 {
            (span / space.step + 1e-9).floor()
        } else {
            0.0
        };
        if !steps.is_finite() || steps >= MAX_CANDIDATES as f64 {
            return Err(ModelError::InvalidSearch(format!(
                "step {} over [{}, {}] exceeds {} candidates",
                space.step, space.min_annual_tuition, space.max_annual_tuition, MAX_CANDIDATES
            )));
        }
        Ok(Self {
            credits_per_year,
            min_per_credit: space.min_annual_tuition / credits_per_year,
            step_per_credit: space.step / credits_per_year,
            len: steps as usize + 1,
        })
    }

    /// Index-based so repeated addition never drifts past the upper bound.
    pub fn price(&self, index: usize) -> f64 {
        self.min_per_credit + index as f64 * self.step_per_credit
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.len).map(move |i| self.price(i))
    }

    fn pricing(&self, index: usize) -> Pricing {
        let tuition_per_credit = self.price(index);
        Pricing {
            tuition_per_credit,
            total_program_price: tuition_per_credit * self.credits_per_year,
        }
    }
}

impl Objective {
    /// Zero-year runs score 0 under either objective.
    pub fn score(&self, results: &[YearResult]) -> f64 {
        match self {
            Objective::TotalNetRevenue => results.iter().map(|r| r.net_revenue).sum(),
            Objective::FinalYearNetRevenue => results.last().map(|r| r.net_revenue).unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    pub search: SearchSpace,
    pub objective: Objective,
    pub workers: usize,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self { search: SearchSpace::default(), objective: Objective::default(), workers: 1 }
    }
}

impl OptimizerSettings {
    pub fn from_run_settings(run: &RunSettings, cfg: &SimulationConfig) -> Self {
        Self {
            search: SearchSpace::new(
                run.min_annual_tuition,
                run.max_annual_tuition,
                run.tuition_step,
            ),
            objective: run.objective_for(cfg),
            workers: run.workers.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub best_tuition_per_credit: f64,
    pub best_annual_tuition: f64,
    pub objective: Objective,
    pub best_score: f64,
    pub candidates_evaluated: usize,
    pub results: Vec<YearResult>,
}

/// One point of the objective curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    pub tuition_per_credit: f64,
    pub annual_tuition: f64,
    pub score: f64,
}

#[derive(Debug)]
struct Best {
    index: usize,
    score: f64,
    results: Vec<YearResult>,
}

/// Strictly better only; a NaN incumbent yields to any real score.
fn improves(score: f64, incumbent: Option<&Best>) -> bool {
    match incumbent {
        None => true,
        Some(best) => score > best.score || (best.score.is_nan() && !score.is_nan()),
    }
}

/// Split `0..len` into at most `workers` contiguous chunks and evaluate each on
/// its own scoped thread. Output is in ascending chunk order.
fn chunked<T, F>(len: usize, workers: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(Range<usize>) -> T + Sync,
{
    let workers = workers.clamp(1, len.max(1));
    if workers == 1 {
        return vec![f(0..len)];
    }
    let chunk = len.div_ceil(workers);
    let f = &f;
    thread::scope(|s| {
        let handles: Vec<_> = (0..len)
            .step_by(chunk)
            .map(|start| s.spawn(move || f(start..(start + chunk).min(len))))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}

fn best_in(
    range: Range<usize>,
    grid: &TuitionGrid,
    num_years: usize,
    cfg: &SimulationConfig,
    objective: Objective,
) -> Option<Best> {
    let debug = logging::enabled(Level::Debug, Domain::Optimizer);
    let mut best: Option<Best> = None;
    for index in range {
        let pricing = grid.pricing(index);
        let results = run_priced(&pricing, num_years, cfg);
        let score = objective.score(&results);
        if debug {
            logging::log_candidate(pricing.tuition_per_credit, objective.as_str(), score);
        }
        if improves(score, best.as_ref()) {
            best = Some(Best { index, score, results });
        }
    }
    best
}

/// Search the tuition grid for the price maximizing `settings.objective`.
///
/// `min == max` evaluates exactly one candidate. Identical inputs give
/// identical results regardless of `settings.workers`.
pub fn find_optimal_tuition(
    cfg: &SimulationConfig,
    num_years: usize,
    settings: &OptimizerSettings,
) -> Result<OptimizationResult> {
    let grid = TuitionGrid::new(&settings.search, &cfg.education)?;
    let objective = settings.objective;
    let _scope = ProfileScope::with_context(
        "find_optimal_tuition",
        &[("candidates", v_num(grid.len as f64)), ("years", v_num(num_years as f64))],
    );

    let mut best: Option<Best> = None;
    let chunk_bests = chunked(grid.len, settings.workers, |range| {
        best_in(range, &grid, num_years, cfg, objective)
    });
    for candidate in chunk_bests.into_iter().flatten() {
        if improves(candidate.score, best.as_ref()) {
            best = Some(candidate);
        }
    }

    // The grid always has at least one candidate.
    let best = best.ok_or_else(|| ModelError::InvalidSearch("empty tuition grid".to_string()))?;
    let tuition = grid.price(best.index);
    logging::log_optimum(tuition, objective.as_str(), best.score, grid.len, settings.workers);

    Ok(OptimizationResult {
        best_tuition_per_credit: tuition,
        best_annual_tuition: tuition * grid.credits_per_year,
        objective,
        best_score: best.score,
        candidates_evaluated: grid.len,
        results: best.results,
    })
}

/// Score every grid candidate in ascending price order without keeping year sequences.
pub fn sweep_tuition(
    cfg: &SimulationConfig,
    num_years: usize,
    settings: &OptimizerSettings,
) -> Result<Vec<CandidateScore>> {
    let grid = TuitionGrid::new(&settings.search, &cfg.education)?;
    let objective = settings.objective;
    let _scope = ProfileScope::new("sweep_tuition");

    let chunks = chunked(grid.len, settings.workers, |range| {
        range
            .map(|index| {
                let pricing = grid.pricing(index);
                let results = run_priced(&pricing, num_years, cfg);
                CandidateScore {
                    tuition_per_credit: pricing.tuition_per_credit,
                    annual_tuition: pricing.total_program_price,
                    score: objective.score(&results),
                }
            })
            .collect::<Vec<_>>()
    });
    Ok(chunks.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::minimal_config;
    use crate::runner::run_model;

    fn settings(min: f64, max: f64, step: f64) -> OptimizerSettings {
        OptimizerSettings {
            search: SearchSpace::new(min, max, step),
            ..OptimizerSettings::default()
        }
    }

    #[test]
    fn test_grid_is_inclusive_and_per_credit() {
        let cfg = minimal_config();
        let space = SearchSpace::new(0.0, 1_000.0, 100.0);
        let grid = TuitionGrid::new(&space, &cfg.education).unwrap();
        assert_eq!(grid.credits_per_year, 10.0);
        assert_eq!(grid.len, 11);
        assert_eq!(grid.price(0), 0.0);
        assert_eq!(grid.step_per_credit, 10.0);
        assert!((grid.price(10) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_does_not_overshoot() {
        let cfg = minimal_config();
        let space = SearchSpace::new(0.0, 1_050.0, 100.0);
        let grid = TuitionGrid::new(&space, &cfg.education).unwrap();
        assert_eq!(grid.len, 11);
        assert!(grid.prices().all(|p| p * 10.0 <= 1_050.0));
    }

    #[test]
    fn test_single_point_grid() {
        let cfg = minimal_config();
        let space = SearchSpace::new(5_000.0, 5_000.0, 0.0);
        let grid = TuitionGrid::new(&space, &cfg.education).unwrap();
        assert_eq!(grid.len, 1);
        assert_eq!(grid.price(0), 500.0);
    }

    #[test]
    fn test_invalid_searches() {
        let cfg = minimal_config();
        for space in [
            SearchSpace::new(10.0, 5.0, 1.0),
            SearchSpace::new(0.0, 5.0, 0.0),
            SearchSpace::new(0.0, 5.0, -1.0),
            SearchSpace::new(0.0, f64::INFINITY, 1.0),
            SearchSpace::new(-1.0, 5.0, 1.0),
        ] {
            assert!(matches!(
                TuitionGrid::new(&space, &cfg.education),
                Err(ModelError::InvalidSearch(_))
            ));
        }
    }

    #[test]
    fn test_oversized_grid_is_rejected() {
        let cfg = minimal_config();
        for step in [1e-300, f64::MIN_POSITIVE, 1e-6] {
            let space = SearchSpace::new(0.0, 90_000.0, step);
            assert!(matches!(
                TuitionGrid::new(&space, &cfg.education),
                Err(ModelError::InvalidSearch(_))
            ));
            let err = find_optimal_tuition(&cfg, 1, &settings(0.0, 90_000.0, step)).unwrap_err();
            assert!(matches!(err, ModelError::InvalidSearch(_)));
        }
        // the largest grid allowed is still accepted
        let max = (MAX_CANDIDATES - 1) as f64;
        let grid = TuitionGrid::new(&SearchSpace::new(0.0, max, 1.0), &cfg.education).unwrap();
        assert_eq!(grid.len, MAX_CANDIDATES);
    }

    #[test]
    fn test_empty_program_checked_first() {
        let mut cfg = minimal_config();
        cfg.education.years.clear();
        let err = find_optimal_tuition(&cfg, 5, &settings(10.0, 5.0, 1.0)).unwrap_err();
        assert!(matches!(err, ModelError::EmptyProgram));
    }

    #[test]
    fn test_objectives() {
        let cfg = minimal_config();
        let results = run_model(10.0, 3, &cfg).unwrap();
        assert_eq!(Objective::TotalNetRevenue.score(&results), 3.0 * 10_000.0);
        assert_eq!(Objective::FinalYearNetRevenue.score(&results), 10_000.0);
        assert_eq!(Objective::TotalNetRevenue.score(&[]), 0.0);
        assert_eq!(Objective::FinalYearNetRevenue.score(&[]), 0.0);
    }

    #[test]
    fn test_ties_keep_lowest_price() {
        // Flat objective: every candidate scores zero.
        let mut cfg = minimal_config();
        cfg.enrollment.max_students = 0.0;
        for workers in [1, 3, 8] {
            let s = OptimizerSettings { workers, ..settings(0.0, 1_000.0, 100.0) };
            let opt = find_optimal_tuition(&cfg, 4, &s).unwrap();
            assert_eq!(opt.best_tuition_per_credit, 0.0);
            assert_eq!(opt.best_score, 0.0);
            assert_eq!(opt.candidates_evaluated, 11);
        }
    }

    #[test]
    fn test_highest_price_wins_without_price_penalty() {
        let cfg = minimal_config();
        let opt = find_optimal_tuition(&cfg, 2, &settings(0.0, 1_000.0, 100.0)).unwrap();
        assert!((opt.best_tuition_per_credit - 100.0).abs() < 1e-9);
        assert!((opt.best_annual_tuition - 1_000.0).abs() < 1e-6);
        assert_eq!(opt.results.len(), 2);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cfg = SimulationConfig::embedded_default().unwrap();
        let seq = find_optimal_tuition(&cfg, 10, &settings(0.0, 60_000.0, 500.0)).unwrap();
        for workers in [2, 4, 7] {
            let s = OptimizerSettings { workers, ..settings(0.0, 60_000.0, 500.0) };
            let par = find_optimal_tuition(&cfg, 10, &s).unwrap();
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_sweep_argmax_matches_optimizer() {
        let cfg = SimulationConfig::embedded_default().unwrap();
        let s = OptimizerSettings { workers: 3, ..settings(0.0, 60_000.0, 1_000.0) };
        let curve = sweep_tuition(&cfg, 8, &s).unwrap();
        assert_eq!(curve.len(), 61);
        assert!(curve.windows(2).all(|w| w[0].tuition_per_credit < w[1].tuition_per_credit));

        let mut best = &curve[0];
        for point in &curve[1..] {
            if point.score > best.score {
                best = point;
            }
        }
        let opt = find_optimal_tuition(&cfg, 8, &s).unwrap();
        assert_eq!(opt.best_tuition_per_credit, best.tuition_per_credit);
        assert_eq!(opt.best_score, best.score);
    }

    #[test]
    fn test_chunked_preserves_order() {
        let out = chunked(10, 4, |r| r.collect::<Vec<_>>());
        let flat: Vec<usize> = out.into_iter().flatten().collect();
        assert_eq!(flat, (0..10).collect::<Vec<_>>());
        assert_eq!(chunked(0, 4, |r| r.len()), vec![0]);
    }

    #[test]
    fn test_improves_is_strict() {
        let incumbent = Best { index: 0, score: 5.0, results: vec![] };
        assert!(!improves(5.0, Some(&incumbent)));
        assert!(improves(5.5, Some(&incumbent)));
        assert!(improves(f64::NEG_INFINITY, None));
        let nan = Best { index: 0, score: f64::NAN, results: vec![] };
        assert!(improves(-1.0, Some(&nan)));
    }
}
