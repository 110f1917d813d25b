//! Objective curve across the tuition grid, as CSV on stdout.
//!
//! Usage: cargo run --release --bin sweep -- [years] [config.json]
//!
//! Bounds, step, objective and worker count come from the same environment
//! variables as the main binary (MIN_ANNUAL_TUITION, MAX_ANNUAL_TUITION,
//! TUITION_STEP, OBJECTIVE, OPT_WORKERS).

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use emba_tuition::config::{RunSettings, SimulationConfig};
use emba_tuition::optimize::{sweep_tuition, OptimizerSettings};
use emba_tuition::report::render_curve_csv;

fn main() -> Result<()> {
    let mut run = RunSettings::from_env();
    let mut args = std::env::args().skip(1);
    if let Some(years) = args.next() {
        run.horizon_years = years.parse().context("years must be a whole number")?;
    }
    if let Some(path) = args.next() {
        run.config_path = Some(PathBuf::from(path));
    }

    let cfg = SimulationConfig::load(run.config_path.as_deref())?;
    let settings = OptimizerSettings::from_run_settings(&run, &cfg);

    let start = Instant::now();
    let curve = sweep_tuition(&cfg, run.horizon_years, &settings)?;
    print!("{}", render_curve_csv(&curve));

    let mut best = curve.first();
    for point in curve.iter().skip(1) {
        if best.map_or(true, |b| point.score > b.score) {
            best = Some(point);
        }
    }
    if let Some(best) = best {
        eprintln!(
            "candidates={} objective={} best_per_credit={:.2} best_score={:.2} elapsed={:.2?}",
            curve.len(),
            settings.objective.as_str(),
            best.tuition_per_credit,
            best.score,
            start.elapsed()
        );
    }
    Ok(())
}
