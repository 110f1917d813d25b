//! Find the revenue-maximizing tuition and print the year-by-year outcome.
//!
//! Usage: emba-tuition [years] [config.json]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use emba_tuition::config::{RunSettings, SimulationConfig};
use emba_tuition::logging::{self, Domain, ProfileScope};
use emba_tuition::optimize::{find_optimal_tuition, OptimizerSettings};
use emba_tuition::report::{render_json, render_text, RunManifest};

fn settings_from_args() -> Result<RunSettings> {
    let mut run = RunSettings::from_env();
    let mut args = std::env::args().skip(1);
    if let Some(years) = args.next() {
        run.horizon_years = years
            .parse()
            .with_context(|| format!("years must be a whole number, got {:?}", years))?;
    }
    if let Some(path) = args.next() {
        run.config_path = Some(PathBuf::from(path));
    }
    Ok(run)
}

fn main() -> ExitCode {
    let run = match settings_from_args() {
        Ok(run) => run,
        Err(err) => {
            eprintln!("{:#}", err);
            eprintln!("usage: emba-tuition [years] [config.json]");
            return ExitCode::from(2);
        }
    };

    let cfg = match SimulationConfig::load(run.config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            logging::log_error(Domain::Config, "config_error", &err);
            println!("Configuration Error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match run_optimization(&cfg, &run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::log_error(Domain::System, "run_failed", &err);
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_optimization(cfg: &SimulationConfig, run: &RunSettings) -> Result<()> {
    let source = run
        .config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "embedded".to_string());
    let config_hash = cfg.fingerprint();
    logging::log_config_loaded(
        &source,
        &config_hash,
        cfg.education.total_terms(),
        cfg.education.credits_per_year()?,
    );

    let settings = OptimizerSettings::from_run_settings(run, cfg);
    let scope = ProfileScope::new("main");
    let opt = find_optimal_tuition(cfg, run.horizon_years, &settings)
        .context("tuition optimization failed")?;
    logging::log_run_summary(
        &config_hash,
        run.horizon_years,
        opt.best_tuition_per_credit,
        opt.best_score,
        scope.elapsed_ms(),
    );

    if run.json_report {
        let manifest =
            RunManifest::new(cfg, run.horizon_years, settings.objective, settings.search);
        println!("{}", render_json(&manifest, &opt));
    } else {
        print!("{}", render_text(cfg, &settings.search, &opt));
    }
    Ok(())
}
