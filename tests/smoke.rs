//! Smoke tests: the default configuration runs end to end and the
//! optimizer's answer is consistent with the curve it was chosen from.

use emba_tuition::config::{RunSettings, SimulationConfig};
use emba_tuition::optimize::{find_optimal_tuition, sweep_tuition, OptimizerSettings, SearchSpace};
use emba_tuition::report::{render_json, render_text, RunManifest};

fn coarse_settings(workers: usize) -> OptimizerSettings {
    OptimizerSettings {
        search: SearchSpace::new(0.0, 90_000.0, 500.0),
        workers,
        ..OptimizerSettings::default()
    }
}

#[test]
fn s01_default_optimization_runs() {
    let cfg = SimulationConfig::load(None).expect("defaults");
    let opt = find_optimal_tuition(&cfg, 20, &coarse_settings(4)).expect("optimize");
    assert_eq!(opt.results.len(), 20);
    assert_eq!(opt.candidates_evaluated, 181);
    let credits = cfg.education.credits_per_year().expect("credits");
    assert!(opt.best_tuition_per_credit >= 0.0);
    assert!(opt.best_tuition_per_credit <= 90_000.0 / credits + 1e-9);
    assert!(opt.best_score.is_finite());
}

#[test]
fn s02_optimum_dominates_curve() {
    let cfg = SimulationConfig::load(None).expect("defaults");
    let settings = coarse_settings(3);
    let opt = find_optimal_tuition(&cfg, 10, &settings).expect("optimize");
    let curve = sweep_tuition(&cfg, 10, &settings).expect("sweep");
    assert_eq!(curve.len(), opt.candidates_evaluated);
    assert!(curve.iter().all(|p| p.score <= opt.best_score));
    let first_best = curve.iter().position(|p| p.score == opt.best_score).expect("winner on curve");
    assert_eq!(curve[first_best].tuition_per_credit, opt.best_tuition_per_credit);
}

#[test]
fn s03_reports_render() {
    let cfg = SimulationConfig::load(None).expect("defaults");
    let settings = coarse_settings(2);
    let opt = find_optimal_tuition(&cfg, 5, &settings).expect("optimize");

    let text = render_text(&cfg, &settings.search, &opt);
    assert!(text.starts_with("EMBA Tuition Model Simulation"));
    assert!(text.contains("Summary after 5 years:"));

    let manifest = RunManifest::new(&cfg, 5, settings.objective, settings.search);
    let json: serde_json::Value =
        serde_json::from_str(&render_json(&manifest, &opt)).expect("valid json");
    assert_eq!(json["manifest"]["config_hash"], cfg.fingerprint());
}

#[test]
fn s04_run_settings_feed_optimizer() {
    let cfg = SimulationConfig::load(None).expect("defaults");
    let run = RunSettings { workers: 0, ..RunSettings::default() };
    let settings = OptimizerSettings::from_run_settings(&run, &cfg);
    assert_eq!(settings.workers, 1);
    assert_eq!(settings.objective, cfg.policy.objective);
    assert_eq!(settings.search, SearchSpace::default());
}
