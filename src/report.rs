//! Human-readable and JSON rendering of simulation output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::config::{Objective, SimulationConfig};
use crate::logging::ts_now;
use crate::optimize::{CandidateScore, OptimizationResult, SearchSpace};
use crate::state::YearResult;

const RULE_WIDTH: usize = 70;

/// Identifies the inputs behind a report.
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub config_hash: String,
    pub horizon_years: usize,
    pub objective: Objective,
    pub search: SearchSpace,
    pub generated_at: String,
}

impl RunManifest {
    pub fn new(
        cfg: &SimulationConfig,
        horizon_years: usize,
        objective: Objective,
        search: SearchSpace,
    ) -> Self {
        Self {
            config_hash: cfg.fingerprint(),
            horizon_years,
            objective,
            search,
            generated_at: ts_now(),
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    manifest: &'a RunManifest,
    optimization: &'a OptimizationResult,
}

pub fn render_json(manifest: &RunManifest, opt: &OptimizationResult) -> String {
    serde_json::to_string_pretty(&JsonReport { manifest, optimization: opt }).unwrap_or_default()
}

/// `1234567.891` -> `1,234,568` (decimals = 0) or `1,234,567.89` (decimals = 2).
pub fn with_commas(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (formatted.clone(), None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let nonzero = formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if value < 0.0 && nonzero { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

fn dollars(value: f64, decimals: usize) -> String {
    if value < 0.0 {
        format!("-${}", with_commas(-value, decimals))
    } else {
        format!("${}", with_commas(value, decimals))
    }
}

pub fn render_header(cfg: &SimulationConfig) -> String {
    let s = &cfg.initial_state;
    let mut out = String::new();
    let _ = writeln!(out, "EMBA Tuition Model Simulation");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Market size: {}", with_commas(cfg.market.size, 0));
    let _ = writeln!(
        out,
        "Initial state: awareness={:.2}%, preference={:.2}%, skip_first_spring_summer={}",
        s.awareness * 100.0,
        s.preference * 100.0,
        s.skip_first_spring_summer
    );
    out
}

pub fn render_year_table(results: &[YearResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:>4} | {:>9} | {:>10} | {:>6} | {:>8} | {:>12}",
        "Year", "Awareness", "Preference", "Alumni", "Students", "Net Revenue"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for (i, r) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>4} | {:>8.2}% | {:>9.2}% | {:>6.0} | {:>8.1} | {:>12}",
            i + 1,
            r.reputation.awareness * 100.0,
            r.reputation.preference * 100.0,
            r.reputation.alumni_count,
            r.students_enrolled,
            dollars(r.net_revenue, 0)
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    out
}

pub fn render_summary(results: &[YearResult]) -> String {
    let mut out = String::new();
    let total: f64 = results.iter().map(|r| r.net_revenue).sum();
    let _ = writeln!(out, "Summary after {} years:", results.len());
    let _ = writeln!(out, "  Total net revenue: {}", dollars(total, 0));
    if let Some(last) = results.last() {
        let _ = writeln!(out, "  Final awareness: {:.2}%", last.reputation.awareness * 100.0);
        let _ = writeln!(out, "  Final preference: {:.2}%", last.reputation.preference * 100.0);
        let _ = writeln!(out, "  Total alumni: {:.0}", last.reputation.alumni_count);
    }
    out
}

/// Full console report for an optimization run.
pub fn render_text(
    cfg: &SimulationConfig,
    search: &SearchSpace,
    opt: &OptimizationResult,
) -> String {
    let mut out = render_header(cfg);
    let _ = writeln!(
        out,
        "\nFinding optimal tuition (annual range: {} - {})...",
        dollars(search.min_annual_tuition, 0),
        dollars(search.max_annual_tuition, 0)
    );
    let _ = writeln!(out, "Candidates evaluated: {}", opt.candidates_evaluated);
    let _ = writeln!(
        out,
        "Optimal tuition: ${:.0}/credit ({} per program)",
        opt.best_tuition_per_credit,
        dollars(opt.best_annual_tuition, 0)
    );
    let label = match opt.objective {
        Objective::TotalNetRevenue => "Maximum total net revenue",
        Objective::FinalYearNetRevenue => "Maximum final-year net revenue",
    };
    let _ = writeln!(out, "{}: {}", label, dollars(opt.best_score, 2));
    let _ = writeln!(out, "\nYear-by-year results at ${:.0}/credit:", opt.best_tuition_per_credit);
    out.push_str(&render_year_table(&opt.results));
    out.push('\n');
    out.push_str(&render_summary(&opt.results));
    out
}

/// Objective curve as CSV, one candidate per line.
pub fn render_curve_csv(curve: &[CandidateScore]) -> String {
    let mut out = String::from("tuition_per_credit,annual_tuition,score\n");
    for point in curve {
        let _ = writeln!(
            out,
            "{:.4},{:.2},{:.2}",
            point.tuition_per_credit, point.annual_tuition, point.score
        );
    }
    out
}
