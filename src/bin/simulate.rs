//! Simulate a single tuition price.
//!
//! Usage: cargo run --release --bin simulate -- <tuition_per_credit> [years] [config.json]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use emba_tuition::config::{RunSettings, SimulationConfig};
use emba_tuition::report::{render_header, render_summary, render_year_table};
use emba_tuition::run_model;

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(price) = args.next() else {
        bail!("usage: simulate <tuition_per_credit> [years] [config.json]");
    };
    let tuition_per_credit: f64 = price
        .parse()
        .with_context(|| format!("tuition must be a number, got {:?}", price))?;

    let mut run = RunSettings::from_env();
    if let Some(years) = args.next() {
        run.horizon_years = years.parse().context("years must be a whole number")?;
    }
    if let Some(path) = args.next() {
        run.config_path = Some(PathBuf::from(path));
    }

    let cfg = SimulationConfig::load(run.config_path.as_deref())?;
    let results = run_model(tuition_per_credit, run.horizon_years, &cfg)?;

    print!("{}", render_header(&cfg));
    println!("\nYear-by-year results at ${:.0}/credit:", tuition_per_credit);
    print!("{}", render_year_table(&results));
    println!();
    print!("{}", render_summary(&results));
    Ok(())
}
