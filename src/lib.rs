//! Year-by-year model of an executive-education program's finances and
//! reputation under a chosen tuition, plus a grid search for the tuition
//! that maximizes net revenue over a planning horizon.
//!
//! ```text
//! optimize ─► runner ─► year ─► phases::{education, alumni, marketing, enrollment}
//! ```
//!
//! The engine is deterministic and does no I/O beyond optional logging;
//! loading configuration and rendering reports live in [`config`] and
//! [`report`].

pub mod config;
pub mod error;
pub mod logging;
pub mod optimize;
pub mod phases;
pub mod report;
pub mod runner;
pub mod state;
pub mod year;

pub use config::{HeadcountPolicy, Objective, RunSettings, SimulationConfig};
pub use error::{ModelError, Result};
pub use optimize::{
    find_optimal_tuition, sweep_tuition, OptimizationResult, OptimizerSettings, SearchSpace,
};
pub use runner::run_model;
pub use state::{Reputation, YearResult};
