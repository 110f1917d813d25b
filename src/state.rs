//! Value types carried from one simulated year to the next.
//!
//! Every update returns a new value; nothing here is mutated in place once
//! it has been handed to the next year.

use serde::{Deserialize, Serialize};

use crate::config::{InitialState, ReputationConfig};

/// Cumulative reputation of the program.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reputation {
    pub alumni_count: f64,
    /// Fraction of the market aware of the program
    pub awareness: f64,
    /// Fraction of aware candidates who would choose the program
    pub preference: f64,
}

impl Reputation {
    pub fn new(alumni_count: f64, awareness: f64, preference: f64) -> Self {
        Self { alumni_count, awareness, preference }
    }

    /// Start-of-year fade without maintenance.
    pub fn decayed(self, cfg: &ReputationConfig) -> Self {
        Self {
            awareness: self.awareness * (1.0 - cfg.awareness_decay_rate),
            preference: self.preference * (1.0 - cfg.preference_decay_rate),
            ..self
        }
    }

    pub fn with_graduates(self, graduates: f64) -> Self {
        Self { alumni_count: self.alumni_count + graduates, ..self }
    }

    /// Add awareness/preference boosts. May leave [0, 1] until clamped.
    pub fn boosted(self, awareness_boost: f64, preference_boost: f64) -> Self {
        Self {
            awareness: self.awareness + awareness_boost,
            preference: self.preference + preference_boost,
            ..self
        }
    }

    pub fn clamped(self) -> Self {
        Self {
            awareness: self.awareness.clamp(0.0, 1.0),
            preference: self.preference.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Outcome of one simulated year; the only state carried into the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearResult {
    /// Reserved from this year's fall block for next year's marketing
    pub fall_marketing_spend: f64,
    /// Fall survivors who continue into next year's spring/summer block
    pub fall_students_remaining: f64,
    pub students_enrolled: f64,
    pub net_revenue: f64,
    pub reputation: Reputation,
}

impl YearResult {
    /// Synthetic "year 0" built from the configured starting conditions.
    pub fn initial(state: &InitialState) -> Self {
        Self {
            fall_marketing_spend: state.prior_fall_marketing_spend,
            fall_students_remaining: state.prior_fall_students_remaining,
            students_enrolled: 0.0,
            net_revenue: 0.0,
            reputation: Reputation::new(state.alumni_count, state.awareness, state.preference),
        }
    }
}
