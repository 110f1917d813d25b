//! Configuration record for the tuition model.
//!
//! The record is loaded once (from a JSON file or the embedded defaults),
//! validated, and then treated as immutable input by every phase.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ModelError, Result};

const DEFAULT_CONFIG: &str = include_str!("../data/default_config.json");
const DEFAULT_CONFIG_NAME: &str = "data/default_config.json";

/// Starting conditions before year 1 begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub alumni_count: f64,
    /// Fraction of the market aware of the program (0-1)
    pub awareness: f64,
    /// Fraction of aware candidates who would choose the program (0-1)
    pub preference: f64,
    pub prior_fall_marketing_spend: f64,
    pub prior_fall_students_remaining: f64,
    pub skip_first_spring_summer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// People who would consider enrolling in a program like this one
    pub size: f64,
    pub growth_rate: f64,
    /// Competitive full-program price range
    pub tuition_low: f64,
    pub tuition_high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationConfig {
    /// Fraction lost per year
    pub awareness_decay_rate: f64,
    pub preference_decay_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlumniConfig {
    pub candidates_reached_per_year: f64,
    pub candidates_influenced_per_year: f64,
    pub donation_per_year: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingConfig {
    /// Fraction of block net revenue reserved for marketing
    pub spend_pct: f64,
    pub cost_to_reach_one_candidate: f64,
    pub cost_to_influence_one_candidate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentConfig {
    pub max_students: f64,
    /// Fraction of would-choose candidates that actually apply
    pub application_rate: f64,
    /// Higher means more enrollment lost at high prices
    pub price_sensitivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub has_licensed_content: bool,
    pub has_intensive_lecturer: bool,
    pub has_intensive_experience: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Semester {
    pub name: String,
    pub terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterCosts {
    pub general_per_student: f64,
    pub technology_per_student: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterFees {
    pub general_per_student: f64,
    pub program_per_student: f64,
    pub technology_per_student: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermCosts {
    pub content_per_credit_hour: f64,
    pub instructor_per_student: f64,
    pub intensive_lecturer: f64,
    pub intensive_experience: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationConfig {
    pub credits_per_term: u32,
    pub dropout_rate_per_term: f64,
    pub semester_costs: SemesterCosts,
    pub semester_fees: SemesterFees,
    pub term_costs: TermCosts,
    /// `[0]` = fall (primary block), `[1]` = spring/summer (secondary block)
    pub years: Vec<Vec<Semester>>,
}

impl EducationConfig {
    pub fn primary_block(&self) -> &[Semester] {
        self.years.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn secondary_block(&self) -> &[Semester] {
        self.years.get(1).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Terms across every configured block of the program.
    pub fn total_terms(&self) -> usize {
        self.years
            .iter()
            .flat_map(|block| block.iter())
            .map(|semester| semester.terms.len())
            .sum()
    }

    /// Billable credit-units across the whole program, failing on zero.
    pub fn credits_per_year(&self) -> Result<f64> {
        let credits = self.total_terms() as f64 * self.credits_per_term as f64;
        if credits <= 0.0 {
            return Err(ModelError::EmptyProgram);
        }
        Ok(credits)
    }
}

/// Scalar target maximized by the tuition optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    #[default]
    TotalNetRevenue,
    FinalYearNetRevenue,
}

impl Objective {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "total" | "total_net_revenue" => Some(Objective::TotalNetRevenue),
            "final" | "final_year" | "final_year_net_revenue" => {
                Some(Objective::FinalYearNetRevenue)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::TotalNetRevenue => "total_net_revenue",
            Objective::FinalYearNetRevenue => "final_year_net_revenue",
        }
    }
}

/// Whether headcounts are carried as fractions or whole students between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadcountPolicy {
    #[default]
    Exact,
    Rounded,
}

impl HeadcountPolicy {
    pub fn apply(&self, students: f64) -> f64 {
        match self {
            HeadcountPolicy::Exact => students,
            HeadcountPolicy::Rounded => students.round(),
        }
    }

    /// Largest headcount a cohort may reach; whole seats only when rounded.
    pub fn capacity(&self, max_students: f64) -> f64 {
        match self {
            HeadcountPolicy::Exact => max_students,
            HeadcountPolicy::Rounded => max_students.floor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub objective: Objective,
    #[serde(default)]
    pub headcount: HeadcountPolicy,
    #[serde(default)]
    pub apply_market_growth: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_state: InitialState,
    pub market: MarketConfig,
    pub reputation: ReputationConfig,
    pub alumni: AlumniConfig,
    pub marketing: MarketingConfig,
    pub enrollment: EnrollmentConfig,
    pub education: EducationConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl SimulationConfig {
    /// Defaults compiled into the crate.
    pub fn embedded_default() -> Result<Self> {
        Self::from_json_str(DEFAULT_CONFIG, Path::new(DEFAULT_CONFIG_NAME))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }

    fn from_json_str(raw: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(raw).map_err(|source| ModelError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if given, otherwise the embedded defaults, and validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let cfg = match path {
            Some(p) => Self::from_path(p)?,
            None => Self::embedded_default()?,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Market size in effect for a 1-based simulation year.
    pub fn market_size_for_year(&self, year: usize) -> f64 {
        if !self.policy.apply_market_growth || year <= 1 {
            return self.market.size;
        }
        self.market.size * (1.0 + self.market.growth_rate).powi(year as i32 - 1)
    }

    /// SHA-256 of the canonical JSON form, hex encoded.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }

    /// Reject records the model cannot meaningfully simulate.
    pub fn validate(&self) -> Result<()> {
        self.education.credits_per_year()?;

        let mut problems = Vec::new();
        let s = &self.initial_state;
        check_fraction("initial_state.awareness", s.awareness, &mut problems);
        check_fraction("initial_state.preference", s.preference, &mut problems);
        check_non_negative("initial_state.alumni_count", s.alumni_count, &mut problems);
        check_non_negative(
            "initial_state.prior_fall_marketing_spend",
            s.prior_fall_marketing_spend,
            &mut problems,
        );
        check_non_negative(
            "initial_state.prior_fall_students_remaining",
            s.prior_fall_students_remaining,
            &mut problems,
        );

        let m = &self.market;
        if !(m.size.is_finite() && m.size > 0.0) {
            problems.push(format!("market.size must be positive, got {}", m.size));
        }
        if !m.growth_rate.is_finite() || m.growth_rate <= -1.0 {
            problems.push(format!("market.growth_rate must be > -1, got {}", m.growth_rate));
        }
        check_non_negative("market.tuition_low", m.tuition_low, &mut problems);
        check_non_negative("market.tuition_high", m.tuition_high, &mut problems);
        if m.tuition_high < m.tuition_low {
            problems.push(format!(
                "market.tuition_high ({}) is below market.tuition_low ({})",
                m.tuition_high, m.tuition_low
            ));
        }

        let r = &self.reputation;
        check_fraction("reputation.awareness_decay_rate", r.awareness_decay_rate, &mut problems);
        check_fraction("reputation.preference_decay_rate", r.preference_decay_rate, &mut problems);

        let a = &self.alumni;
        check_non_negative(
            "alumni.candidates_reached_per_year",
            a.candidates_reached_per_year,
            &mut problems,
        );
        check_non_negative(
            "alumni.candidates_influenced_per_year",
            a.candidates_influenced_per_year,
            &mut problems,
        );
        check_non_negative("alumni.donation_per_year", a.donation_per_year, &mut problems);

        let mk = &self.marketing;
        check_fraction("marketing.spend_pct", mk.spend_pct, &mut problems);
        check_positive(
            "marketing.cost_to_reach_one_candidate",
            mk.cost_to_reach_one_candidate,
            &mut problems,
        );
        check_positive(
            "marketing.cost_to_influence_one_candidate",
            mk.cost_to_influence_one_candidate,
            &mut problems,
        );

        let e = &self.enrollment;
        check_non_negative("enrollment.max_students", e.max_students, &mut problems);
        check_fraction("enrollment.application_rate", e.application_rate, &mut problems);
        check_non_negative("enrollment.price_sensitivity", e.price_sensitivity, &mut problems);

        let ed = &self.education;
        check_fraction("education.dropout_rate_per_term", ed.dropout_rate_per_term, &mut problems);
        let (costs, fees, terms) = (&ed.semester_costs, &ed.semester_fees, &ed.term_costs);
        for (name, value) in [
            ("education.semester_costs.general_per_student", costs.general_per_student),
            ("education.semester_costs.technology_per_student", costs.technology_per_student),
            ("education.semester_fees.general_per_student", fees.general_per_student),
            ("education.semester_fees.program_per_student", fees.program_per_student),
            ("education.semester_fees.technology_per_student", fees.technology_per_student),
            ("education.term_costs.content_per_credit_hour", terms.content_per_credit_hour),
            ("education.term_costs.instructor_per_student", terms.instructor_per_student),
            ("education.term_costs.intensive_lecturer", terms.intensive_lecturer),
            ("education.term_costs.intensive_experience", terms.intensive_experience),
        ] {
            check_non_negative(name, value, &mut problems);
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ModelError::InvalidConfig(problems.join("; ")))
        }
    }
}

fn check_fraction(name: &str, value: f64, problems: &mut Vec<String>) {
    if !(0.0..=1.0).contains(&value) {
        problems.push(format!("{} must be within [0, 1], got {}", name, value));
    }
}

fn check_non_negative(name: &str, value: f64, problems: &mut Vec<String>) {
    if !(value.is_finite() && value >= 0.0) {
        problems.push(format!("{} must be finite and >= 0, got {}", name, value));
    }
}

fn check_positive(name: &str, value: f64, problems: &mut Vec<String>) {
    if !(value.is_finite() && value > 0.0) {
        problems.push(format!("{} must be finite and > 0, got {}", name, value));
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Scalar parameters for a run, read from the environment.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub horizon_years: usize,
    pub min_annual_tuition: f64,
    pub max_annual_tuition: f64,
    /// Annual-dollar step between candidates
    pub tuition_step: f64,
    /// Overrides `policy.objective` when set
    pub objective: Option<Objective>,
    pub workers: usize,
    pub config_path: Option<PathBuf>,
    pub json_report: bool,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            horizon_years: 20,
            min_annual_tuition: 0.0,
            max_annual_tuition: 90_000.0,
            tuition_step: 50.0,
            objective: None,
            workers: num_cpus::get().max(1),
            config_path: None,
            json_report: false,
        }
    }
}

impl RunSettings {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            horizon_years: env_or("HORIZON_YEARS", d.horizon_years),
            min_annual_tuition: env_or("MIN_ANNUAL_TUITION", d.min_annual_tuition),
            max_annual_tuition: env_or("MAX_ANNUAL_TUITION", d.max_annual_tuition),
            tuition_step: env_or("TUITION_STEP", d.tuition_step),
            objective: std::env::var("OBJECTIVE").ok().and_then(|v| Objective::parse(&v)),
            workers: env_or("OPT_WORKERS", d.workers).max(1),
            config_path: std::env::var("CONFIG_PATH").ok().map(PathBuf::from),
            json_report: std::env::var("REPORT_FORMAT").as_deref() == Ok("json"),
        }
    }

    /// Objective to optimize, preferring the explicit override.
    pub fn objective_for(&self, cfg: &SimulationConfig) -> Objective {
        self.objective.unwrap_or(cfg.policy.objective)
    }
}
