//! Structured JSON-lines logging for simulation runs.
//!
//! Records go to stderr so stdout stays free for reports. Setting `LOG_DIR`
//! also writes them under `<LOG_DIR>/<run_id>/` for later replay.
//!
//! The engine itself only logs at trace/debug, so a default run is silent
//! until the command-line layer says something.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Config,     // Loading, validation, fingerprints
    Simulation, // Per-year state transitions
    Optimizer,  // Candidate scores, winners
    Report,     // Rendering and output
    System,     // Startup, shutdown
    Profile,    // Timing
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Config => "config",
            Domain::Simulation => "simulation",
            Domain::Optimizer => "optimizer",
            Domain::Report => "report",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    sinks: Option<FileSinks>,
}

#[derive(Debug)]
struct FileSinks {
    events: Mutex<BufWriter<File>>,
    trace: Mutex<BufWriter<File>>,
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let sinks = std::env::var("LOG_DIR")
            .ok()
            .and_then(|base| open_sinks(PathBuf::from(base), &run_id));
        RunContext { run_id, sinks }
    })
}

fn open_sinks(base: PathBuf, run_id: &str) -> Option<FileSinks> {
    let run_dir = base.join(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    let _ = std::fs::write(
        run_dir.join("manifest.json"),
        json!({
            "run_id": run_id,
            "ts": ts_now(),
            "pid": process::id(),
            "log_dir": run_dir.to_string_lossy(),
        })
        .to_string(),
    );
    let events = File::create(run_dir.join("events.jsonl"))
        .map_err(|err| eprintln!("[log] failed to create events log: {}", err))
        .ok()?;
    let trace = File::create(run_dir.join("trace.jsonl"))
        .map_err(|err| eprintln!("[log] failed to create trace log: {}", err))
        .ok()?;
    Some(FileSinks {
        events: Mutex::new(BufWriter::new(events)),
        trace: Mutex::new(BufWriter::new(trace)),
    })
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["config_hash", "year", "tuition_per_credit", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Mutex<BufWriter<File>>, line: &str) {
    if let Ok(mut w) = writer.lock() {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

pub fn enabled(level: Level, domain: Domain) -> bool {
    level >= Level::from_env() && domain.is_enabled()
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if !enabled(level, domain) {
        return;
    }
    emit_record(level, domain.as_str(), event, fields);
}

fn build_record(
    run_id: &str,
    level: Level,
    component: &str,
    event: &str,
    fields: Map<String, Value>,
) -> Value {
    let (mut top, data) = split_fields(fields);
    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(run_id));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry)
}

fn emit_record(level: Level, component: &str, event: &str, fields: Map<String, Value>) {
    let ctx = ensure_run_context();
    let line = build_record(&ctx.run_id, level, component, event, fields).to_string();
    if let Some(sinks) = &ctx.sinks {
        match level {
            Level::Trace | Level::Debug => write_line(&sinks.trace, &line),
            _ => write_line(&sinks.events, &line),
        }
    }
    eprintln!("{}", line);
}

// =============================================================================
// Domain-Specific Logging Helpers
// =============================================================================

pub fn log_config_loaded(
    source: &str,
    config_hash: &str,
    total_terms: usize,
    credits_per_year: f64,
) {
    log(
        Level::Info,
        Domain::Config,
        "config_loaded",
        obj(&[
            ("config_hash", v_str(config_hash)),
            ("source", v_str(source)),
            ("total_terms", json!(total_terms)),
            ("credits_per_year", v_num(credits_per_year)),
        ]),
    );
}

pub fn log_year(
    year: usize,
    tuition_per_credit: f64,
    enrolled: f64,
    net_revenue: f64,
    awareness: f64,
    preference: f64,
    alumni: f64,
) {
    log(
        Level::Trace,
        Domain::Simulation,
        "year",
        obj(&[
            ("year", json!(year)),
            ("tuition_per_credit", v_num(tuition_per_credit)),
            ("enrolled", v_num(enrolled)),
            ("net_revenue", v_num(net_revenue)),
            ("awareness", v_num(awareness)),
            ("preference", v_num(preference)),
            ("alumni", v_num(alumni)),
        ]),
    );
}

pub fn log_candidate(tuition_per_credit: f64, objective: &str, score: f64) {
    log(
        Level::Debug,
        Domain::Optimizer,
        "candidate",
        obj(&[
            ("tuition_per_credit", v_num(tuition_per_credit)),
            ("objective", v_str(objective)),
            ("score", v_num(score)),
        ]),
    );
}

pub fn log_optimum(
    tuition_per_credit: f64,
    objective: &str,
    score: f64,
    candidates: usize,
    workers: usize,
) {
    log(
        Level::Debug,
        Domain::Optimizer,
        "optimum",
        obj(&[
            ("tuition_per_credit", v_num(tuition_per_credit)),
            ("objective", v_str(objective)),
            ("score", v_num(score)),
            ("candidates", json!(candidates)),
            ("workers", json!(workers)),
        ]),
    );
}

pub fn log_run_summary(
    config_hash: &str,
    horizon_years: usize,
    tuition_per_credit: f64,
    score: f64,
    elapsed_ms: f64,
) {
    log(
        Level::Info,
        Domain::System,
        "run_summary",
        obj(&[
            ("config_hash", v_str(config_hash)),
            ("horizon_years", json!(horizon_years)),
            ("tuition_per_credit", v_num(tuition_per_credit)),
            ("score", v_num(score)),
            ("elapsed_ms", v_num(elapsed_ms)),
        ]),
    );
}

pub fn log_error(domain: Domain, event: &str, err: &dyn std::fmt::Display) {
    log(Level::Error, domain, event, obj(&[("msg", v_str(&err.to_string()))]));
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits elapsed time at trace level on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Option<Map<String, Value>>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self { label, context: None, started: Instant::now() }
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        let context = if enabled(Level::Trace, Domain::Profile) { Some(obj(fields)) } else { None };
        Self { label, context, started: Instant::now() }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        if !enabled(Level::Trace, Domain::Profile) {
            return;
        }
        let mut fields = self.context.take().unwrap_or_default();
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(self.elapsed_ms()));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }

    #[test]
    fn test_record_lifts_top_level_fields() {
        let record = build_record(
            "r-test",
            Level::Info,
            "optimizer",
            "optimum",
            obj(&[("year", json!(3)), ("score", v_num(1.5)), ("msg", v_str("done"))]),
        );
        assert_eq!(record["run_id"], "r-test");
        assert_eq!(record["lvl"], "INFO");
        assert_eq!(record["year"], 3);
        assert_eq!(record["msg"], "done");
        assert_eq!(record["data"]["score"], 1.5);
        assert!(record["data"].get("year").is_none());
    }

    #[test]
    fn test_profile_scope_measures_time() {
        let scope = ProfileScope::new("test");
        assert!(scope.elapsed_ms() >= 0.0);
    }
}
