//! Structured JSON-lines logging.
//!
//! Every record carries a timestamp, a per-process run id, a sequence number,
//! level, domain and event name plus free-form `data` fields. Records go to
//! stdout; when `LOG_DIR` is set they are also written under
//! `$LOG_DIR/<run_id>/` (`events.jsonl` for info and above, `trace.jsonl`
//! for trace/debug).

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
    Fatal = 5,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            Ok("fatal") => Level::Fatal,
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
            Level::Fatal => "fatal",
        }
    }
}

// =============================================================================
// Log Domains
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Data,    // Input files, parsing, manifests
    Filter,  // Selection parsing and row filtering
    Render,  // Bias table, figures, page output
    Http,    // Requests and responses
    System,  // Startup, shutdown
    Profile, // Timings
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Data => "data",
            Domain::Filter => "filter",
            Domain::Render => "render",
            Domain::Http => "http",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS is a comma-separated list or "all"
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

fn open_sinks(run_id: &str) -> Option<FileSinks> {
    let base = std::env::var("LOG_DIR").ok()?;
    let mut run_dir = PathBuf::from(base);
    run_dir.push(run_id);
    if let Err(err) = create_dir_all(&run_dir) {
        eprintln!("[log] failed to create run dir: {}", err);
        return None;
    }
    let open = |name: &str| match File::create(run_dir.join(name)) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to create {}: {}", name, err);
            None
        }
    };
    Some(FileSinks {
        events: open("events.jsonl")?,
        trace: open("trace.jsonl")?,
    })
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let sinks = open_sinks(&run_id);
        RunContext { run_id, sinks }
    })
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

pub fn ts_epoch_secs() -> u64 {
    Utc::now().timestamp() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let line = format_record(level, domain, event, fields);

    let ctx = ensure_run_context();
    if let Some(sinks) = &ctx.sinks {
        match level {
            Level::Trace | Level::Debug => write_line(&sinks.trace, &line),
            _ => write_line(&sinks.events, &line),
        }
    }
    println!("{}", line);
}

fn format_record(
    level: Level,
    domain: Domain,
    event: &str,
    mut fields: Map<String, Value>,
) -> String {
    let ctx = ensure_run_context();
    let msg = fields.remove("msg").unwrap_or(Value::String(String::new()));

    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(domain.as_str()));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    entry.insert("data".to_string(), Value::Object(fields));
    Value::Object(entry).to_string()
}

pub fn info(domain: Domain, event: &str, fields: Map<String, Value>) {
    log(Level::Info, domain, event, fields);
}

pub fn warn(domain: Domain, event: &str, fields: Map<String, Value>) {
    log(Level::Warn, domain, event, fields);
}

pub fn error(domain: Domain, event: &str, fields: Map<String, Value>) {
    log(Level::Error, domain, event, fields);
}

// =============================================================================
// Dashboard events
// =============================================================================

pub fn log_file_loaded(kind: &str, path: &str, rows: usize) {
    log(
        Level::Debug,
        Domain::Data,
        "file_loaded",
        obj(&[
            ("kind", v_str(kind)),
            ("path", v_str(path)),
            ("rows", json!(rows)),
        ]),
    );
}

pub fn log_selection(race: &str, armed: &str, kept: usize, total: usize) {
    log(
        Level::Debug,
        Domain::Filter,
        "selection",
        obj(&[
            ("race", v_str(race)),
            ("armed", v_str(armed)),
            ("kept", json!(kept)),
            ("total", json!(total)),
        ]),
    );
}

pub fn log_request(method: &str, path: &str, status: u16, elapsed_ms: f64) {
    let level = if status >= 500 {
        Level::Error
    } else if status >= 400 {
        Level::Warn
    } else {
        Level::Info
    };
    log(
        level,
        Domain::Http,
        "request",
        obj(&[
            ("method", v_str(method)),
            ("path", v_str(path)),
            ("status", json!(status)),
            ("elapsed_ms", v_num(elapsed_ms)),
        ]),
    );
}

// =============================================================================
// Field helpers
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

/// Emits a `profile` trace record with the elapsed time when dropped.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self::with_context(label, &[])
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(self.elapsed_ms()));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
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
    fn test_record_shape() {
        let line = format_record(
            Level::Warn,
            Domain::Http,
            "request",
            obj(&[("msg", v_str("hello")), ("status", json!(404))]),
        );
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["lvl"], "WARN");
        assert_eq!(v["component"], "http");
        assert_eq!(v["msg"], "hello");
        assert_eq!(v["data"]["status"], 404);
        assert!(v["data"].get("msg").is_none());
    }
}
