//! Colored console output for teamforge.
//!
//! A `tracing` layer that renders the structured events of the engine
//! (`run_start`, `distribute_end`, `partition_end`, `reduce_end`, ...) as
//! colored one-line summaries on stderr, leaving stdout to command output.
//! Events are recognized by their `event` field.

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::sync::OnceLock;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const TARGET_PREFIX: &str = "teamforge";

/// Initializes console output.
///
/// Only the first call has effect. `RUST_LOG` overrides the default filter,
/// which is `info` for teamforge crates, or `debug` when `verbose` is set.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        print_banner();

        // Directive targets match by prefix, so this covers every teamforge crate.
        let default = if verbose { "teamforge=debug" } else { "teamforge=info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        // A subscriber installed elsewhere (e.g. by a test harness) wins.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(EngineConsoleLayer::new(verbose))
            .try_init();
    });
}

fn print_banner() {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(
        stderr,
        "{} {}",
        "teamforge".bright_cyan().bold(),
        format!("v{} - exhaustive team ranking", env!("CARGO_PKG_VERSION")).bright_white()
    );
    let _ = stderr.flush();
}

/// A tracing layer that formats engine events with colors.
///
/// Per-partition and storage events are shown only in verbose mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConsoleLayer {
    verbose: bool,
}

impl EngineConsoleLayer {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl<S: Subscriber> Layer<S> for EngineConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(TARGET_PREFIX) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level(), self.verbose);
        if !output.is_empty() {
            let _ = writeln!(io::stderr(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    message: Option<String>,
    model: Option<String>,
    task: Option<String>,
    kind: Option<String>,
    key: Option<String>,
    backend: Option<String>,
    error: Option<String>,
    models: Option<u64>,
    threads: Option<u64>,
    partition_volume: Option<u64>,
    results_size: Option<u64>,
    candidates: Option<u64>,
    blocks: Option<u64>,
    tasks: Option<u64>,
    volume: Option<u64>,
    evaluated: Option<u64>,
    retained: Option<u64>,
    partitions: Option<u64>,
    percent: Option<u64>,
    rows: Option<u64>,
    failed: Option<u64>,
    duration_ms: Option<u64>,
    best: Option<f64>,
}

impl EventVisitor {
    fn text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "message" => &mut self.message,
            "model" => &mut self.model,
            "task" => &mut self.task,
            "kind" => &mut self.kind,
            "key" => &mut self.key,
            "backend" => &mut self.backend,
            "error" => &mut self.error,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "models" => &mut self.models,
            "threads" => &mut self.threads,
            "partition_volume" => &mut self.partition_volume,
            "results_size" => &mut self.results_size,
            "candidates" => &mut self.candidates,
            "blocks" => &mut self.blocks,
            "tasks" => &mut self.tasks,
            "volume" => &mut self.volume,
            "evaluated" => &mut self.evaluated,
            "retained" => &mut self.retained,
            "partitions" => &mut self.partitions,
            "percent" => &mut self.percent,
            "rows" => &mut self.rows,
            "failed" => &mut self.failed,
            "duration_ms" => &mut self.duration_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "best" {
            self.best = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor, level: Level, verbose: bool) -> String {
    match v.event.as_deref() {
        Some("run_start") => format_run_start(v),
        Some("distribute_end") => format_distribute_end(v),
        Some("reduce_end") => format_reduce_end(v),
        Some("run_end") => format_run_end(v),
        Some("model_failed") => format_model_failed(v),
        Some("partition_end") if verbose => format_partition_end(v),
        Some("partition_progress") if verbose => format_partition_progress(v),
        Some("store_read" | "store_write") if verbose => format_store(v),
        Some(_) => String::new(),
        None if level <= Level::WARN => format_plain(v, level),
        None => String::new(),
    }
}

fn prefix(tag: &str) -> String {
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        "INFO".bright_green(),
        format!("[{}]", tag).bright_cyan()
    )
}

fn count(value: Option<u64>) -> String {
    value.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_run_start(v: &EventVisitor) -> String {
    format!(
        "{} Run started: models ({}), worker threads ({}), partition size ({}), results size ({})",
        prefix("Engine"),
        count(v.models).bright_yellow(),
        count(v.threads).bright_yellow(),
        count(v.partition_volume).bright_yellow(),
        count(v.results_size).bright_yellow()
    )
}

fn format_distribute_end(v: &EventVisitor) -> String {
    let model = v.model.as_deref().unwrap_or("?");
    format!(
        "{} {} distributed: candidates ({}), blocks ({}), tasks ({})",
        prefix(model),
        model.white().bold(),
        count(v.candidates).bright_yellow(),
        count(v.blocks).yellow(),
        count(v.tasks).bright_magenta().bold()
    )
}

fn format_partition_end(v: &EventVisitor) -> String {
    format!(
        "    {} {:<24} | {} teams in {} | best {}",
        "->".bright_blue(),
        v.task.as_deref().unwrap_or("?").white(),
        count(v.evaluated),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        format_score(v.best)
    )
}

fn format_partition_progress(v: &EventVisitor) -> String {
    format!(
        "       {} {:>3}% ({} teams)",
        v.task.as_deref().unwrap_or("?").bright_black(),
        v.percent.unwrap_or(0),
        count(v.evaluated)
    )
}

fn format_reduce_end(v: &EventVisitor) -> String {
    let model = v.model.as_deref().unwrap_or("?");
    format!(
        "{} {} reduced: partitions ({}), teams ranked ({}), best score ({})",
        prefix(model),
        model.white().bold(),
        count(v.partitions).bright_yellow(),
        count(v.retained).bright_yellow(),
        format_score(v.best)
    )
}

fn format_model_failed(v: &EventVisitor) -> String {
    format!(
        "{} {} {} {} failed: {}",
        timestamp().bright_black(),
        "ERROR".bright_red(),
        format!("[{}]", v.model.as_deref().unwrap_or("?")).bright_cyan(),
        v.model.as_deref().unwrap_or("?").white().bold(),
        v.error.as_deref().unwrap_or("unknown error").bright_red()
    )
}

fn format_run_end(v: &EventVisitor) -> String {
    let failed = v.failed.unwrap_or(0);
    let status = if failed == 0 {
        "all models ranked".bright_green().bold().to_string()
    } else {
        format!("{} model(s) failed", failed).bright_red().bold().to_string()
    };
    format!(
        "{} Run ended in {}: {}",
        prefix("Engine"),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        status
    )
}

fn format_store(v: &EventVisitor) -> String {
    let arrow = if v.event.as_deref() == Some("store_read") {
        "<-"
    } else {
        "->"
    };
    let location = match v.key.as_deref() {
        Some(key) if !key.is_empty() => format!("{}.{}", v.kind.as_deref().unwrap_or("?"), key),
        _ => v.kind.as_deref().unwrap_or("?").to_string(),
    };
    format!(
        "       {} {} {} rows ({})",
        arrow.bright_black(),
        location.bright_black(),
        count(v.rows).bright_black(),
        v.backend.as_deref().unwrap_or("?").bright_black()
    )
}

fn format_plain(v: &EventVisitor, level: Level) -> String {
    let tag = if level == Level::ERROR {
        "ERROR".bright_red().to_string()
    } else {
        " WARN".yellow().to_string()
    };
    format!(
        "{} {} {}",
        timestamp().bright_black(),
        tag,
        v.message.as_deref().unwrap_or("")
    )
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| {
            let secs = d.as_secs() % 100000;
            let millis = d.subsec_millis();
            format!("{:5}.{:03}", secs, millis)
        })
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        None => "N/A".white().to_string(),
        Some(s) if s > 0.0 => format!("{:.4}", s).bright_green().to_string(),
        Some(s) if s < 0.0 => format!("{:.4}", s).bright_red().to_string(),
        Some(s) => format!("{:.4}", s).white().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            model: Some("attackers".to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_counts_use_separators() {
        assert_eq!(count(Some(1_234_567)), "1,234,567");
        assert_eq!(count(None), "0");
    }

    #[test]
    fn test_summary_events_always_shown() {
        let mut v = visitor("distribute_end");
        v.tasks = Some(84);
        let line = format_event(&v, Level::INFO, false);
        assert!(line.contains("attackers"));
        assert!(line.contains("84"));
    }

    #[test]
    fn test_partition_events_need_verbose() {
        let mut v = visitor("partition_end");
        v.task = Some("attackers.3".to_string());
        assert!(format_event(&v, Level::INFO, false).is_empty());
        assert!(format_event(&v, Level::INFO, true).contains("attackers.3"));
    }

    #[test]
    fn test_untagged_events() {
        let v = EventVisitor {
            message: Some("disk full".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&v, Level::INFO, true).is_empty());
        assert!(format_event(&v, Level::ERROR, false).contains("disk full"));
    }
}
