//! Stderr logging for the survey tools.
//!
//! Survey crates (`marker_survey*` targets) log at the requested level;
//! everything else, e.g. image decoders, is capped at `Warn` so per-frame
//! output is not drowned out. Records print as
//! `[elapsed LEVEL module] message`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, fmt::format::FmtSpan, util::SubscriberInitExt, EnvFilter};

/// Crate roots that log at the requested level.
const SURVEY_TARGETS: &[&str] = &[
    "marker_survey",
    "marker_survey_core",
    "marker_survey_aruco",
    "marker_survey_search",
];

fn is_survey_target(target: &str) -> bool {
    let root = target.split("::").next().unwrap_or(target);
    SURVEY_TARGETS.contains(&root)
}

/// Level filter applied to records from `target`.
fn level_for(target: &str, level: LevelFilter) -> LevelFilter {
    if is_survey_target(target) {
        level
    } else {
        level.min(LevelFilter::Warn)
    }
}

/// Last path segment: `marker_survey_search::engine` prints as `engine`.
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

struct SurveyLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for SurveyLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= level_for(metadata.target(), self.level)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = writeln!(
            std::io::stderr().lock(),
            "[{:8.3}s {:>5} {}] {}",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            short_target(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<SurveyLogger> = OnceLock::new();

/// Install the stderr logger. Later calls are no-ops.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| SurveyLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// `EnvFilter` directives equivalent to the stderr logger's filtering.
#[cfg_attr(not(feature = "tracing"), allow(dead_code))]
fn default_directives(level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(SURVEY_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}

/// Install a `tracing` subscriber. `RUST_LOG` wins over `level` when set.
#[cfg(feature = "tracing")]
pub fn init_tracing(level: LevelFilter, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
