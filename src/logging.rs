use std::{
    fs,
    path::Path,
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result, anyhow};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{self, RollingFileAppender},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LoggingConfig, LoggingRotation, StderrLevel};

const LOG_FILE_PREFIX: &str = "gxp-provision.log";

/// Keeps the non-blocking file writer alive; drop it last to flush pending events.
pub struct LoggingGuard {
    _worker_guard: Option<WorkerGuard>,
    run_id: String,
}

impl LoggingGuard {
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

pub fn init_tracing(logging_config: &LoggingConfig) -> Result<LoggingGuard> {
    if logging_config.filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    let env_filter = build_env_filter(&logging_config.filter)?;

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(stderr_level_filter(logging_config.stderr_level));

    let mut retention_warnings = Vec::new();
    let (file_layer, worker_guard) = match &logging_config.dir {
        Some(log_dir) => {
            fs::create_dir_all(log_dir).with_context(|| {
                format!("failed to create logging directory {}", log_dir.display())
            })?;
            retention_warnings =
                purge_expired_logs(log_dir, logging_config.retention_days, SystemTime::now());

            let appender = rolling_appender(log_dir, logging_config.rotation);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(true)
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(env_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    let run_id = Uuid::now_v7().to_string();
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = ?logging_config.dir,
        filter = %logging_config.filter,
        rotation = ?logging_config.rotation,
        retention_days = logging_config.retention_days,
        "logging_initialized"
    );
    for warning in retention_warnings {
        tracing::warn!(target: "logging", warning = %warning, "logging_retention_warning");
    }

    Ok(LoggingGuard {
        _worker_guard: worker_guard,
        run_id,
    })
}

fn build_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter)
        .with_context(|| format!("failed to parse logging.filter '{}'", filter))
}

fn stderr_level_filter(level: StderrLevel) -> LevelFilter {
    match level {
        StderrLevel::Off => LevelFilter::OFF,
        StderrLevel::Error => LevelFilter::ERROR,
        StderrLevel::Warn => LevelFilter::WARN,
        StderrLevel::Info => LevelFilter::INFO,
        StderrLevel::Debug => LevelFilter::DEBUG,
        StderrLevel::Trace => LevelFilter::TRACE,
    }
}

fn rolling_appender(log_dir: &Path, rotation: LoggingRotation) -> RollingFileAppender {
    match rotation {
        LoggingRotation::Daily => rolling::daily(log_dir, LOG_FILE_PREFIX),
        LoggingRotation::Hourly => rolling::hourly(log_dir, LOG_FILE_PREFIX),
    }
}

/// Removes our log files last modified more than `retention_days` before `now`.
/// Failures are returned as warnings; they never abort startup.
fn purge_expired_logs(log_dir: &Path, retention_days: usize, now: SystemTime) -> Vec<String> {
    let retention = Duration::from_secs(retention_days.saturating_mul(24 * 60 * 60) as u64);
    let cutoff = now.checked_sub(retention).unwrap_or(SystemTime::UNIX_EPOCH);

    let entries = match fs::read_dir(log_dir) {
        Ok(entries) => entries,
        Err(err) => return vec![format!("failed to scan {}: {err}", log_dir.display())],
    };

    entries
        .filter_map(|entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => return Some(format!("failed to read directory entry: {err}")),
            };
            if !entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX) {
                return None;
            }
            let path = entry.path();
            let modified = match entry.metadata().and_then(|metadata| metadata.modified()) {
                Ok(modified) => modified,
                Err(err) => return Some(format!("failed to stat {}: {err}", path.display())),
            };
            if modified > cutoff || !path.is_file() {
                return None;
            }
            fs::remove_file(&path)
                .err()
                .map(|err| format!("failed to remove expired log {}: {err}", path.display()))
        })
        .collect()
}
