use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct LocalTimer;

impl fmt::time::FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().to_rfc3339())
    }
}

pub fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

/// Console layer (colored, level-tagged) plus a daily-rolling file layer.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logger(log_dir: &Path) {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("failed to create log directory {}: {}", log_dir.display(), e);
        return;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, "tgtapper.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::Layer::new()
        .with_target(false)
        .with_level(true)
        .with_timer(LocalTimer);
    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(LocalTimer);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let initialized = tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();
    // The guard must outlive the process or file logging stops.
    std::mem::forget(guard);

    if initialized {
        info!("Log system initialized (console + {})", log_dir.display());
        if let Err(e) = cleanup_old_logs(log_dir, 7) {
            warn!("Failed to cleanup old logs: {}", e);
        }
    }
}

/// Removes log files whose mtime is older than `days_to_keep` days.
pub fn cleanup_old_logs(log_dir: &Path, days_to_keep: u64) -> std::io::Result<()> {
    use std::time::{Duration, SystemTime};

    if !log_dir.exists() {
        return Ok(());
    }
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(days_to_keep * 24 * 60 * 60))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    for entry in fs::read_dir(log_dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(metadata) = fs::metadata(&path) else {
            continue;
        };
        if metadata.modified().map(|m| m < cutoff).unwrap_or(false) {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Failed to delete old log file {:?}: {}", path, e);
            } else {
                info!("Deleted old log file: {:?}", path.file_name());
            }
        }
    }
    Ok(())
}
