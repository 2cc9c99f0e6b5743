use std::fs::File;
use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable naming the log file path.
pub const LOG_ENV_VAR: &str = "SETTINGS_ENGINE_LOG";

/// Per-process log file: `{base}.{unix_secs}.{pid}`.
fn log_file_path(base: &str) -> PathBuf {
    let started = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("{}.{}.{}", base, started, std::process::id()))
}

/// Install the global subscriber.
///
/// Does nothing unless `SETTINGS_ENGINE_LOG` is set, so CLI output on
/// stdout stays machine-readable. Filtering follows `RUST_LOG`, default
/// `info`. Calling it twice is harmless.
pub fn init_tracing() {
    let Some(base) = std::env::var(LOG_ENV_VAR).ok().filter(|v| !v.trim().is_empty()) else {
        return;
    };

    let path = log_file_path(base.trim());
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!(
                "Warning: could not open log file {}: {}",
                path.display(),
                err
            );
            return;
        }
    };

    let layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
    {
        tracing::info!(path = %path.display(), "Settings engine logging started");
    }
}
