//! Tracing subscriber setup: console output, plus a plain-text file copy
//! when `PITSTOP_LOG_FILE` is set.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `log_level`.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. A log file that cannot be opened disables file
/// logging with a note on stderr rather than failing startup.
///
/// # Errors
///
/// Returns an error if `log_level` is not a valid filter directive.
pub(crate) fn init_logging(
    log_level: &str,
    log_file: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;

    let (file_layer, guard) = match log_file.map(open_log_file) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("warning: file logging disabled: {e:#}");
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    Ok(guard)
}

/// Opens `path` for appending, creating its parent directory. The file is
/// never rotated.
fn open_log_file(path: &Path) -> anyhow::Result<RollingFileAppender> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("log file path '{}' has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;
    Ok(appender)
}
