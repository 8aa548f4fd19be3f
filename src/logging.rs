use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Initialise logging to stderr, and additionally to `log_file` when given.
///
/// With `debug` the default level is `debug` and `RUST_LOG` may override
/// it; otherwise the level is forced to `info`. Keep the returned guard
/// alive for as long as file output should be flushed.
pub fn init(debug: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    // Forcing `info` keeps a stray RUST_LOG in the user's environment from
    // turning on verbose output.
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let Some(path) = log_file else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        return None;
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trading_dashboard.log".into());
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .try_init();
    Some(guard)
}
