use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes diagnostic logging: human-readable output on stdout and, when
/// `trace_dir` is given, JSON records in a daily-rotated file there.
///
/// This is separate from the postback log, which is written by the
/// configured log sink. Keep the returned guard alive so buffered file
/// records are flushed on exit.
pub fn init_logging(trace_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("postback_relay=info,tower_http=info"));
    let console_layer = fmt::layer().with_writer(std::io::stdout);

    let (file_layer, guard) = match trace_dir {
        Some(dir) => {
            let _ = fs::create_dir_all(dir);
            let file_appender = tracing_appender::rolling::daily(dir, "postback-relay.trace.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    // A subscriber installed earlier (tests, embedding) wins.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init();

    guard
}
