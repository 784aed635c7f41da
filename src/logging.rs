use crate::error::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go.
pub enum LogTarget<'a> {
    /// Human-readable lines on stderr (server and one-shot commands).
    Console,
    /// Appended to `<dir>/umkm-map.log`; used while the terminal UI owns the screen.
    File(&'a Path),
}

/// Initializes the global subscriber. `RUST_LOG` wins over `default_filter`.
///
/// Fails if the log directory cannot be created or opened. The returned
/// guard must be held until exit so buffered file output is flushed.
pub fn init_logging(target: LogTarget<'_>, default_filter: &str) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match target {
        LogTarget::Console => {
            let console_layer = fmt::layer().with_writer(std::io::stderr);
            // A second init (e.g. in tests) is not an error worth surfacing
            let _ = tracing_subscriber::registry().with(filter).with(console_layer).try_init();
            Ok(None)
        }
        LogTarget::File(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix("umkm-map.log")
                .build(dir)?;
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer().with_ansi(false).with_writer(writer);
            let _ = tracing_subscriber::registry().with(filter).with(file_layer).try_init();
            Ok(Some(guard))
        }
    }
}
