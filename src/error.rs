use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A record failed shape validation while building the store.
    /// `line` is the 1-based data row (header excluded).
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Log file setup failed: {0}")]
    Logging(#[from] tracing_appender::rolling::InitError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
