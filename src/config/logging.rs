use std::env;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Console logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: Level,
    /// Log format (json, pretty, compact)
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        let level =
            Self::parse_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
        let format =
            Self::parse_format(&env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()));

        Self { level, format }
    }

    fn parse_level(s: &str) -> Level {
        match s.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => {
                eprintln!("Invalid LOG_LEVEL: {}, using INFO", s);
                Level::INFO
            }
        }
    }

    fn parse_format(s: &str) -> LogFormat {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            "compact" => LogFormat::Compact,
            _ => {
                eprintln!("Invalid LOG_FORMAT: {}, using Pretty", s);
                LogFormat::Pretty
            }
        }
    }
}

/// Installs the global subscriber. `RUST_LOG` overrides the configured
/// level when set.
pub fn init(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
        LogFormat::Compact => builder.compact().init(),
    }
}
