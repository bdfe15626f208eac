use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Watcher configuration. Loaded once at startup and passed to the
/// components that need it.
#[derive(Clone, Debug)]
pub struct WatcherConfig {
    pub imap_server: String,
    pub imap_port: u16,
    pub username: String,
    pub password: String,
    pub mailbox: String,
    pub idle_timeout: Duration,
    pub drain_pause: Duration,
    pub save_dir: PathBuf,
}

impl WatcherConfig {
    /// Builds the configuration from environment variables (and a `.env`
    /// file, if one is present).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let save_dir = match std::env::var("SAVE_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_save_dir()?,
        };

        let config = Self {
            imap_server: Self::env_required("EMAIL_IMAP_SERVER")?,
            imap_port: Self::env_parse("EMAIL_IMAP_PORT", 993)?,
            username: Self::env_required("EMAIL_USERNAME")?,
            password: Self::env_required("EMAIL_PASSWORD")?,
            mailbox: Self::env_or("EMAIL_MAILBOX", "INBOX"),
            idle_timeout: Duration::from_secs(Self::env_parse("EMAIL_IDLE_TIMEOUT", 60)?),
            drain_pause: Duration::from_secs(Self::env_parse("EMAIL_DRAIN_PAUSE", 2)?),
            save_dir,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.imap_port == 0 {
            anyhow::bail!("Invalid IMAP port: {}", self.imap_port);
        }
        if self.imap_server.is_empty() {
            anyhow::bail!("IMAP server cannot be empty");
        }
        if self.mailbox.is_empty() {
            anyhow::bail!("Mailbox name cannot be empty");
        }
        if self.idle_timeout.is_zero() {
            anyhow::bail!("Idle timeout must be greater than 0");
        }
        // RFC 2177 asks clients to re-issue IDLE at least every 29 minutes.
        if self.idle_timeout > Duration::from_secs(29 * 60) {
            warn!(
                "Idle timeout {}s is longer than servers are required to honor",
                self.idle_timeout.as_secs()
            );
        }
        if self.save_dir.to_str().is_none_or(|s| s.is_empty()) {
            anyhow::bail!("Save directory path is invalid");
        }

        Ok(())
    }

    /// Reads an environment variable, falling back to a default.
    fn env_or(key: &str, default: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Reads and parses an environment variable, using the default when
    /// the variable is absent.
    fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        match std::env::var(key) {
            Ok(val) => val
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
            Err(_) => Ok(default),
        }
    }

    /// Reads a required environment variable.
    fn env_required(key: &str) -> Result<String> {
        std::env::var(key).context(format!("{} not set in environment or .env file", key))
    }
}

fn default_save_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Cannot determine home directory")?;
    Ok(home.join("Downloads").join("pdf-collector"))
}
