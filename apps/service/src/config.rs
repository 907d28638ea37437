use std::{env, fmt, time::Duration};

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no endpoints configured, set ENDPOINTS to a comma-separated list")]
    NoEndpoints,
}

/// Runtime configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoints to probe, in configured order.
    pub endpoints: Vec<String>,
    /// Retry budget per endpoint per cycle.
    pub max_attempts: u32,
    /// Pause between full sweeps of all endpoints.
    pub cycle_interval: Duration,
    /// Pause between retries within one endpoint's check.
    pub retry_delay: Duration,
    /// Pause between aggregate health reports.
    pub report_interval: Duration,
    /// Timeout of a single probe request.
    pub probe_timeout: Duration,
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any name-to-value lookup.
    ///
    /// Tests call this directly with a map so they never touch the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoints = parse_endpoints(&lookup("ENDPOINTS").unwrap_or_default());
        if endpoints.is_empty() {
            return Err(ConfigError::NoEndpoints);
        }

        let telegram = match (lookup("TELEGRAM_BOT_TOKEN"), lookup("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            (None, None) => None,
            _ => {
                warn!(
                    "Both TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are needed for notifications, \
                     ignoring the partial credentials"
                );
                None
            }
        };

        Ok(Self {
            endpoints,
            max_attempts: parse_or_default(&lookup, "MAX_ATTEMPTS", 3),
            cycle_interval: Duration::from_secs(parse_or_default(
                &lookup,
                "CYCLE_INTERVAL_SECS",
                60,
            )),
            retry_delay: Duration::from_secs(parse_or_default(&lookup, "RETRY_DELAY_SECS", 60)),
            report_interval: Duration::from_secs(parse_or_default(
                &lookup,
                "REPORT_INTERVAL_SECS",
                86_400,
            )),
            probe_timeout: Duration::from_secs(parse_or_default(&lookup, "PROBE_TIMEOUT_SECS", 5)),
            telegram,
        })
    }
}

/// Split a comma-separated endpoint list, dropping surrounding whitespace
/// and empty items.
fn parse_endpoints(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty()).map(str::to_owned).collect()
}

/// Parse an environment value, falling back to the default on a missing or
/// unparseable one. A bad value is logged, never fatal.
fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: std::str::FromStr + fmt::Display + Copy,
{
    match lookup(name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                warn!("Invalid value {raw:?} for {name}, using default {default}");
                default
            }
        },
        None => default,
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Effective configuration:")?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Endpoints", &self.endpoints.join(", "))?;
        write_1(f, "Max attempts", &self.max_attempts)?;
        write_1(f, "Cycle interval", &format!("{}s", self.cycle_interval.as_secs()))?;
        write_1(f, "Retry delay", &format!("{}s", self.retry_delay.as_secs()))?;
        write_1(f, "Report interval", &format!("{}s", self.report_interval.as_secs()))?;
        write_1(f, "Probe timeout", &format!("{}s", self.probe_timeout.as_secs()))?;
        write_title_1(f, "Telegram")?;
        match &self.telegram {
            // The bot token is a credential and never printed.
            Some(telegram) => {
                write_1(f, "Notifications", &"enabled")?;
                write_1(f, "Chat ID", &telegram.chat_id)?;
            }
            None => write_1(f, "Notifications", &"disabled")?,
        }

        Ok(())
    }
}
