//! Configuration and settings management
//!
//! Loads secrets and tuning values from config files and environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use crate::error::BotError;

/// Review API endpoint polled for homework statuses
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
/// Pause between two polls, in seconds
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;
/// Upper bound for a single API request, in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Application settings loaded from environment variables
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Practicum API `OAuth` token
    pub practicum_token: Option<String>,
    /// Telegram Bot API token
    pub telegram_token: Option<String>,
    /// Chat that receives every notification
    pub telegram_chat_id: Option<String>,

    /// Seconds to sleep between polls
    #[serde(default = "default_retry_period")]
    pub retry_period: u64,
    /// Homework statuses endpoint
    #[serde(default = "default_endpoint")]
    pub practicum_endpoint: String,
    /// Timeout applied to each API request
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

const fn default_retry_period() -> u64 {
    DEFAULT_RETRY_PERIOD_SECS
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            practicum_token: None,
            telegram_token: None,
            telegram_chat_id: None,
            retry_period: default_retry_period(),
            practicum_endpoint: default_endpoint(),
            http_timeout_secs: default_http_timeout(),
        }
    }
}

/// Secrets that must all be present before polling starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Practicum API `OAuth` token
    pub practicum_token: String,
    /// Telegram Bot API token
    pub telegram_token: String,
    /// Target chat identifier
    pub telegram_chat_id: String,
}

impl Settings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use homework_bot::config::Settings;
    ///
    /// let settings = Settings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            // Not checked into git
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            // UPPER_SNAKE_CASE maps to snake_case; empty vars count as unset
            .add_source(Environment::default().ignore_empty(true))
            .build()?
            .try_deserialize()
    }

    /// Checks that every required secret is set.
    ///
    /// Each absent variable is logged at critical severity before the error
    /// is returned, so the operator sees all of them at once.
    ///
    /// # Errors
    ///
    /// Returns `BotError::MissingConfig` naming the absent variables.
    pub fn credentials(&self) -> Result<Credentials, BotError> {
        let required = [
            ("PRACTICUM_TOKEN", &self.practicum_token),
            ("TELEGRAM_TOKEN", &self.telegram_token),
            ("TELEGRAM_CHAT_ID", &self.telegram_chat_id),
        ];

        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();

        for name in &missing {
            error!(
                severity = "critical",
                variable = *name,
                "Отсутствует обязательная переменная окружения: \"{name}\"!"
            );
        }

        match (
            &self.practicum_token,
            &self.telegram_token,
            &self.telegram_chat_id,
        ) {
            (Some(practicum), Some(telegram), Some(chat)) if missing.is_empty() => {
                Ok(Credentials {
                    practicum_token: practicum.clone(),
                    telegram_token: telegram.clone(),
                    telegram_chat_id: chat.clone(),
                })
            }
            _ => Err(BotError::MissingConfig(missing)),
        }
    }

    /// Pause between two polls
    #[must_use]
    pub const fn retry_period(&self) -> Duration {
        Duration::from_secs(self.retry_period)
    }

    /// Timeout for a single API request
    #[must_use]
    pub const fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
