//! Environment configuration, loaded once at startup.

use std::fmt;

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    Missing(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(name) => {
                write!(f, "required environment variable {name} is not set")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Immutable process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    pub openai_api_key: String,
    /// ID of the one group the bot answers in, compared verbatim against
    /// the stringified chat ID of each incoming message.
    pub group_chat_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Environment access is parameterized so tests never mutate the
    /// process environment.
    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| match lookup(name) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ConfigError::Missing(name)),
        };

        Ok(Self {
            telegram_bot_token: require("TELEGRAM_BOT_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            group_chat_id: require("GROUP_CHAT_ID")?,
        })
    }
}
