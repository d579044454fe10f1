//! Application configuration loaded from environment variables.

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Path Telegram delivers webhook updates to.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Configuration errors. All of them are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Application configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Telegram configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

/// How updates reach the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Webhook,
    Polling,
}

#[derive(Debug, Deserialize)]
pub struct TelegramConfig {
    /// Bot token from BotFather (required)
    pub bot_token: Option<SecretString>,

    /// Chat id that receives completed registrations (required)
    pub admin_chat_id: Option<i64>,

    /// Bot API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// HTTP request timeout. Must exceed `poll_timeout` in polling mode.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Update delivery mode
    #[serde(default = "default_mode")]
    pub mode: TransportMode,

    /// Long-poll timeout for `getUpdates`
    #[serde(default = "default_poll_timeout", with = "humantime_serde")]
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Public base URL Telegram can reach (required in webhook mode)
    #[serde(default)]
    pub public_url: Option<String>,

    /// Secret Telegram echoes in `X-Telegram-Bot-Api-Secret-Token`
    #[serde(default)]
    pub webhook_secret: Option<String>,

    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default implementations
impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_chat_id: None,
            api_url: default_api_url(),
            timeout: default_timeout(),
            mode: default_mode(),
            poll_timeout: default_poll_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_url: None,
            webhook_secret: None,
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://api.telegram.org".into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_mode() -> TransportMode {
    TransportMode::Webhook
}

fn default_poll_timeout() -> Duration {
    Duration::from_secs(25)
}

fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_env(config::Environment::default())
    }

    fn from_env(env: config::Environment) -> Result<Self, ConfigError> {
        let config: Config = config::Config::builder()
            .add_source(
                env.separator("__")
                    // Keep strings as strings; chat ids are parsed by serde.
                    .try_parsing(false),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check that every setting without a default is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.bot_token.is_none() {
            return Err(ConfigError::Missing("TELEGRAM__BOT_TOKEN"));
        }
        if self.telegram.admin_chat_id.is_none() {
            return Err(ConfigError::Missing("TELEGRAM__ADMIN_CHAT_ID"));
        }
        if self.telegram.mode == TransportMode::Webhook && self.server.public_url.is_none() {
            return Err(ConfigError::Missing("SERVER__PUBLIC_URL"));
        }
        Ok(())
    }

    /// Admin chat id. Only valid after [`Config::validate`].
    pub fn admin_chat_id(&self) -> Result<i64, ConfigError> {
        self.telegram
            .admin_chat_id
            .ok_or(ConfigError::Missing("TELEGRAM__ADMIN_CHAT_ID"))
    }

    /// Bot token. Only valid after [`Config::validate`].
    pub fn bot_token(&self) -> Result<&SecretString, ConfigError> {
        self.telegram
            .bot_token
            .as_ref()
            .ok_or(ConfigError::Missing("TELEGRAM__BOT_TOKEN"))
    }

    /// Full webhook URL registered with Telegram.
    pub fn webhook_url(&self) -> Result<String, ConfigError> {
        let base = self
            .server
            .public_url
            .as_deref()
            .ok_or(ConfigError::Missing("SERVER__PUBLIC_URL"))?;
        Ok(format!("{}{}", base.trim_end_matches('/'), WEBHOOK_PATH))
    }
}
