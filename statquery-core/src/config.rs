use std::env;

use statquery_protocol::{report::resolve_time_zone, Tz};
use tracing::debug;
use url::Url;

use crate::errors::{ConfigError, StatQueryError};

const DEFAULT_PREFIX: &str = "STATQUERY_";
const DEFAULT_TIME_ZONE: &str = "UTC";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Client-side settings read from the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Option<Url>,
    pub time_zone: String,
    pub log_level: String,
    pub environment: Environment,
}

impl ClientConfig {
    /// Loads configuration from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix(DEFAULT_PREFIX)
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `STATQUERY_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let url_key = key("API_URL");
        let api_url = match env::var(&url_key) {
            Ok(raw) => Some(Url::parse(raw.trim()).map_err(|err| ConfigError::InvalidEnvVar {
                key: url_key.clone(),
                reason: err.to_string(),
            })?),
            Err(_) => None,
        };

        let time_zone = env::var(key("TIME_ZONE"))
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());

        let log_level =
            env::var(key("LOG")).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        debug!(
            prefix,
            time_zone = %time_zone,
            api_url = api_url.as_ref().map(Url::as_str),
            ?environment,
            "loaded client configuration"
        );

        Ok(Self {
            api_url,
            time_zone,
            log_level,
            environment,
        })
    }

    /// Resolves the configured zone name. Unknown names are an error, never UTC.
    pub fn time_zone(&self) -> Result<Tz, StatQueryError> {
        Ok(resolve_time_zone(&self.time_zone)?)
    }

    /// Returns the statistics endpoint, failing when it was not configured.
    pub fn require_api_url(&self) -> Result<&Url, ConfigError> {
        self.api_url
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar(format!("{}API_URL", DEFAULT_PREFIX)))
    }

    /// Whether the client is running in production.
    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            time_zone: DEFAULT_TIME_ZONE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            environment: Environment::default(),
        }
    }
}

/// Helper that loads config and converts to the canonical statquery error type.
pub fn load_client_config() -> Result<ClientConfig, StatQueryError> {
    Ok(ClientConfig::from_env()?)
}
