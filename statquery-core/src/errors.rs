use thiserror::Error;

use statquery_protocol::QueryError;

/// Result type used across the statquery core crate.
pub type Result<T> = std::result::Result<T, StatQueryError>;

/// Canonical error representation shared by all statquery crates.
#[derive(Debug, Error)]
pub enum StatQueryError {
    #[error("Invalid query: {0}")]
    InvalidQuery(QueryError),

    #[error("Time zone resolution failed: {0}")]
    TimeZoneResolution(QueryError),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("General error: {0}")]
    GeneralError(String),
}

impl StatQueryError {
    /// The underlying query error, for the two query-related variants.
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            StatQueryError::InvalidQuery(err) | StatQueryError::TimeZoneResolution(err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

/// Zone failures are kept apart from shape errors so callers can tell a bad
/// query from a bad environment.
impl From<QueryError> for StatQueryError {
    fn from(err: QueryError) -> Self {
        if err.is_time_zone_failure() {
            StatQueryError::TimeZoneResolution(err)
        } else {
            StatQueryError::InvalidQuery(err)
        }
    }
}

impl From<serde_json::Error> for StatQueryError {
    fn from(err: serde_json::Error) -> Self {
        StatQueryError::DeserializationError(err.to_string())
    }
}

impl From<anyhow::Error> for StatQueryError {
    fn from(err: anyhow::Error) -> Self {
        StatQueryError::GeneralError(err.to_string())
    }
}

/// Dedicated configuration error used by the configuration module.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for environment variable {key}: {reason}")]
    InvalidEnvVar { key: String, reason: String },
}

impl From<ConfigError> for StatQueryError {
    fn from(value: ConfigError) -> Self {
        StatQueryError::ConfigError(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_query_errors_by_kind() {
        let shape: StatQueryError = QueryError::EmptyMetrics.into();
        assert!(matches!(shape, StatQueryError::InvalidQuery(_)));

        let zone: StatQueryError = QueryError::UnknownTimeZone("Atlantis/Capital".into()).into();
        assert!(matches!(zone, StatQueryError::TimeZoneResolution(_)));
        assert_eq!(
            zone.query_error(),
            Some(&QueryError::UnknownTimeZone("Atlantis/Capital".into()))
        );
    }

    #[test]
    fn config_errors_keep_message() {
        let err: StatQueryError = ConfigError::MissingEnvVar("STATQUERY_API_URL".into()).into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required environment variable: STATQUERY_API_URL"
        );
        assert!(err.query_error().is_none());
    }
}
