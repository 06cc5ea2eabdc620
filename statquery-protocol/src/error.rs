use thiserror::Error;

/// Result type used by the query and normalization types.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors raised while building a query or resolving its time zone.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("query must select at least one metric")]
    EmptyMetrics,

    #[error("invalid metric name {name:?}: {reason}")]
    InvalidMetric { name: String, reason: &'static str },

    #[error("interval end {end} is not after start {start}")]
    InvalidInterval { start: String, end: String },

    #[error("{field} must be a positive integer")]
    InvalidLimit { field: &'static str },

    #[error("accuracy must be a finite, non-negative number, got {0}")]
    InvalidAccuracy(f64),

    #[error("invalid calendar month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("unknown sort order: {0}")]
    UnknownSortOrder(String),

    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error("local time {time} does not exist in time zone {zone}")]
    NonexistentLocalTime { time: String, zone: String },
}

impl QueryError {
    /// Whether the error comes from time-zone resolution rather than query shape.
    pub fn is_time_zone_failure(&self) -> bool {
        matches!(
            self,
            QueryError::UnknownTimeZone(_) | QueryError::NonexistentLocalTime { .. }
        )
    }
}
