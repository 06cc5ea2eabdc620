//! statquery: client-side normalization of analytics queries
//!
//! Turns a structured report request into the flat parameter set expected
//! by the remote statistics API.
//!
//! # Architecture
//!
//! * `statquery-protocol`: the query model (`Query`, `Interval`,
//!   `SortOrder`) and the `Normalizer`
//! * `statquery-core`: shared errors, configuration and logging setup
//! * `statquery-cli`: the `statquery` command-line tool
//!
//! Time zones are always explicit. An interval is built from zone-aware
//! instants (or from wall-clock times plus a zone) and is carried as UTC,
//! so the parameters produced never depend on the process time zone.

pub use statquery_core::{
    config, errors, logging, serde_utils, ClientConfig, CoreResult, Environment, StatQueryError,
};
pub use statquery_protocol::{normalize, report, QueryError, Tz};

pub use statquery_protocol::normalize::{NormalizedParameters, Normalizer, ParamValue};
pub use statquery_protocol::report::{Interval, Query, QueryBuilder, SortOrder};

/// Normalizes a JSON query document in one step.
///
/// Validation failures keep their kind (`InvalidQuery` or
/// `TimeZoneResolution`); only malformed JSON is a `DeserializationError`.
pub fn normalize_json(document: &str) -> CoreResult<NormalizedParameters> {
    let query = serde_utils::query_from_json_str(document)?;
    Ok(Normalizer::new().normalize(&query))
}

pub mod prelude {
    pub use statquery_core::{ClientConfig, StatQueryError};
    pub use statquery_protocol::prelude::*;
}
