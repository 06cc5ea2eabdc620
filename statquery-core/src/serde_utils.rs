use statquery_protocol::report::{Query, QuerySpec};

use crate::errors::{Result, StatQueryError};

/// Pretty JSON for CLI output and saved query documents.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| StatQueryError::SerializationError(err.to_string()))
}

/// Parses JSON text. Any failure, including validation done by a
/// `try_from` conversion, becomes `DeserializationError`; use
/// [`query_from_json_str`] for query documents.
pub fn from_json_str<T: serde::de::DeserializeOwned>(input: &str) -> Result<T> {
    serde_json::from_str(input)
        .map_err(|err| StatQueryError::DeserializationError(err.to_string()))
}

pub fn from_json_bytes<T: serde::de::DeserializeOwned>(input: &[u8]) -> Result<T> {
    serde_json::from_slice(input)
        .map_err(|err| StatQueryError::DeserializationError(err.to_string()))
}

/// Reads a query document.
///
/// Malformed JSON is a `DeserializationError`. A well-formed document that
/// fails validation keeps its kind: `InvalidQuery` for a bad metric list or
/// limit, `TimeZoneResolution` for an unknown `timeZone`.
pub fn query_from_json_str(input: &str) -> Result<Query> {
    let spec: QuerySpec = from_json_str(input)?;
    Ok(Query::try_from(spec)?)
}

/// Byte-slice variant of [`query_from_json_str`].
pub fn query_from_json_bytes(input: &[u8]) -> Result<Query> {
    let spec: QuerySpec = from_json_bytes(input)?;
    Ok(Query::try_from(spec)?)
}
