use serde::{Deserialize, Serialize};

use super::interval::IntervalSpec;
use super::sort::SortOrder;

/// Wire/JSON shape of a [`Query`](super::Query).
///
/// Deserializing a `Query` goes through this type and then through the
/// same validation as the builder, so a malformed document never yields a
/// `Query`. Converting with `Query::try_from` instead of deserializing a
/// `Query` directly keeps the [`QueryError`](crate::QueryError) intact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub metrics: Vec<String>,
    pub interval: IntervalSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub ts_ascending: bool,
}
