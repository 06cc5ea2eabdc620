use tracing::debug;

use super::params::{keys, NormalizedParameters};
use crate::report::{Query, METRIC_SEPARATOR};

/// Maps a [`Query`] onto the flat parameter set of the statistics API.
///
/// `select`, `timeRange` and `tsAscending` are always emitted. Every other
/// key appears only when the matching query field was set.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, query: &Query) -> NormalizedParameters {
        let mut params = NormalizedParameters::default();

        params.insert(keys::SELECT, query.metrics().join(METRIC_SEPARATOR));
        params.insert(keys::TIME_RANGE, query.interval().to_time_range());
        params.insert(keys::TS_ASCENDING, query.ts_ascending());

        if let Some(sort) = query.sort() {
            params.insert(keys::SORT, sort.as_code());
        }
        if let Some(sort_by) = query.sort_by() {
            params.insert(keys::SORT_BY, sort_by);
        }
        if let Some(time_unit) = query.time_unit() {
            params.insert(keys::TIME_UNIT, time_unit);
        }
        if let Some(filter) = query.filter() {
            params.insert(keys::FILTER, filter);
        }
        if let Some(realtime) = query.realtime() {
            params.insert(keys::REALTIME, realtime);
        }
        if let Some(accuracy) = query.accuracy() {
            params.insert(keys::ACCURACY, accuracy);
        }
        if let Some(limit) = query.limit() {
            params.insert(keys::LIMIT, limit);
        }
        if let Some(top_k) = query.top_k() {
            params.insert(keys::TOP_K, top_k);
        }

        debug!(
            metrics = query.metrics().len(),
            time_range = params.get_str(keys::TIME_RANGE),
            parameters = params.len(),
            "normalized query"
        );

        params
    }
}

/// Shorthand for `Normalizer::new().normalize(query)`.
pub fn normalize(query: &Query) -> NormalizedParameters {
    Normalizer.normalize(query)
}
