use serde::{Deserialize, Serialize};
use tracing::warn;

use super::interval::Interval;
use super::sort::SortOrder;
use super::spec::QuerySpec;
use crate::error::{QueryError, Result};

/// Separator used to join metric names in the `select` parameter.
pub const METRIC_SEPARATOR: &str = ",";

/// A single analytics report request: which metrics, over which interval,
/// shaped by a handful of optional parameters.
///
/// A `Query` can only be obtained through validation, so every instance
/// holds at least one well-formed metric name and a non-empty interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuerySpec", into = "QuerySpec")]
pub struct Query {
    metrics: Vec<String>,
    interval: Interval,
    sort: Option<SortOrder>,
    sort_by: Option<String>,
    time_unit: Option<String>,
    filter: Option<String>,
    realtime: Option<bool>,
    accuracy: Option<f64>,
    limit: Option<u32>,
    top_k: Option<u32>,
    ts_ascending: bool,
}

impl Query {
    /// Create a query with no optional parameters set.
    pub fn new<I, S>(metrics: I, interval: Interval) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryBuilder::new(metrics, interval).build()
    }

    /// Start a builder for a query with many optional parameters.
    pub fn builder<I, S>(metrics: I, interval: Interval) -> QueryBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryBuilder::new(metrics, interval)
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn with_time_unit(mut self, time_unit: impl Into<String>) -> Self {
        self.time_unit = Some(time_unit.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    /// Precision hint. May be fractional; negative or non-finite values are rejected.
    pub fn with_accuracy(mut self, accuracy: f64) -> Result<Self> {
        self.accuracy = Some(finite_non_negative(accuracy)?);
        Ok(self)
    }

    /// Cap the number of result rows. Zero is rejected.
    pub fn with_limit(mut self, limit: u32) -> Result<Self> {
        self.limit = Some(positive("limit", limit)?);
        Ok(self)
    }

    /// Cap the number of top-K groups. Zero is rejected.
    pub fn with_top_k(mut self, top_k: u32) -> Result<Self> {
        self.top_k = Some(positive("topK", top_k)?);
        Ok(self)
    }

    pub fn with_ts_ascending(mut self, ts_ascending: bool) -> Self {
        self.ts_ascending = ts_ascending;
        self
    }

    /// Metric names in the order they were given.
    pub fn metrics(&self) -> &[String] {
        &self.metrics
    }

    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    pub fn time_unit(&self) -> Option<&str> {
        self.time_unit.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn realtime(&self) -> Option<bool> {
        self.realtime
    }

    pub fn accuracy(&self) -> Option<f64> {
        self.accuracy
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn top_k(&self) -> Option<u32> {
        self.top_k
    }

    /// Timestamp ordering flag. Unlike the other options it always has a value.
    pub fn ts_ascending(&self) -> bool {
        self.ts_ascending
    }
}

/// Builder helper to create queries with many optional fields.
///
/// Setters never fail; every check runs in [`QueryBuilder::build`].
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    metrics: Vec<String>,
    interval: Interval,
    sort: Option<SortOrder>,
    sort_by: Option<String>,
    time_unit: Option<String>,
    filter: Option<String>,
    realtime: Option<bool>,
    accuracy: Option<f64>,
    limit: Option<u32>,
    top_k: Option<u32>,
    ts_ascending: bool,
}

impl QueryBuilder {
    pub fn new<I, S>(metrics: I, interval: Interval) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            metrics: metrics.into_iter().map(Into::into).collect(),
            interval,
            sort: None,
            sort_by: None,
            time_unit: None,
            filter: None,
            realtime: None,
            accuracy: None,
            limit: None,
            top_k: None,
            ts_ascending: false,
        }
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = Some(sort_by.into());
        self
    }

    pub fn time_unit(mut self, time_unit: impl Into<String>) -> Self {
        self.time_unit = Some(time_unit.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
        self
    }

    pub fn accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn ts_ascending(mut self, ts_ascending: bool) -> Self {
        self.ts_ascending = ts_ascending;
        self
    }

    pub fn build(self) -> Result<Query> {
        if self.metrics.is_empty() {
            warn!("rejecting query without metrics");
            return Err(QueryError::EmptyMetrics);
        }
        for metric in &self.metrics {
            validate_metric(metric)?;
        }

        let accuracy = self.accuracy.map(finite_non_negative).transpose()?;
        let limit = self.limit.map(|v| positive("limit", v)).transpose()?;
        let top_k = self.top_k.map(|v| positive("topK", v)).transpose()?;

        Ok(Query {
            metrics: self.metrics,
            interval: self.interval,
            sort: self.sort,
            sort_by: self.sort_by,
            time_unit: self.time_unit,
            filter: self.filter,
            realtime: self.realtime,
            accuracy,
            limit,
            top_k,
            ts_ascending: self.ts_ascending,
        })
    }
}

fn validate_metric(name: &str) -> Result<()> {
    let reason = if name.trim().is_empty() {
        "must not be blank"
    } else if name.contains(METRIC_SEPARATOR) {
        "contains the ',' separator"
    } else {
        return Ok(());
    };

    warn!(metric = name, reason, "rejecting metric name");
    Err(QueryError::InvalidMetric {
        name: name.to_string(),
        reason,
    })
}

fn finite_non_negative(accuracy: f64) -> Result<f64> {
    if !accuracy.is_finite() || accuracy < 0.0 {
        return Err(QueryError::InvalidAccuracy(accuracy));
    }
    Ok(accuracy)
}

fn positive(field: &'static str, value: u32) -> Result<u32> {
    if value == 0 {
        return Err(QueryError::InvalidLimit { field });
    }
    Ok(value)
}

impl TryFrom<QuerySpec> for Query {
    type Error = QueryError;

    fn try_from(spec: QuerySpec) -> Result<Self> {
        let interval = Interval::try_from(spec.interval)?;
        let mut builder = QueryBuilder::new(spec.metrics, interval);
        builder.sort = spec.sort;
        builder.sort_by = spec.sort_by;
        builder.time_unit = spec.time_unit;
        builder.filter = spec.filter;
        builder.realtime = spec.realtime;
        builder.accuracy = spec.accuracy;
        builder.limit = spec.limit;
        builder.top_k = spec.top_k;
        builder.ts_ascending = spec.ts_ascending;
        builder.build()
    }
}

impl From<Query> for QuerySpec {
    fn from(query: Query) -> Self {
        QuerySpec {
            metrics: query.metrics,
            interval: query.interval.into(),
            sort: query.sort,
            sort_by: query.sort_by,
            time_unit: query.time_unit,
            filter: query.filter,
            realtime: query.realtime,
            accuracy: query.accuracy,
            limit: query.limit,
            top_k: query.top_k,
            ts_ascending: query.ts_ascending,
        }
    }
}
