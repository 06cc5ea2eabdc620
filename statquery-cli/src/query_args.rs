use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use clap::Args;
use statquery_core::serde_utils::query_from_json_str;
use statquery_core::ClientConfig;
use statquery_protocol::prelude::*;
use statquery_protocol::report::localize;
use statquery_protocol::Tz;
use tracing::debug;

const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Flags describing a single query.
#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Read the query from a JSON document instead of flags
    #[arg(long, value_name = "PATH", conflicts_with_all = ["metrics", "month", "from", "to"])]
    pub file: Option<PathBuf>,

    /// Metric to select; repeat to select several, order is kept
    #[arg(short, long = "metric", value_name = "NAME")]
    pub metrics: Vec<String>,

    /// Calendar month to report on (defaults to the current month)
    #[arg(long, value_name = "YYYY-MM", conflicts_with_all = ["from", "to"])]
    pub month: Option<String>,

    /// Interval start: RFC 3339, or wall-clock time in --tz
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Interval end: RFC 3339, or wall-clock time in --tz
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// IANA time zone for wall-clock times and months (defaults to STATQUERY_TIME_ZONE)
    #[arg(long)]
    pub tz: Option<String>,

    /// Sort direction: ASC or DESC
    #[arg(long)]
    pub sort: Option<SortOrder>,

    /// Metric or dimension to sort by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Aggregation granularity, e.g. day or hour
    #[arg(long)]
    pub time_unit: Option<String>,

    /// Filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Request realtime data
    #[arg(long)]
    pub realtime: Option<bool>,

    /// Precision hint, e.g. 0.5
    #[arg(long)]
    pub accuracy: Option<f64>,

    /// Maximum number of rows
    #[arg(long)]
    pub limit: Option<u32>,

    /// Maximum number of top-K groups
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Order results by ascending timestamp
    #[arg(long)]
    pub ts_ascending: bool,
}

impl QueryArgs {
    /// Builds and validates the query, reading zone defaults from `config`.
    pub fn into_query(self, config: &ClientConfig, now: DateTime<Utc>) -> anyhow::Result<Query> {
        if let Some(path) = &self.file {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading query file {}", path.display()))?;
            let query = query_from_json_str(&raw)
                .with_context(|| format!("parsing query file {}", path.display()))?;
            return Ok(query);
        }

        let tz = match &self.tz {
            Some(name) => resolve_time_zone(name)?,
            None => config.time_zone()?,
        };
        let interval = self.interval(&tz, now)?;
        debug!(%interval, zone = %tz.name(), "resolved query interval");

        let mut builder = Query::builder(self.metrics, interval).ts_ascending(self.ts_ascending);
        if let Some(sort) = self.sort {
            builder = builder.sort(sort);
        }
        if let Some(sort_by) = self.sort_by {
            builder = builder.sort_by(sort_by);
        }
        if let Some(time_unit) = self.time_unit {
            builder = builder.time_unit(time_unit);
        }
        if let Some(filter) = self.filter {
            builder = builder.filter(filter);
        }
        if let Some(realtime) = self.realtime {
            builder = builder.realtime(realtime);
        }
        if let Some(accuracy) = self.accuracy {
            builder = builder.accuracy(accuracy);
        }
        if let Some(limit) = self.limit {
            builder = builder.limit(limit);
        }
        if let Some(top_k) = self.top_k {
            builder = builder.top_k(top_k);
        }

        Ok(builder.build()?)
    }

    fn interval(&self, tz: &Tz, now: DateTime<Utc>) -> anyhow::Result<Interval> {
        match (&self.month, &self.from, &self.to) {
            (Some(month), _, _) => {
                let (year, month) = parse_month(month)?;
                Ok(Interval::month(year, month, tz)?)
            }
            (None, Some(from), Some(to)) => {
                Ok(Interval::new(parse_instant(from, tz)?, parse_instant(to, tz)?)?)
            }
            (None, None, None) => Ok(Interval::current_month(now, tz)?),
            _ => bail!("--from and --to must be given together"),
        }
    }
}

fn parse_month(raw: &str) -> anyhow::Result<(i32, u32)> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("month must look like YYYY-MM, got {raw:?}"))?;
    let year = year
        .parse()
        .with_context(|| format!("invalid year in {raw:?}"))?;
    let month = month
        .parse()
        .with_context(|| format!("invalid month in {raw:?}"))?;
    Ok((year, month))
}

/// RFC 3339 input carries its own offset; anything else is read as wall-clock
/// time in `tz`.
fn parse_instant(raw: &str, tz: &Tz) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| anyhow!("unrecognised date/time {raw:?}"))?;

    Ok(localize(naive, tz)?)
}
