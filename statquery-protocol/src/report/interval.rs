use std::fmt;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{QueryError, Result};

/// Wall-clock layout of each `timeRange` endpoint, always rendered in UTC.
pub const TIME_RANGE_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Separator between the two `timeRange` endpoints.
pub const TIME_RANGE_SEPARATOR: char = '~';

/// Resolves an IANA zone name such as `Europe/Budapest`.
///
/// Unknown names are an error; there is no fallback zone.
pub fn resolve_time_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| QueryError::UnknownTimeZone(name.to_string()))
}

/// Reporting window. Both endpoints are stored as UTC instants, so the zone
/// an interval was built in only matters at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalSpec")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl Interval {
    /// Builds an interval from two zone-aware instants. `end` must be after `start`.
    pub fn new<Z: TimeZone>(start: DateTime<Z>, end: DateTime<Z>) -> Result<Self> {
        let start = start.with_timezone(&Utc);
        let end = end.with_timezone(&Utc);

        if start >= end {
            warn!(%start, %end, "rejecting interval whose end is not after its start");
            return Err(QueryError::InvalidInterval {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }

        Ok(Self { start, end })
    }

    /// Builds an interval from wall-clock times read in `tz`.
    pub fn from_local<Z>(start: NaiveDateTime, end: NaiveDateTime, tz: &Z) -> Result<Self>
    where
        Z: TimeZone + fmt::Debug,
    {
        Self::new(localize(start, tz)?, localize(end, tz)?)
    }

    /// The calendar month `year-month` as observed in `tz`, from the first
    /// midnight of the month up to the first midnight of the next one.
    pub fn month<Z>(year: i32, month: u32, tz: &Z) -> Result<Self>
    where
        Z: TimeZone + fmt::Debug,
    {
        let invalid = || QueryError::InvalidMonth { year, month };

        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;

        let midnight = |date: NaiveDate| date.and_hms_opt(0, 0, 0).ok_or_else(invalid);
        Self::from_local(midnight(first)?, midnight(next)?, tz)
    }

    /// The calendar month containing `now`, as observed in `tz`.
    pub fn current_month<Z>(now: DateTime<Utc>, tz: &Z) -> Result<Self>
    where
        Z: TimeZone + fmt::Debug,
    {
        let local = now.with_timezone(tz);
        Self::month(local.year(), local.month(), tz)
    }

    /// The `days` days leading up to `now`. A window reaching past the
    /// earliest representable instant is rejected.
    pub fn last_days(now: DateTime<Utc>, days: u32) -> Result<Self> {
        let start = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .ok_or_else(|| {
                warn!(%now, days, "rejecting window that starts before the representable range");
                QueryError::InvalidInterval {
                    start: format!("{now} - {days} days"),
                    end: now.to_rfc3339(),
                }
            })?;
        Self::new(start, now)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Renders `MM/DD/YYYY HH:mm~MM/DD/YYYY HH:mm` in UTC.
    pub fn to_time_range(&self) -> String {
        format!(
            "{}{}{}",
            self.start.format(TIME_RANGE_FORMAT),
            TIME_RANGE_SEPARATOR,
            self.end.format(TIME_RANGE_FORMAT)
        )
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_time_range())
    }
}

/// Maps a wall-clock time in `tz` to its UTC instant. Ambiguous times (the
/// repeated hour when clocks go back) resolve to the earlier instant.
pub fn localize<Z>(naive: NaiveDateTime, tz: &Z) -> Result<DateTime<Utc>>
where
    Z: TimeZone + fmt::Debug,
{
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(QueryError::NonexistentLocalTime {
            time: naive.to_string(),
            zone: format!("{tz:?}"),
        }),
    }
}

fn default_zone() -> String {
    "UTC".to_string()
}

/// Serialized forms accepted for an [`Interval`]: an explicit pair of
/// RFC 3339 instants (any offset, written back in UTC), or a calendar month
/// in a named zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntervalSpec {
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Month {
        year: i32,
        month: u32,
        #[serde(rename = "timeZone", default = "default_zone")]
        time_zone: String,
    },
}

impl TryFrom<IntervalSpec> for Interval {
    type Error = QueryError;

    fn try_from(spec: IntervalSpec) -> Result<Self> {
        match spec {
            IntervalSpec::Range { start, end } => Interval::new(start, end),
            IntervalSpec::Month {
                year,
                month,
                time_zone,
            } => Interval::month(year, month, &resolve_time_zone(&time_zone)?),
        }
    }
}

impl From<Interval> for IntervalSpec {
    fn from(interval: Interval) -> Self {
        IntervalSpec::Range {
            start: interval.start,
            end: interval.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn january_in_utc() {
        let interval = Interval::month(2018, 1, &Utc).unwrap();
        assert_eq!(interval.start(), utc(2018, 1, 1, 0, 0));
        assert_eq!(interval.end(), utc(2018, 2, 1, 0, 0));
        assert_eq!(interval.to_time_range(), "01/01/2018 00:00~02/01/2018 00:00");
    }

    #[test]
    fn january_in_budapest_shifts_to_utc() {
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        let interval = Interval::month(2018, 1, &budapest).unwrap();
        assert_eq!(interval.to_time_range(), "12/31/2017 23:00~01/31/2018 23:00");
    }

    #[test]
    fn summer_month_uses_daylight_offset() {
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        let interval = Interval::month(2018, 7, &budapest).unwrap();
        assert_eq!(interval.to_time_range(), "06/30/2018 22:00~07/31/2018 22:00");
    }

    #[test]
    fn december_rolls_into_next_year() {
        let interval = Interval::month(2017, 12, &Utc).unwrap();
        assert_eq!(interval.to_time_range(), "12/01/2017 00:00~01/01/2018 00:00");
    }

    #[test]
    fn fixed_offset_matches_named_zone_in_winter() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        assert_eq!(
            Interval::month(2018, 1, &cet).unwrap(),
            Interval::month(2018, 1, &budapest).unwrap()
        );
    }

    #[test]
    fn rejects_bad_month() {
        assert_eq!(
            Interval::month(2018, 13, &Utc).unwrap_err(),
            QueryError::InvalidMonth {
                year: 2018,
                month: 13
            }
        );
    }

    #[test]
    fn rejects_end_not_after_start() {
        let at = utc(2018, 1, 1, 0, 0);
        assert!(matches!(
            Interval::new(at, at),
            Err(QueryError::InvalidInterval { .. })
        ));
        assert!(Interval::new(utc(2018, 2, 1, 0, 0), at).is_err());
    }

    #[test]
    fn unknown_zone_is_not_defaulted() {
        let err = resolve_time_zone("Mars/Olympus_Mons").unwrap_err();
        assert_eq!(err, QueryError::UnknownTimeZone("Mars/Olympus_Mons".into()));
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        let gap = NaiveDate::from_ymd_opt(2018, 3, 25)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let later = gap + Duration::hours(2);
        let err = Interval::from_local(gap, later, &budapest).unwrap_err();
        assert!(err.is_time_zone_failure());
    }

    #[test]
    fn repeated_local_time_takes_earlier_instant() {
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        let repeated = NaiveDate::from_ymd_opt(2018, 10, 28)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        let interval =
            Interval::from_local(repeated, repeated + Duration::hours(3), &budapest).unwrap();
        assert_eq!(interval.start(), utc(2018, 10, 28, 0, 30));
    }

    #[test]
    fn current_month_follows_zone() {
        // 23:30 UTC on Jan 31 is already February in Budapest.
        let now = utc(2018, 1, 31, 23, 30);
        let budapest = resolve_time_zone("Europe/Budapest").unwrap();
        let interval = Interval::current_month(now, &budapest).unwrap();
        assert_eq!(interval.to_time_range(), "01/31/2018 23:00~02/28/2018 23:00");

        let in_utc = Interval::current_month(now, &Utc).unwrap();
        assert_eq!(in_utc.to_time_range(), "01/01/2018 00:00~02/01/2018 00:00");
    }

    #[test]
    fn last_days_window() {
        let now = utc(2018, 1, 8, 12, 0);
        let interval = Interval::last_days(now, 7).unwrap();
        assert_eq!(interval.to_time_range(), "01/01/2018 12:00~01/08/2018 12:00");
        assert_eq!(interval.duration(), Duration::days(7));
        assert!(Interval::last_days(now, 0).is_err());
    }

    #[test]
    fn last_days_before_representable_range_is_an_error() {
        let now = utc(2018, 1, 8, 12, 0);
        assert!(matches!(
            Interval::last_days(now, u32::MAX),
            Err(QueryError::InvalidInterval { .. })
        ));
        assert!(matches!(
            Interval::last_days(DateTime::<Utc>::MIN_UTC, 1),
            Err(QueryError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn deserializes_month_and_range_forms() {
        let month: Interval = serde_json::from_value(serde_json::json!({
            "year": 2018,
            "month": 1,
            "timeZone": "Europe/Budapest"
        }))
        .unwrap();
        assert_eq!(month.to_time_range(), "12/31/2017 23:00~01/31/2018 23:00");

        let range: Interval = serde_json::from_value(serde_json::json!({
            "start": "2018-01-01T01:00:00+01:00",
            "end": "2018-01-02T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(range.to_time_range(), "01/01/2018 00:00~01/02/2018 00:00");
    }

    #[test]
    fn serialized_interval_reads_back() {
        let interval = Interval::month(2018, 1, &Utc).unwrap();
        let json = serde_json::to_value(interval).unwrap();
        assert_eq!(json["start"], "2018-01-01T00:00:00Z");
        let decoded: Interval = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, interval);
    }

    #[test]
    fn spec_resolution_keeps_zone_errors_typed() {
        let spec = IntervalSpec::Month {
            year: 2018,
            month: 1,
            time_zone: "Europe/Atlantis".into(),
        };
        assert_eq!(
            Interval::try_from(spec).unwrap_err(),
            QueryError::UnknownTimeZone("Europe/Atlantis".into())
        );
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let result: std::result::Result<Interval, _> = serde_json::from_value(serde_json::json!({
            "start": "2018-02-01T00:00:00Z",
            "end": "2018-01-01T00:00:00Z"
        }));
        assert!(result.is_err());
    }
}
