mod interval;
mod query;
mod sort;
mod spec;

pub use interval::{
    localize, resolve_time_zone, Interval, IntervalSpec, TIME_RANGE_FORMAT, TIME_RANGE_SEPARATOR,
};
pub use query::{Query, QueryBuilder, METRIC_SEPARATOR};
pub use sort::SortOrder;
pub use spec::QuerySpec;
