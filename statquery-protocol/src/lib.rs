//! Query value objects for the statistics API and the normalizer that
//! flattens them into request parameters.
//!
//! ```
//! use chrono::Utc;
//! use statquery_protocol::prelude::*;
//!
//! let interval = Interval::month(2018, 1, &Utc)?;
//! let query = Query::new(["metric1", "metric2"], interval)?.with_sort(SortOrder::Descending);
//! let params = Normalizer::new().normalize(&query);
//!
//! assert_eq!(params.get_str("select"), Some("metric1,metric2"));
//! assert_eq!(params.get_str("timeRange"), Some("01/01/2018 00:00~02/01/2018 00:00"));
//! assert_eq!(params.get_str("sort"), Some("DESC"));
//! # Ok::<(), statquery_protocol::QueryError>(())
//! ```

pub mod error;
pub mod normalize;
pub mod report;

pub use chrono_tz::Tz;
pub use error::{QueryError, Result};

pub mod prelude {
    pub use crate::error::QueryError;
    pub use crate::normalize::{keys, normalize, NormalizedParameters, Normalizer, ParamValue};
    pub use crate::report::{
        resolve_time_zone, Interval, Query, QueryBuilder, QuerySpec, SortOrder,
    };
}
