use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Sort direction requested for the report rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[serde(rename = "ASC", alias = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "DESC", alias = "desc", alias = "descending")]
    Descending,
}

impl SortOrder {
    /// Short code sent on the wire.
    pub fn as_code(self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(QueryError::UnknownSortOrder(value.to_string())),
        }
    }
}
