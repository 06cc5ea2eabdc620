//! Core shared library for the statquery client.
//!
//! Holds what the other crates lean on but which is not part of the query
//! model itself: the canonical error type, configuration loading from the
//! environment, logging setup and JSON helpers.

pub mod config;
pub mod errors;
pub mod logging;
pub mod serde_utils;

pub use config::{ClientConfig, Environment};
pub use errors::{ConfigError, Result as CoreResult, StatQueryError};
