use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::config::ClientConfig;
use crate::errors::{Result, StatQueryError};

const FALLBACK_LEVEL: &str = "info";

/// Installs the process-wide subscriber.
///
/// Events go to stderr: stdout is reserved for the normalized parameters the
/// CLI prints. `RUST_LOG` wins when set, then `level`, then `info`.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = filter_for(rust_log.as_deref(), level)?;

    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init()
        .map_err(|err| StatQueryError::GeneralError(err.to_string()))?;

    Ok(())
}

/// [`init_tracing`] with the level taken from `override_level`, falling
/// back to `STATQUERY_LOG` as loaded into `config`.
pub fn init_for_client(config: &ClientConfig, override_level: Option<&str>) -> Result<()> {
    init_tracing(Some(override_level.unwrap_or(&config.log_level)))
}

/// A `RUST_LOG` value that does not parse is ignored; a bad explicit level is
/// reported as a configuration error rather than silently widened.
fn filter_for(rust_log: Option<&str>, level: Option<&str>) -> Result<EnvFilter> {
    if let Some(filter) = rust_log.and_then(|directives| EnvFilter::try_new(directives).ok()) {
        return Ok(filter);
    }

    let level = level
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(FALLBACK_LEVEL);
    EnvFilter::try_new(level)
        .map_err(|err| StatQueryError::ConfigError(format!("invalid log level {level:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn max_level(rust_log: Option<&str>, level: Option<&str>) -> Option<LevelFilter> {
        filter_for(rust_log, level).unwrap().max_level_hint()
    }

    #[test]
    fn rust_log_takes_precedence() {
        assert_eq!(max_level(Some("trace"), Some("warn")), Some(LevelFilter::TRACE));
    }

    #[test]
    fn falls_back_to_level_then_info() {
        assert_eq!(max_level(None, Some("debug")), Some(LevelFilter::DEBUG));
        assert_eq!(
            max_level(Some("statquery=loud"), Some("warn")),
            Some(LevelFilter::WARN)
        );
        assert_eq!(max_level(None, Some("  ")), Some(LevelFilter::INFO));
        assert_eq!(max_level(None, None), Some(LevelFilter::INFO));
    }

    #[test]
    fn malformed_level_is_a_config_error() {
        let err = filter_for(None, Some("statquery=loud")).unwrap_err();
        assert!(matches!(err, StatQueryError::ConfigError(_)));
    }
}
