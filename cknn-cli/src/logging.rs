//! Structured logging for the `cknn` binary.
//!
//! Diagnostics go to stderr so the edge list on stdout stays machine
//! readable. `RUST_LOG` selects verbosity (default `info`) and
//! `CKNN_LOG_FORMAT` selects `human` or `json` output.

use std::{env, io, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "CKNN_LOG_FORMAT";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Output format of the installed subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source,
            }),
        }
    }
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("environment variable `{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        name: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("unsupported log format `{provided}`; expected `human` or `json`")]
    UnsupportedFormat { provided: String },
}

/// Installs the global subscriber once and returns the format in use.
///
/// Later calls return the format chosen by the first. When another
/// subscriber already owns the global slot it is left in place.
///
/// # Errors
/// Returns [`LoggingError`] when `CKNN_LOG_FORMAT` is unreadable or names
/// an unknown format.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }
    let format = LogFormat::from_env()?;
    Ok(*INSTALLED.get_or_init(|| {
        install(format);
        format
    }))
}

fn install(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    };

    // Both calls fail only when a logger is already installed; keep it.
    if LogTracer::init().is_err() {
        tracing::debug!("log facade already bridged");
    }
    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("HUMAN", LogFormat::Human)]
    #[case(" json ", LogFormat::Json)]
    fn known_formats_parse(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>().expect("known format"), expected);
    }

    #[test]
    fn unknown_format_is_named_in_the_error() {
        let err = "xml".parse::<LogFormat>().expect_err("xml is not supported");
        assert!(matches!(err, LoggingError::UnsupportedFormat { provided } if provided == "xml"));
    }

    #[test]
    fn repeated_initialisation_keeps_the_first_format() {
        let first = init_logging().expect("logging must initialise");
        assert_eq!(init_logging().expect("second call is a no-op"), first);
    }
}
