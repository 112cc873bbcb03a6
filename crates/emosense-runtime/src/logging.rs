//! Tracing subscriber setup

use emosense_core::{EmoResult, EmoSenseError};
use tracing_subscriber::EnvFilter;

/// Log line format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(name: &str) -> EmoResult<Self> {
        match name {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(EmoSenseError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Install the global subscriber. Filter comes from `RUST_LOG`, default `info`.
pub fn init_logging(format: LogFormat) -> EmoResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| EmoSenseError::Config(format!("logging already initialized: {e}")))
}
