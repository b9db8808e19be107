//! # walkdump-logging
//!
//! Diagnostic logging for walkdump.
//!
//! Dumps are written to stdout, so every diagnostic goes to stderr through
//! `tracing`. `RUST_LOG` takes precedence over the level passed in.
//!
//! ## Log Formats
//!
//! - `Pretty` - Human-readable output
//! - `Json` - Structured JSON lines
//! - `Compact` - Minimal text output

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{fmt as layer_fmt, prelude::*, EnvFilter};

/// Output format for diagnostic logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Compact => write!(f, "compact"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Initialize tracing for the application
pub fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    layer_fmt::layer()
                        .json()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(layer_fmt::layer().with_target(false).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    layer_fmt::layer()
                        .compact()
                        .with_target(false)
                        .without_time()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}
