use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::Serialize;

use crate::error::ReaderError;

/// Header timestamp of a walker dump, exactly as the platform logger wrote it.
///
/// Always `YYYY-MM-DDTHH:MM:SS.ffffff`. Two timestamps are equal only when their
/// text is identical; there is no normalisation or fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Timestamp(String);

fn timestamp_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}$").expect("valid timestamp regex")
    })
}

impl Timestamp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Timestamp {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !timestamp_regex().is_match(s) {
            return Err(ReaderError::InvalidTimestamp(s.to_string()));
        }
        // The shape check above lets through things like month 13.
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|_| ReaderError::InvalidTimestamp(s.to_string()))?;
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dump header found while scanning the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStart {
    pub timestamp: Timestamp,
    /// Random tag the walker generates per run, e.g. `1A2B3C4D`.
    pub session_id: String,
    pub version: String,
    /// Byte offset of the first byte of the header line.
    pub offset: u64,
}

/// Indentation used to re-render a dump.
///
/// A body line at indent level `n` is prefixed with `base_indent` followed by
/// `n` copies of `level_indent`, reproducing the nesting of the original walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStyle {
    pub base_indent: String,
    pub level_indent: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            base_indent: "     ".to_string(),
            level_indent: "|    ".to_string(),
        }
    }
}

impl RenderStyle {
    pub fn indent(&self, level: usize) -> String {
        let mut indent = String::with_capacity(
            self.base_indent
                .len()
                .saturating_add(self.level_indent.len().saturating_mul(level)),
        );
        indent.push_str(&self.base_indent);
        for _ in 0..level {
            indent.push_str(&self.level_indent);
        }
        indent
    }
}
