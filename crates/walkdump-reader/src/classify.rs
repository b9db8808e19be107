//! Classification of individual automation log lines.
//!
//! The walker's lines reach the log through the platform logger and look like
//!
//! ```text
//! [----] I, [2014-09-18T09:44:27.146812 #2483:3fe8d6c33e64]  INFO -- : <AEMethod object_walker> object_walker#1A2B3C4D:   Object Walker 1.9 Starting
//! [----] I, [2014-09-18T09:44:27.201553 #2483:3fe8d6c33e64]  INFO -- : <AEMethod object_walker> object_walker#1A2B3C4D:[1] $evm.root['vm'].name = web01   (type: String)
//! [----] E, [2014-09-18T09:44:27.201997 #2483:3fe8d6c33e64] ERROR -- : <AEMethod object_walker> object_walker#1A2B3C4D $evm.root['miq_server'] doesn't exist
//! [----] I, [2014-09-18T09:44:29.000120 #2483:3fe8d6c33e64]  INFO -- : <AEMethod object_walker> object_walker#1A2B3C4D:   Object Walker Complete
//! ```
//!
//! Values containing newlines spill onto physical lines with no logger prefix
//! at all; those are reported as [`LogLine::Continuation`], blank ones included.
//! Telling them apart from other traffic relies on every logger line starting
//! with `[`.

use std::sync::OnceLock;

use regex::Regex;

/// Deepest nesting the walker is expected to reach. Deeper levels are treated
/// as malformed lines.
pub const MAX_INDENT_LEVEL: usize = 256;

/// What a single log line turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    /// Dump header written when a walker run starts.
    Start {
        timestamp: &'a str,
        session_id: &'a str,
        version: &'a str,
        output: &'a str,
    },
    /// A line of dump output. Error-level lines carry no indent level and may
    /// lack the session tag.
    Body {
        session_id: Option<&'a str>,
        indent_level: Option<usize>,
        output: &'a str,
    },
    /// Overflow of a multi-line value from the previous line.
    Continuation { text: &'a str },
    /// Trailer written when a walker run finishes.
    End {
        session_id: &'a str,
        output: &'a str,
    },
}

fn start_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(
            r"----\] I, \[(?P<timestamp>\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{6}) .*(?i:object_?walker)#(?P<session_id>[0-9A-Za-z]+):\s+(?P<output>Object Walker (?P<version>\d+\.\d+(?:-\d+)?) Starting)",
        )
        .expect("valid start regex")
    })
}

fn body_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(
            r"AEMethod (?i:object_?walker)>.*?(?i:object_?walker)#(?P<session_id>[0-9A-Za-z]+):\[(?P<indent_level>\d+)\] ?(?P<output>.*)$",
        )
        .expect("valid body regex")
    })
}

fn error_body_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(
            r"ERROR.*AEMethod (?i:object_?walker)>\s*(?:(?i:object_?walker)(?:#(?P<session_id>[0-9A-Za-z]+))?\s)?\s*(?P<output>.*)$",
        )
        .expect("valid error body regex")
    })
}

fn end_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        Regex::new(r"(?i:object_?walker)#(?P<session_id>[0-9A-Za-z]+):\s+(?P<output>Object Walker Complete)")
            .expect("valid end regex")
    })
}

/// Classify one line of the log. Returns `None` for unrelated traffic.
///
/// Patterns are tried in priority order: start, body, end.
pub fn classify(line: &str) -> Option<LogLine<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        // Blank lines only occur inside multi-line values.
        return Some(LogLine::Continuation { text: line });
    }

    if let Some(caps) = start_regex().captures(line) {
        return Some(LogLine::Start {
            timestamp: caps.name("timestamp")?.as_str(),
            session_id: caps.name("session_id")?.as_str(),
            version: caps.name("version")?.as_str(),
            output: caps.name("output")?.as_str(),
        });
    }

    if let Some(body) = classify_body(line) {
        return Some(body);
    }

    if let Some(caps) = end_regex().captures(line) {
        return Some(LogLine::End {
            session_id: caps.name("session_id")?.as_str(),
            output: caps.name("output")?.as_str(),
        });
    }

    None
}

fn classify_body(line: &str) -> Option<LogLine<'_>> {
    if let Some(caps) = body_regex().captures(line) {
        let indent_level = caps
            .name("indent_level")?
            .as_str()
            .parse::<usize>()
            .ok()
            .filter(|level| *level <= MAX_INDENT_LEVEL)?;
        return Some(LogLine::Body {
            session_id: caps.name("session_id").map(|m| m.as_str()),
            indent_level: Some(indent_level),
            output: caps.name("output")?.as_str(),
        });
    }

    if let Some(caps) = error_body_regex().captures(line) {
        return Some(LogLine::Body {
            session_id: caps.name("session_id").map(|m| m.as_str()),
            indent_level: None,
            output: caps.name("output")?.as_str(),
        });
    }

    if !line.starts_with('[') {
        return Some(LogLine::Continuation { text: line });
    }

    None
}
