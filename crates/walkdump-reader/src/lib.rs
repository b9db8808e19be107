//! # walkdump-reader
//!
//! Reads `object_walker` dumps back out of an automation log.
//!
//! The walker writes its output line by line through the platform logger, so a
//! dump ends up spread across a shared, append-only log file and interleaved
//! with everything else the workers are logging, including other walker runs.
//! This crate recovers one dump at a time from that stream.
//!
//! ## Key Types
//!
//! - [`LogLine`] - Classification of a single log line
//! - [`SessionStart`] - A dump header found in the log, with its byte offset
//! - [`Timestamp`] - The fixed-format header timestamp used to select a dump
//! - [`RenderStyle`] - Indentation used when re-rendering a dump
//! - [`ReaderError`] - Errors surfaced to callers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::fs::File;
//! use std::io::{self, BufReader};
//! use walkdump_reader::{extract, locate, RenderStyle};
//!
//! let mut log = BufReader::new(File::open("automation.log")?);
//! let session = locate(&mut log, None)?;
//! extract(&mut log, &session, &RenderStyle::default(), io::stdout().lock())?;
//! ```

pub mod classify;
mod cursor;
pub mod diff;
pub mod error;
pub mod extract;
pub mod locate;
pub mod types;

pub use classify::{classify, LogLine, MAX_INDENT_LEVEL};
pub use diff::{diff_sessions, diff_sessions_in};
pub use error::ReaderError;
pub use extract::{extract, ExtractSummary};
pub use locate::{list_sessions, locate};
pub use types::{RenderStyle, SessionStart, Timestamp};

/// Default location of the automation log on an appliance.
pub const DEFAULT_LOG_FILE: &str = "/var/www/miq/vmdb/log/automation.log";

/// Name the walker uses for itself in listings.
pub const PRODUCER_NAME: &str = "object_walker";
