//! Comparing two dumps.

use std::fmt::Write as _;
use std::io::{BufRead, BufWriter, Read, Seek};
use std::path::Path;

use similar::TextDiff;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{ReaderError, Result};
use crate::extract::extract;
use crate::locate::locate;
use crate::types::{RenderStyle, SessionStart, Timestamp};

const CONTEXT_LINES: usize = 3;

/// Unified diff between the dumps taken at `old` and `new`.
///
/// Both dumps are located before anything is extracted, so a missing timestamp
/// produces no output at all. Each side is rendered into its own scratch file;
/// the files are removed when this returns, whether or not it succeeded.
/// Identical dumps give an empty string.
pub fn diff_sessions<R: BufRead + Seek>(
    stream: &mut R,
    old: &Timestamp,
    new: &Timestamp,
    style: &RenderStyle,
) -> Result<String> {
    diff_sessions_in(stream, old, new, style, &std::env::temp_dir())
}

/// [`diff_sessions`] with the scratch files placed in `scratch_dir`.
pub fn diff_sessions_in<R: BufRead + Seek>(
    stream: &mut R,
    old: &Timestamp,
    new: &Timestamp,
    style: &RenderStyle,
    scratch_dir: &Path,
) -> Result<String> {
    let mut missing = Vec::new();
    let old_session = find(stream, old, &mut missing)?;
    let new_session = find(stream, new, &mut missing)?;
    let (Some(old_session), Some(new_session)) = (old_session, new_session) else {
        return Err(ReaderError::DiffSessionsMissing(missing));
    };

    let old_scratch = render_to_scratch(stream, &old_session, style, scratch_dir)?;
    let new_scratch = render_to_scratch(stream, &new_session, style, scratch_dir)?;

    let old_text = read_scratch(&old_scratch)?;
    let new_text = read_scratch(&new_scratch)?;

    Ok(unified_diff(&old_text, &new_text, old.as_str(), new.as_str()))
}

fn find<R: BufRead + Seek>(
    stream: &mut R,
    timestamp: &Timestamp,
    missing: &mut Vec<Timestamp>,
) -> Result<Option<SessionStart>> {
    match locate(stream, Some(timestamp)) {
        Ok(session) => Ok(Some(session)),
        Err(ReaderError::TimestampNotFound(timestamp)) => {
            missing.push(timestamp);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn render_to_scratch<R: BufRead + Seek>(
    stream: &mut R,
    session: &SessionStart,
    style: &RenderStyle,
    scratch_dir: &Path,
) -> Result<NamedTempFile> {
    let mut scratch = tempfile::Builder::new()
        .prefix("walkdump-")
        .suffix(".txt")
        .tempfile_in(scratch_dir)?;
    let summary = extract(stream, session, style, BufWriter::new(scratch.as_file_mut()))?;
    debug!(
        path = %scratch.path().display(),
        lines = summary.lines_written,
        "Rendered dump to scratch file"
    );
    Ok(scratch)
}

fn read_scratch(scratch: &NamedTempFile) -> Result<String> {
    let mut text = String::new();
    scratch.reopen()?.read_to_string(&mut text)?;
    Ok(text)
}

fn unified_diff(old: &str, new: &str, old_name: &str, new_name: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified.context_radius(CONTEXT_LINES);

    // Writing into a String cannot fail.
    let mut out = String::new();
    for hunk in unified.iter_hunks() {
        if out.is_empty() {
            let _ = writeln!(out, "--- {}", old_name);
            let _ = writeln!(out, "+++ {}", new_name);
        }
        let _ = write!(out, "{}", hunk);
    }
    out
}
