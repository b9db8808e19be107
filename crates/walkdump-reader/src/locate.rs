//! Finding dump headers in the log.
//!
//! The log is assumed to be appended in wall-clock order, so the last header in
//! the file is the most recent dump.

use std::io::{BufRead, Seek, SeekFrom};
use std::ops::ControlFlow;

use tracing::debug;

use crate::classify::{classify, LogLine};
use crate::cursor::LineCursor;
use crate::error::{ReaderError, Result};
use crate::types::{SessionStart, Timestamp};

/// List every dump header in the log, in file order.
pub fn list_sessions<R: BufRead + Seek>(stream: &mut R) -> Result<Vec<SessionStart>> {
    let mut sessions = Vec::new();
    scan_starts(stream, |start| {
        sessions.push(start);
        ControlFlow::Continue(())
    })?;
    debug!(count = sessions.len(), "Listed object_walker dumps");
    Ok(sessions)
}

/// Find the header of the dump to extract.
///
/// Without a timestamp this is the last header in the log. With one, it is the
/// first header whose timestamp is textually identical; scanning stops there.
/// A timestamp that matches no header is an error, never a fallback to the
/// latest dump.
pub fn locate<R: BufRead + Seek>(
    stream: &mut R,
    requested: Option<&Timestamp>,
) -> Result<SessionStart> {
    let mut found: Option<SessionStart> = None;

    scan_starts(stream, |start| match requested {
        Some(timestamp) if start.timestamp == *timestamp => {
            found = Some(start);
            ControlFlow::Break(())
        }
        Some(_) => ControlFlow::Continue(()),
        None => {
            found = Some(start);
            ControlFlow::Continue(())
        }
    })?;

    match (found, requested) {
        (Some(start), _) => {
            debug!(
                timestamp = %start.timestamp,
                session_id = %start.session_id,
                offset = start.offset,
                "Located object_walker dump"
            );
            Ok(start)
        }
        (None, Some(timestamp)) => Err(ReaderError::TimestampNotFound(timestamp.clone())),
        (None, None) => Err(ReaderError::NoSessions),
    }
}

/// Rewind and feed every header to `visit` until it breaks or the log ends.
fn scan_starts<R, F>(stream: &mut R, mut visit: F) -> Result<()>
where
    R: BufRead + Seek,
    F: FnMut(SessionStart) -> ControlFlow<()>,
{
    stream.seek(SeekFrom::Start(0))?;
    let mut cursor = LineCursor::new(stream, 0);

    while let Some((offset, line)) = cursor.next_line()? {
        let Some(LogLine::Start {
            timestamp,
            session_id,
            version,
            ..
        }) = classify(&line)
        else {
            continue;
        };

        let timestamp: Timestamp = match timestamp.parse() {
            Ok(timestamp) => timestamp,
            Err(e) => {
                debug!(offset, "Skipping malformed dump header: {}", e);
                continue;
            }
        };

        let start = SessionStart {
            timestamp,
            session_id: session_id.to_string(),
            version: version.to_string(),
            offset,
        };
        if visit(start).is_break() {
            break;
        }
    }

    Ok(())
}
