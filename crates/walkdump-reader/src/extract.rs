//! Re-rendering a single dump from the log.

use std::io::{BufRead, Seek, SeekFrom, Write};

use tracing::{debug, warn};

use crate::classify::{classify, LogLine};
use crate::cursor::LineCursor;
use crate::error::Result;
use crate::types::{RenderStyle, SessionStart};

/// Outcome of one extraction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSummary {
    pub lines_written: usize,
    /// False when the log ended before the dump's completion line.
    pub complete: bool,
}

/// Write the dump that starts at `session` to `sink`.
///
/// Reads forward from the header until the completion line carrying the same
/// session tag. Lines tagged with any other session are skipped, as are
/// continuation lines that follow them. A log that ends early is not an error;
/// whatever was found is written and the summary reports it as incomplete.
pub fn extract<R, W>(
    stream: &mut R,
    session: &SessionStart,
    style: &RenderStyle,
    mut sink: W,
) -> Result<ExtractSummary>
where
    R: BufRead + Seek,
    W: Write,
{
    stream.seek(SeekFrom::Start(session.offset))?;
    let mut cursor = LineCursor::new(stream, session.offset);

    let target = session.session_id.as_str();
    let mut indent_level = 0usize;
    // Whether the last recognised line belonged to this dump; decides where
    // continuation lines go.
    let mut attached = false;
    let mut lines_written = 0usize;

    while let Some((offset, line)) = cursor.next_line()? {
        match classify(&line) {
            Some(LogLine::Start {
                session_id, output, ..
            }) => {
                attached = session_id == target;
                if attached {
                    writeln!(sink, "{}", output)?;
                    lines_written += 1;
                }
            }
            Some(LogLine::Body {
                session_id,
                indent_level: level,
                output,
            }) => {
                attached = session_id.map_or(true, |id| id == target);
                if attached {
                    if let Some(level) = level {
                        indent_level = level;
                    }
                    writeln!(sink, "{}{}", style.indent(indent_level), output)?;
                    lines_written += 1;
                }
            }
            Some(LogLine::Continuation { text }) => {
                if attached {
                    writeln!(sink, "{}{}", style.indent(indent_level), text)?;
                    lines_written += 1;
                }
            }
            Some(LogLine::End { session_id, output }) => {
                if session_id == target {
                    writeln!(sink, "{}", output)?;
                    lines_written += 1;
                    sink.flush()?;
                    debug!(
                        session_id = target,
                        lines = lines_written,
                        end_offset = offset,
                        "Extracted object_walker dump"
                    );
                    return Ok(ExtractSummary {
                        lines_written,
                        complete: true,
                    });
                }
                attached = false;
            }
            None => attached = false,
        }
    }

    sink.flush()?;
    warn!(
        timestamp = %session.timestamp,
        session_id = target,
        lines = lines_written,
        "Log ended before the dump completed; output is partial"
    );
    Ok(ExtractSummary {
        lines_written,
        complete: false,
    })
}
