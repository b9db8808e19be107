//! Line-at-a-time reading with byte offsets.

use std::borrow::Cow;
use std::io::{self, BufRead};

/// Forward-only line reader that knows where each line starts.
///
/// Lines are read as raw bytes and decoded lossily, so stray non-UTF-8 output
/// from other workers cannot throw the offset accounting off.
pub(crate) struct LineCursor<'r, R> {
    reader: &'r mut R,
    buf: Vec<u8>,
    position: u64,
}

impl<'r, R: BufRead> LineCursor<'r, R> {
    /// `position` must be the reader's current offset in the underlying stream.
    pub(crate) fn new(reader: &'r mut R, position: u64) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(512),
            position,
        }
    }

    /// Next line (terminator included) with the offset of its first byte.
    pub(crate) fn next_line(&mut self) -> io::Result<Option<(u64, Cow<'_, str>)>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        let start = self.position;
        self.position += read as u64;
        Ok(Some((start, String::from_utf8_lossy(&self.buf))))
    }
}
