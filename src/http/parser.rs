//! Incremental parser for the response header block.
//!
//! The header block arrives in arbitrary fragments. [`HeadParser::feed`]
//! consumes whatever is currently in the receive buffer, carrying an
//! unfinished line (including a CR whose LF has not arrived yet) over to the
//! next call. It stops right after the blank line that ends the block so any
//! body bytes stay in the buffer.

use tracing::trace;

use crate::error::{Error, Result};
use crate::http::buffer::ReceiveBuffer;
use crate::http::response::ResponseHead;

/// Upper bound on the size of a response header block.
pub const MAX_HEAD_LEN: usize = 64 * 1024;

const CRLF: &[u8] = b"\r\n";

#[derive(Debug, Default)]
pub struct HeadParser {
    /// Bytes of the line being assembled.
    line: Vec<u8>,
    /// Total header bytes seen so far.
    head_len: usize,
}

impl HeadParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget any partial line. Called at the start of every exchange.
    pub fn reset(&mut self) {
        self.line.clear();
        self.head_len = 0;
    }

    /// `true` when the line carried over ends in a CR whose LF is still due.
    pub fn pending_cr(&self) -> bool {
        self.line.last() == Some(&b'\r')
    }

    /// Consume lines from `buffer` into `head`.
    ///
    /// Returns `Ok(true)` once the terminating blank line has been consumed,
    /// `Ok(false)` if the buffer ran dry first.
    pub fn feed(&mut self, buffer: &mut ReceiveBuffer, head: &mut ResponseHead) -> Result<bool> {
        while !buffer.is_empty() {
            let segment = line_segment(buffer.as_slice(), self.pending_cr());
            self.head_len += segment;
            if self.head_len > MAX_HEAD_LEN {
                return Err(Error::other("response header block too large"));
            }
            self.line.extend_from_slice(&buffer.as_slice()[..segment]);
            buffer.consume(segment);

            if self.line == CRLF {
                self.line.clear();
                return Ok(true);
            }

            if !self.line.ends_with(CRLF) {
                // Only the end of the buffer can leave a line unterminated.
                debug_assert!(buffer.is_empty());
                return Ok(false);
            }

            if self.line.len() < 2 {
                return Err(Error::other("malformed response line"));
            }

            let content = &self.line[..self.line.len() - 2];
            if head.status_line.is_empty() {
                head.status_line = String::from_utf8_lossy(content).into_owned();
                trace!(status_line = %head.status_line, "Status line received");
            } else if let Some((name, value)) = parse_field(content) {
                trace!(name = %name, value = %value, "Response field received");
                head.fields.insert(name, value);
            }
            self.line.clear();
        }

        Ok(false)
    }
}

/// Length of the next line segment at the start of `data`: through the
/// first CRLF, a lone LF completing a carried-over CR, or everything left.
fn line_segment(data: &[u8], pending_cr: bool) -> usize {
    if data.is_empty() {
        return 0;
    }
    if pending_cr && data[0] == b'\n' {
        return 1;
    }
    data.windows(2)
        .position(|w| w == CRLF)
        .map(|i| i + 2)
        .unwrap_or(data.len())
}

/// Split a header line at its first colon into a lower-cased name and a
/// whitespace-trimmed value. Lines without a colon yield `None`.
pub fn parse_field(line: &[u8]) -> Option<(String, String)> {
    let colon = line.iter().position(|&b| b == b':')?;
    let name = String::from_utf8_lossy(&line[..colon]).to_ascii_lowercase();
    let value = String::from_utf8_lossy(line[colon + 1..].trim_ascii()).into_owned();
    Some((name, value))
}
