use bytes::Bytes;
use bytes::BytesMut;

/// Incremental splitter for newline-delimited byte streams.
///
/// Transport reads slice the stream at arbitrary points: a frame, or even a
/// single multi-byte character, can straddle two chunks. Bytes are buffered
/// until a `\n` arrives and only whole lines are handed out, so callers never
/// see a partially received frame no matter how the transport chunked it.
///
/// One buffer serves one streaming session; start a fresh one per session.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: BytesMut,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one chunk as read from the transport.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Removes and returns the next complete line, without its terminator.
    ///
    /// A trailing `\r` is stripped so CRLF framing parses the same as LF.
    /// Returns `None` until a full line is buffered; the partial tail stays
    /// put and is completed by later `push` calls.
    pub fn next_line(&mut self) -> Option<Bytes> {
        let newline = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line = self.buf.split_to(newline + 1);
        line.truncate(newline);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(line.freeze())
    }

    /// Number of buffered bytes still waiting for their newline.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
