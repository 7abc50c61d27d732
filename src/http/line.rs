use std::io::BufRead;

use crate::http::parser::ParseError;

/// Reads CRLF-terminated lines from a buffered source.
///
/// Tracks how many bytes have been consumed so callers can tell an empty
/// stream apart from one that failed part-way through a request.
pub struct LineScanner<R> {
    inner: R,
    bytes_read: usize,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Returns the next line with its CRLF stripped.
    ///
    /// Never consumes past the `\n` of the terminator. A stream that ends
    /// before `\n` yields [`ParseError::UnexpectedEof`]; a `\n` not preceded
    /// by `\r` yields [`ParseError::MalformedLine`]. Reader failures keep
    /// their [`std::io::ErrorKind`].
    pub fn next_line(&mut self) -> Result<String, ParseError> {
        let mut raw = Vec::new();
        let n = self
            .inner
            .read_until(b'\n', &mut raw)
            .map_err(|e| ParseError::Io(e.kind()))?;
        self.bytes_read += n;

        if !raw.ends_with(b"\n") {
            return Err(ParseError::UnexpectedEof);
        }
        if !raw.ends_with(b"\r\n") {
            return Err(ParseError::MalformedLine);
        }

        raw.truncate(raw.len() - 2);
        String::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8)
    }

    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }
}
