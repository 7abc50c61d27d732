use std::fmt;
use std::io::{self, BufRead};

use crate::http::line::LineScanner;
use crate::http::request::{Request, RequestHead};

/// Why a request could not be read.
///
/// Every variant is answered with 400 and a closed connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The stream ended before a complete line
    UnexpectedEof,
    /// A line ended in a bare '\n'
    MalformedLine,
    /// The underlying reader failed
    Io(io::ErrorKind),
    InvalidUtf8,
    InvalidRequestLine(String),
    InvalidHeader(String),
    /// Anything but GET
    UnsupportedMethod(String),
    InvalidTarget(String),
    UnsupportedVersion(String),
    MissingHost,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof => write!(f, "stream ended before end of line"),
            ParseError::MalformedLine => write!(f, "line not terminated by CRLF"),
            ParseError::Io(kind) => write!(f, "read failed: {}", kind),
            ParseError::InvalidUtf8 => write!(f, "request is not valid UTF-8"),
            ParseError::InvalidRequestLine(line) => write!(f, "bad request line {:?}", line),
            ParseError::InvalidHeader(line) => write!(f, "bad header {:?}", line),
            ParseError::UnsupportedMethod(m) => write!(f, "method not allowed {:?}", m),
            ParseError::InvalidTarget(t) => write!(f, "bad target {:?}", t),
            ParseError::UnsupportedVersion(v) => write!(f, "unsupported version {:?}", v),
            ParseError::MissingHost => write!(f, "missing Host header"),
        }
    }
}

impl std::error::Error for ParseError {}

/// A failed [`read_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    /// Whether any bytes were consumed before the failure. False means the
    /// peer sent nothing and the connection can be closed silently.
    pub bytes_received: bool,
    pub kind: ParseError,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Reads one request: the request line, header lines up to the first empty
/// line, then validation.
pub fn read_request<R: BufRead>(reader: R) -> Result<Request, ReadError> {
    let mut scanner = LineScanner::new(reader);

    read_head(&mut scanner)
        .and_then(RequestHead::validate)
        .map_err(|kind| ReadError {
            bytes_received: scanner.bytes_read() > 0,
            kind,
        })
}

fn read_head<R: BufRead>(scanner: &mut LineScanner<R>) -> Result<RequestHead, ParseError> {
    let mut head = RequestHead::default();

    let init_line = scanner.next_line()?;
    head.parse_init_line(&init_line)?;

    loop {
        let line = scanner.next_line()?;
        if line.is_empty() {
            break;
        }
        head.parse_header_line(&line)?;
    }

    Ok(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_simple_get() {
        let req = read_request(Cursor::new(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")).unwrap();

        assert_eq!(req.target, "/");
        assert_eq!(req.host, "example.com");
        assert!(!req.close);
    }

    #[test]
    fn nothing_read_is_reported() {
        let err = read_request(Cursor::new(b"")).unwrap_err();
        assert!(!err.bytes_received);
        assert_eq!(err.kind, ParseError::UnexpectedEof);
    }
}
