use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::http::header::canonical_header_key;
use crate::http::request::{HTTP_VERSION, Request};

/// HTTP status codes the server emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
        }
    }

    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
        }
    }
}

/// A response waiting to be written.
///
/// The body is never held in memory: when `file_path` is set the writer
/// streams `body_len` bytes of that file after the headers.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub version: String,
    /// Headers keyed by canonical name
    pub headers: HashMap<String, String>,
    /// The request this answers. None for 400s.
    pub request: Option<Request>,
    pub file_path: Option<PathBuf>,
    /// Bytes promised by Content-Length
    pub body_len: u64,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// Header names are canonicalized on insert, so `header("content-type", ..)`
/// and `header("Content-Type", ..)` address the same entry.
pub struct ResponseBuilder {
    status: StatusCode,
    headers: HashMap<String, String>,
    request: Option<Request>,
    file_path: Option<PathBuf>,
    body_len: u64,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            request: None,
            file_path: None,
            body_len: 0,
        }
    }

    /// Adds or replaces a header.
    pub fn header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.insert(canonical_header_key(key), value.into());
        self
    }

    /// Stamps a Date header with the given time.
    pub fn date(self, at: SystemTime) -> Self {
        self.header("Date", httpdate::fmt_http_date(at))
    }

    /// Attaches the originating request, adding `Connection: close` if it
    /// asked for one.
    pub fn request(mut self, request: Request) -> Self {
        if request.close {
            self = self.header("Connection", "close");
        }
        self.request = Some(request);
        self
    }

    /// Serves `len` bytes of the file at `path` as the body and sets
    /// Content-Length to match.
    pub fn file(mut self, path: impl Into<PathBuf>, len: u64) -> Self {
        self.file_path = Some(path.into());
        self.body_len = len;
        self.header("Content-Length", len.to_string())
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            version: HTTP_VERSION.to_string(),
            headers: self.headers,
            request: self.request,
            file_path: self.file_path,
            body_len: self.body_len,
        }
    }
}

impl Response {
    /// A 400 that isn't tied to any request and always closes the connection.
    pub fn bad_request() -> Self {
        ResponseBuilder::new(StatusCode::BadRequest)
            .date(SystemTime::now())
            .header("Connection", "close")
            .build()
    }

    /// A bodiless 404 for a request that resolved to nothing.
    pub fn not_found(request: Request) -> Self {
        ResponseBuilder::new(StatusCode::NotFound)
            .date(SystemTime::now())
            .request(request)
            .build()
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(key))
            .map(|v| v.as_str())
    }

    /// Whether the connection must be closed once this response is written.
    pub fn closes_connection(&self) -> bool {
        match &self.request {
            Some(req) => req.close,
            None => self.status == StatusCode::BadRequest,
        }
    }
}
