use std::collections::HashMap;

use crate::http::header::canonical_header_key;
use crate::http::parser::ParseError;

/// The only protocol version the server speaks.
pub const HTTP_VERSION: &str = "HTTP/1.1";

/// HTTP request methods the server serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    GET,
}

impl Method {
    /// Parses a method token (case-sensitive).
    ///
    /// ```
    /// # use lantern::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// assert_eq!(Method::from_str("POST"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            _ => None,
        }
    }
}

/// A fully validated request.
///
/// Only [`RequestHead::validate`] produces one, so everything downstream of
/// the parser can rely on a GET for an absolute path with a Host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Request target, always starts with '/'
    pub target: String,
    pub version: String,
    /// Headers other than Host and Connection, keyed by canonical name
    pub headers: HashMap<String, String>,
    pub host: String,
    /// Set by "Connection: close"
    pub close: bool,
}

impl Request {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .get(&canonical_header_key(key))
            .map(|v| v.as_str())
    }
}

/// A request as read off the wire, before validation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub target: String,
    pub version: String,
    pub headers: HashMap<String, String>,
    pub host: String,
    pub close: bool,
}

impl RequestHead {
    /// Splits the request line into method, target and version.
    ///
    /// Fields are separated by single spaces and there must be exactly three.
    pub fn parse_init_line(&mut self, line: &str) -> Result<(), ParseError> {
        let fields: Vec<&str> = line.split(' ').collect();
        let [method, target, version] = fields.as_slice() else {
            return Err(ParseError::InvalidRequestLine(line.to_string()));
        };

        self.method = method.to_string();
        self.target = target.to_string();
        self.version = version.to_string();
        Ok(())
    }

    /// Parses one `Key: value` header line.
    ///
    /// Host and Connection are lifted into their own fields. A repeated Host
    /// overwrites the earlier one.
    pub fn parse_header_line(&mut self, line: &str) -> Result<(), ParseError> {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::InvalidHeader(line.to_string()))?;
        let value = value.trim_start();

        if key.is_empty() || key.ends_with(char::is_whitespace) {
            return Err(ParseError::InvalidHeader(line.to_string()));
        }

        if key.eq_ignore_ascii_case("connection") {
            self.close = value.trim() == "close";
        } else if key.eq_ignore_ascii_case("host") {
            self.host = value.to_string();
        } else {
            self.headers
                .insert(canonical_header_key(key), value.to_string());
        }

        Ok(())
    }

    /// Turns the head into a [`Request`], or names the first field that
    /// makes it unservable.
    pub fn validate(self) -> Result<Request, ParseError> {
        let method = Method::from_str(&self.method)
            .ok_or_else(|| ParseError::UnsupportedMethod(self.method.clone()))?;

        if !self.target.starts_with('/') {
            return Err(ParseError::InvalidTarget(self.target));
        }

        if self.version != HTTP_VERSION {
            return Err(ParseError::UnsupportedVersion(self.version));
        }

        if self.host.is_empty() {
            return Err(ParseError::MissingHost);
        }

        Ok(Request {
            method,
            target: self.target,
            version: self.version,
            headers: self.headers,
            host: self.host,
            close: self.close,
        })
    }
}
