//! HTTP/1.1 wire protocol.
//!
//! - **`line`**: CRLF line scanning over a buffered reader
//! - **`header`**: canonical header name casing
//! - **`request`**: validated requests and the raw head they are built from
//! - **`parser`**: request line, header and validation rules
//! - **`response`**: status codes and responses with builder pattern
//! - **`writer`**: status line, sorted headers, streamed file body
//! - **`mime`**: content type by file extension
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌────────────────┐
//!        │  AwaitingData  │ ← nothing buffered for the next request
//!        └───────┬────────┘
//!                │ bytes read, no "\r\n\r\n" yet
//!                ▼
//!        ┌────────────────┐
//!        │  Accumulating  │ ← keep reading until a terminator shows up
//!        └───────┬────────┘
//!                │ terminator found: serve every complete request in order
//!                ├─ all served, tail empty   → AwaitingData
//!                ├─ all served, tail partial → Accumulating
//!                └─ 400 / Connection: close  → Closing
//! ```
//!
//! Every read is bounded by the idle timeout. When it fires (or the peer
//! hangs up) with nothing buffered the connection closes silently; with a
//! partial request buffered it gets a 400 first.

pub mod connection;
pub mod header;
pub mod line;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
