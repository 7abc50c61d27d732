//! Connection dispatch and request handling.
//!
//! - **`listener`**: accepts sockets and spawns a connection task for each
//! - **`handler`**: turns a validated request into a 200 or 404
//! - **`resolver`**: maps targets onto files under the document root

pub mod handler;
pub mod listener;
pub mod resolver;
