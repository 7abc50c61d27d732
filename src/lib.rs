//! Lantern - static file HTTP/1.1 server
//!
//! Serves GET requests from a document root over persistent, pipelined
//! connections that close after an idle timeout.

pub mod config;
pub mod http;
pub mod server;
