use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;

use crate::config::Config;
use crate::http::parser::read_request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::handler::handle_request;

/// Marks the end of a request head, and with GET-only traffic, of the
/// whole request.
const REQUEST_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Bytes reserved ahead of each read.
const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Nothing buffered for the next request yet
    AwaitingData,
    /// Some bytes buffered, no terminator seen
    Accumulating,
    Closing,
}

/// Drives one accepted connection until it closes.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<Config>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<Config>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::AwaitingData,
            config,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        while self.state != ConnectionState::Closing {
            self.state = self.step().await?;
        }

        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "Shutdown after close failed");
        }

        Ok(())
    }

    /// One read followed by whatever the buffer now allows.
    async fn step(&mut self) -> anyhow::Result<ConnectionState> {
        self.buffer.reserve(READ_CHUNK);

        let idle = self.config.server.idle_timeout();
        let n = match timeout(idle, self.stream.read_buf(&mut self.buffer)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "Read failed");
                0
            }
            Err(_) => {
                tracing::debug!(timeout = ?idle, "Read timed out");
                0
            }
        };

        if n == 0 {
            return self.close_stalled().await;
        }

        self.dispatch_buffered().await
    }

    /// Nothing more is coming. A half-received request still gets its 400.
    async fn close_stalled(&mut self) -> anyhow::Result<ConnectionState> {
        if self.buffer.is_empty() {
            tracing::debug!("Closing idle connection");
        } else {
            tracing::warn!(buffered = self.buffer.len(), "Incomplete request on stalled connection");
            self.send(Response::bad_request()).await?;
        }

        Ok(ConnectionState::Closing)
    }

    /// Serves every complete request in the buffer, in order, keeping the
    /// trailing partial one for the next read.
    async fn dispatch_buffered(&mut self) -> anyhow::Result<ConnectionState> {
        let Some(end) = find_last_terminator(&self.buffer) else {
            if self.buffer.len() > self.config.server.max_request_bytes {
                tracing::warn!(buffered = self.buffer.len(), "Request head too large");
                self.send(Response::bad_request()).await?;
                return Ok(ConnectionState::Closing);
            }
            return Ok(ConnectionState::Accumulating);
        };

        let batch = self.buffer.split_to(end + REQUEST_TERMINATOR.len()).freeze();

        for unit in split_request_units(&batch[..end]) {
            if self.serve_unit(unit).await? {
                return Ok(ConnectionState::Closing);
            }
        }

        if self.buffer.is_empty() {
            Ok(ConnectionState::AwaitingData)
        } else {
            Ok(ConnectionState::Accumulating)
        }
    }

    /// Parses and answers one request unit. Returns true once the
    /// connection has to close.
    async fn serve_unit(&mut self, unit: &[u8]) -> anyhow::Result<bool> {
        let mut text = Vec::with_capacity(unit.len() + REQUEST_TERMINATOR.len());
        text.extend_from_slice(unit);
        text.extend_from_slice(REQUEST_TERMINATOR);

        let request = match read_request(text.as_slice()) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting malformed request");
                self.send(Response::bad_request()).await?;
                return Ok(true);
            }
        };

        let config = Arc::clone(&self.config);
        let target = request.target.clone();
        let response = handle_request(request, &config.static_files.doc_root).await;

        tracing::info!(
            path = %target,
            status = response.status.as_u16(),
            "Request served"
        );

        let close = response.closes_connection();
        self.send(response).await?;

        if close {
            tracing::debug!("Client requested close");
        }
        Ok(close)
    }

    async fn send(&mut self, response: Response) -> anyhow::Result<()> {
        ResponseWriter::new(&response)
            .write_to_stream(&mut self.stream)
            .await
    }
}

fn find_last_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(REQUEST_TERMINATOR.len())
        .rposition(|w| w == REQUEST_TERMINATOR)
}

fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(REQUEST_TERMINATOR.len())
        .position(|w| w == REQUEST_TERMINATOR)
}

/// Splits on every terminator, left to right. The terminators themselves
/// are dropped.
fn split_request_units(mut buf: &[u8]) -> Vec<&[u8]> {
    let mut units = Vec::new();

    while let Some(pos) = find_terminator(buf) {
        units.push(&buf[..pos]);
        buf = &buf[pos + REQUEST_TERMINATOR.len()..];
    }
    units.push(buf);

    units
}
