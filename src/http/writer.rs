use std::path::PathBuf;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Renders `<version> <code> <reason>\r\n`.
pub fn write_status_line(buf: &mut Vec<u8>, resp: &Response) {
    let status_line = format!(
        "{} {} {}\r\n",
        resp.version,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());
}

/// Renders every header as `Key: value\r\n` in sorted key order, then the
/// blank line that ends the header block.
pub fn write_headers(buf: &mut Vec<u8>, resp: &Response) {
    let mut keys: Vec<&String> = resp.headers.keys().collect();
    keys.sort();

    for k in keys {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(resp.headers[k].as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    buf.extend_from_slice(b"\r\n");
}

/// Status line and headers as wire bytes.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::new();
    write_status_line(&mut buf, resp);
    write_headers(&mut buf, resp);
    buf
}

/// Writes one response: head first, then the body file if there is one.
pub struct ResponseWriter {
    head: Vec<u8>,
    written: usize,
    body: Option<PathBuf>,
    body_len: u64,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            head: serialize_head(response),
            written: 0,
            body: response.file_path.clone(),
            body_len: response.body_len,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        self.write_body(stream).await;
        stream.flush().await?;

        Ok(())
    }

    /// Streams at most `body_len` bytes of the body file.
    ///
    /// Content-Length is already on the wire, so a file that grew since it
    /// was resolved is cut off there. One that can't be opened or read is
    /// logged and the body left short.
    async fn write_body<W>(&mut self, stream: &mut W)
    where
        W: AsyncWrite + Unpin,
    {
        let Some(path) = self.body.take() else {
            return;
        };

        let mut file = match File::open(&path).await {
            Ok(file) => file.take(self.body_len),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Body file vanished before write");
                return;
            }
        };

        match tokio::io::copy(&mut file, stream).await {
            Ok(n) if n < self.body_len => {
                tracing::warn!(path = %path.display(), sent = n, expected = self.body_len, "Body file shrank before write");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Body streaming failed");
            }
        }
    }
}
