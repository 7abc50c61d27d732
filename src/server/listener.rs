use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::Connection;

pub async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.server.listen_addr))?;
    info!(
        "Listening on {}, serving {}",
        cfg.server.listen_addr,
        cfg.static_files.doc_root.display()
    );

    serve(listener, cfg).await
}

/// Accepts connections forever, one task per connection.
///
/// Accept errors are logged and the loop carries on.
pub async fn serve(listener: TcpListener, cfg: Arc<Config>) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Accept failed");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let cfg = Arc::clone(&cfg);
        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, cfg);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
                tracing::debug!("Connection closed");
            }
            .instrument(tracing::info_span!("conn", %peer)),
        );
    }
}
