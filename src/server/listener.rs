use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{Instrument, info};

use crate::config::Config;
use crate::http::connection::Connection;

/// Accepts connections and hands each one to its own connection task.
///
/// Connection ids are assigned here, starting at 1, and are only used to
/// tell connections apart in replies and logs.
pub struct Listener {
    inner: TcpListener,
    next_id: u64,
}

impl Listener {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let inner = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        Ok(Self { inner, next_id: 0 })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.inner.local_addr()?)
    }

    /// Accepts forever. Accept errors are logged and do not stop the loop.
    pub async fn serve(mut self) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        loop {
            let (socket, peer) = match self.inner.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            self.next_id += 1;
            let id = self.next_id;
            let span = tracing::info_span!("conn", id);

            tokio::spawn(
                async move {
                    info!("Accepted connection from {}", peer);
                    let mut conn = Connection::new(socket, id);
                    match conn.run().await {
                        Ok(()) => info!("Connection closed"),
                        Err(e) => tracing::warn!("Closing connection after error: {:#}", e),
                    }
                }
                .instrument(span),
            );
        }
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = Listener::bind(cfg.socket_addr()?).await?;
    listener.serve().await
}
