use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::http::dump::{self, WRITING_PREFIX};
use crate::http::response::{Response, STATUS_LINE};

pub fn serialize_response(resp: &Response) -> Bytes {
    let mut buf = BytesMut::with_capacity(256 + resp.body.len());

    // Status line
    buf.put_slice(STATUS_LINE.as_bytes());
    buf.put_slice(b"\r\n");

    // Headers
    for (k, v) in &resp.headers {
        buf.put_slice(k.as_bytes());
        buf.put_slice(b": ");
        buf.put_slice(v.as_bytes());
        buf.put_slice(b"\r\n");
    }

    // Header/body separator
    buf.put_slice(b"\r\n");

    // Body
    buf.put_slice(&resp.body);

    buf.freeze()
}

/// Write side of a connection.
///
/// Replies handed to [`send`](Self::send) are written by a dedicated task in
/// the order they were sent, so the read loop never waits for the socket to
/// drain. The task ends when the writer is dropped or on the first write
/// error; the connection watches [`finished`](Self::finished) for the latter.
pub struct ReplyWriter {
    tx: mpsc::UnboundedSender<Bytes>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl ReplyWriter {
    pub fn spawn(stream: OwnedWriteHalf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(write_loop(stream, rx).in_current_span());
        Self { tx, task }
    }

    /// Queues `bytes` for writing. Returns `false` once the write task is gone.
    pub fn send(&self, bytes: Bytes) -> bool {
        self.tx.send(bytes).is_ok()
    }

    /// Resolves when the write task stops, yielding its outcome.
    pub async fn finished(&mut self) -> anyhow::Result<()> {
        match (&mut self.task).await {
            Ok(res) => res,
            Err(e) => Err(anyhow::anyhow!("writer task failed: {}", e)),
        }
    }
}

async fn write_loop(
    mut stream: OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<Bytes>,
) -> anyhow::Result<()> {
    while let Some(bytes) = rx.recv().await {
        dump::trace_bytes(WRITING_PREFIX, &bytes);

        if let Err(e) = stream.write_all(&bytes).await {
            tracing::warn!(error = %e, "Error writing data");
            return Err(e.into());
        }
        tracing::debug!("Wrote {} bytes", bytes.len());
    }

    // Peer may already be gone; nothing left to report.
    let _ = stream.shutdown().await;
    Ok(())
}
