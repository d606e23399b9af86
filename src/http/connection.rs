use std::time::Duration;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::sync::mpsc;

use crate::http::dump::{self, READING_PREFIX};
use crate::http::parser::RequestParser;
use crate::http::queue::{PendingReply, QueueState, ReplyQueue};
use crate::http::request::ControlHeaders;
use crate::http::response::Response;
use crate::http::timer::{DelayTimers, Wakeup};
use crate::http::writer::{ReplyWriter, serialize_response};

const READ_BUFFER_SIZE: usize = 8192;

/// One accepted socket and everything that hangs off it.
///
/// The connection owns its parser state, reply queue and delay timers.
/// Timers only hold a weak handle to `wake_tx` and are aborted when `run`
/// returns, so nothing can reach this state after close.
pub struct Connection {
    id: u64,
    reader: OwnedReadHalf,
    writer: ReplyWriter,
    buffer: BytesMut,
    parser: RequestParser,
    replies: ReplyQueue,
    timers: DelayTimers,
    reply_count: u64,
    wake_tx: mpsc::UnboundedSender<Wakeup>,
    wake_rx: mpsc::UnboundedReceiver<Wakeup>,
}

enum ConnectionState {
    Open,
    Closed,
}

impl Connection {
    pub fn new(stream: TcpStream, id: u64) -> Self {
        let (reader, writer) = stream.into_split();
        let (wake_tx, wake_rx) = mpsc::unbounded_channel();

        Self {
            id,
            reader,
            writer: ReplyWriter::spawn(writer),
            buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            parser: RequestParser::new(),
            replies: ReplyQueue::new(),
            timers: DelayTimers::new(),
            reply_count: 0,
            wake_tx,
            wake_rx,
        }
    }

    /// Drives the connection until the peer goes away or an I/O error occurs.
    ///
    /// Reading is re-armed right after every buffer is processed, whether or
    /// not replies are still sleeping.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = loop {
            self.buffer.reserve(READ_BUFFER_SIZE);

            let state = tokio::select! {
                res = self.reader.read_buf(&mut self.buffer) => match res {
                    Ok(0) => {
                        tracing::info!("Peer closed connection");
                        break Ok(());
                    }
                    Ok(n) => self.handle_read(n),
                    Err(e) => break Err(anyhow::Error::new(e).context("read failed")),
                },

                Some(wakeup) = self.wake_rx.recv() => self.handle_wakeup(wakeup),

                Some(_) = self.timers.reap(), if !self.timers.is_empty() => ConnectionState::Open,

                res = self.writer.finished() => {
                    let err = match res {
                        Ok(()) => anyhow::anyhow!("writer stopped"),
                        Err(e) => e,
                    };
                    break Err(err.context("write failed"));
                }
            };

            if matches!(state, ConnectionState::Closed) {
                break Err(anyhow::anyhow!("writer closed"));
            }
        };

        let cancelled = self.timers.cancel_all();
        let unsent = self.replies.pending_seqs();
        self.replies.clear();
        if !unsent.is_empty() {
            tracing::debug!(?unsent, cancelled, "Discarding unsent replies");
        }
        result
    }

    fn handle_read(&mut self, n: usize) -> ConnectionState {
        tracing::debug!("Read {} bytes", n);

        let chunk = self.buffer.split();
        dump::trace_bytes(READING_PREFIX, &chunk);

        for controls in self.parser.feed(&chunk) {
            if let ConnectionState::Closed = self.queue_reply(controls) {
                return ConnectionState::Closed;
            }
        }
        ConnectionState::Open
    }

    fn handle_wakeup(&mut self, wakeup: Wakeup) -> ConnectionState {
        if self.replies.wake(wakeup.seq) {
            tracing::debug!(seq = wakeup.seq, "Reply woke up");
        }
        self.process_replies()
    }

    /// Renders the reply for a completed request, appends it to the queue
    /// and flushes.
    fn queue_reply(&mut self, controls: ControlHeaders) -> ConnectionState {
        self.reply_count += 1;
        let seq = self.reply_count;

        let response = Response::pipelined(self.id, controls.request_id, seq);
        let bytes = serialize_response(&response);

        tracing::debug!(
            seq,
            request = controls.request_id,
            sleep_ms = controls.sleep_ms,
            queued = self.replies.len() + 1,
            "Queued reply"
        );

        if controls.is_delayed() {
            self.replies.enqueue(PendingReply::sleeping(seq, bytes));
            self.timers.schedule(
                self.wake_tx.downgrade(),
                seq,
                Duration::from_millis(controls.sleep_ms),
            );
        } else {
            self.replies.enqueue(PendingReply::ready(seq, bytes));
        }
        self.process_replies()
    }

    /// Writes every reply at the front of the queue that is awake.
    fn process_replies(&mut self) -> ConnectionState {
        if self.replies.is_empty() {
            tracing::debug!("process_replies(): nothing to write");
            return ConnectionState::Open;
        }

        let writer = &self.writer;
        let mut write_failed = false;
        self.replies.flush(|reply| {
            tracing::debug!(seq = reply.seq, "process_replies(): writing data");
            write_failed = !writer.send(reply.bytes.clone());
            !write_failed
        });

        if write_failed {
            return ConnectionState::Closed;
        }
        if let QueueState::Blocked = self.replies.state() {
            tracing::debug!(
                pending = ?self.replies.pending_seqs(),
                "process_replies(): front reply still sleeping"
            );
        }
        ConnectionState::Open
    }
}
