//! Raw pipelining client used by the end-to-end tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use bytes::{Buf, BytesMut};
use pipeline_server::server::Listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Starts a server on an ephemeral port and returns its address.
pub async fn start_server() -> SocketAddr {
    let listener = Listener::bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener.serve());
    addr
}

/// Number of tasks alive on the current runtime.
pub fn alive_tasks() -> usize {
    tokio::runtime::Handle::current().metrics().num_alive_tasks()
}

/// Polls [`alive_tasks`] until it drops to `target` or 2s pass.
pub async fn wait_for_alive_tasks(target: usize) -> usize {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let alive = alive_tasks();
        if alive <= target || Instant::now() >= deadline {
            return alive;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// A single pipelined request carrying the two control headers.
pub fn request(id: u64, sleep_ms: u64) -> String {
    format!(
        "GET / HTTP/1.1\r\nHost: localhost\r\nX-Sleep: {}\r\nX-Request: {}\r\n\r\n",
        sleep_ms, id
    )
}

#[derive(Debug)]
pub struct Reply {
    pub connection: u64,
    pub request: u64,
    pub seq: u64,
    pub body: String,
    pub received: Instant,
}

pub struct Client {
    stream: TcpStream,
    buf: BytesMut,
}

impl Client {
    pub async fn connect(addr: SocketAddr) -> Self {
        Self {
            stream: TcpStream::connect(addr).await.unwrap(),
            buf: BytesMut::with_capacity(4096),
        }
    }

    pub async fn send(&mut self, bytes: &[u8]) {
        self.stream.write_all(bytes).await.unwrap();
    }

    /// Shuts down the sending side; the client can still read.
    pub async fn half_close(&mut self) {
        self.stream.shutdown().await.unwrap();
    }

    /// Reads until the server closes the connection, returning every byte
    /// received, including any already buffered.
    pub async fn read_until_closed(&mut self) -> Vec<u8> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let n = self.stream.read_buf(&mut self.buf).await.unwrap();
                if n == 0 {
                    return self.buf.split().to_vec();
                }
            }
        })
        .await
        .expect("server did not close the connection")
    }

    /// Reads the next reply, failing the test if none arrives within 5s.
    pub async fn read_reply(&mut self) -> Reply {
        tokio::time::timeout(Duration::from_secs(5), self.next_reply())
            .await
            .expect("timed out waiting for reply")
    }

    pub async fn read_replies(&mut self, n: usize) -> Vec<Reply> {
        let mut replies = Vec::with_capacity(n);
        for _ in 0..n {
            replies.push(self.read_reply().await);
        }
        replies
    }

    async fn next_reply(&mut self) -> Reply {
        loop {
            if let Some(reply) = self.try_parse() {
                return reply;
            }
            let n = self.stream.read_buf(&mut self.buf).await.unwrap();
            assert!(n > 0, "server closed the connection");
        }
    }

    fn try_parse(&mut self) -> Option<Reply> {
        let head_end = self.buf.windows(4).position(|w| w == b"\r\n\r\n")?;
        let head = String::from_utf8(self.buf[..head_end].to_vec()).unwrap();

        let mut lines = head.split("\r\n");
        assert_eq!(lines.next(), Some("HTTP/1.1 200 OK"));

        let mut length = 0;
        let (mut connection, mut request, mut seq) = (0, 0, 0);
        for line in lines {
            let (key, value) = line.split_once(": ").unwrap();
            match key {
                "Content-Length" => length = value.parse().unwrap(),
                "X-Connection" => connection = value.parse().unwrap(),
                "X-Request" => request = value.parse().unwrap(),
                "X-Reply" => seq = value.parse().unwrap(),
                _ => {}
            }
        }

        let total = head_end + 4 + length;
        if self.buf.len() < total {
            return None;
        }

        self.buf.advance(head_end + 4);
        let body = String::from_utf8(self.buf.split_to(length).to_vec()).unwrap();

        Some(Reply {
            connection,
            request,
            seq,
            body,
            received: Instant::now(),
        })
    }
}
