//! Pipelined HTTP/1.1 request handling.
//!
//! The server does not parse HTTP requests in full. It only needs to know
//! where each request ends and the values of two control headers.
//!
//! # Architecture
//!
//! - **`boundary`**: Detects the `\r\n\r\n` that ends a request
//! - **`header`**: Recognises `Key: Value` lines in the same byte stream
//! - **`request`**: The `X-Sleep` / `X-Request` control values
//! - **`parser`**: Drives both matchers over each read buffer
//! - **`response`**: Reply representation and rendering
//! - **`queue`**: Ordered, per-connection pending replies
//! - **`timer`**: Delay timers for sleeping replies
//! - **`writer`**: Serializes replies and writes them to the socket
//! - **`dump`**: Escaped wire dumps for trace logging
//! - **`connection`**: The per-connection read → parse → queue → write loop
//!
//! # Reply Queue
//!
//! ```text
//!                 enqueue (front ready)
//!        ┌──────┐ ───────────────────▶ ┌──────────┐
//!        │ Idle │                      │ Flushing │ ── write front, pop
//!        └──────┘ ◀─────────────────── └──────────┘
//!           │        queue drained         ▲   │
//!           │                              │   │ next front sleeping
//!           │ enqueue (front sleeping)     │   ▼
//!           │                         timer fired
//!           └────────────────────────▶ ┌─────────┐
//!                                      │ Blocked │
//!                                      └─────────┘
//! ```
//!
//! Requests are read and parsed while the queue is blocked; only their
//! replies wait.

pub mod boundary;
pub mod connection;
pub mod dump;
pub mod header;
pub mod parser;
pub mod queue;
pub mod request;
pub mod response;
pub mod timer;
pub mod writer;
