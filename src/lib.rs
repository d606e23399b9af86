//! Pipeline Server - HTTP pipelining test server
//!
//! Replies to every `\r\n\r\n`-terminated request on a connection, optionally
//! after an `X-Sleep` delay, and always in the order the requests arrived.

pub mod config;
pub mod http;
pub mod logging;
pub mod server;
