/// Status line sent with every reply; this server never fails a request.
pub const STATUS_LINE: &str = "HTTP/1.1 200 OK";

/// Represents a complete HTTP response ready to be sent to a client.
///
/// Headers keep their insertion order so replies are byte-for-byte
/// predictable on the wire.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP headers in wire order
    pub headers: Vec<(String, String)>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```
/// # use pipeline_server::http::response::ResponseBuilder;
/// let response = ResponseBuilder::new()
///     .header("Content-Type", "text/plain")
///     .body(b"hi".to_vec())
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("2"));
/// ```
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a header. Repeated keys are kept in order.
    pub fn header(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.headers.push((key.into(), value.to_string()));
        self
    }

    /// Sets the response body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Builds the final Response.
    ///
    /// Adds `Content-Length` from the body size when it is missing, placed
    /// right after the first header.
    pub fn build(mut self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));

        if !has_length {
            let at = self.headers.len().min(1);
            self.headers
                .insert(at, ("Content-Length".to_string(), self.body.len().to_string()));
        }

        Response {
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// Renders the reply for one pipelined request.
    ///
    /// `seq` is the per-connection reply number, `request_id` the echoed
    /// `X-Request` value.
    pub fn pipelined(connection: u64, request_id: u64, seq: u64) -> Self {
        let body = format!(
            "<html><body>Reply {seq} on connection {connection} for request #{request_id}</body></html>\n"
        );

        ResponseBuilder::new()
            .header("Keep-Alive", "timeout=10 max=400")
            .header("Content-Type", "text/html")
            .header("X-Connection", connection)
            .header("X-Request", request_id)
            .header("X-Reply", seq)
            .body(body)
            .build()
    }

    /// Retrieves the first header with the given name (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}
