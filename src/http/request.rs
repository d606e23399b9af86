/// Header that asks the server to hold the reply back, in milliseconds.
pub const SLEEP_HEADER: &str = "X-Sleep";
/// Header carrying the client-assigned request id, echoed in the reply.
pub const REQUEST_HEADER: &str = "X-Request";

/// The control values carried by one pipelined request.
///
/// Both fields start at zero for every request and only change when the
/// matching header is seen before the request boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlHeaders {
    /// Requested reply delay in milliseconds (`X-Sleep`)
    pub sleep_ms: u64,
    /// Opaque id echoed back in the reply (`X-Request`)
    pub request_id: u64,
}

impl ControlHeaders {
    /// Records a parsed header line. Returns `true` if the key was one of
    /// the two control headers.
    ///
    /// Keys are matched exactly (case-sensitive). Values are read up to the
    /// first non-digit; a value without leading digits counts as 0.
    ///
    /// # Example
    ///
    /// ```
    /// # use pipeline_server::http::request::ControlHeaders;
    /// let mut controls = ControlHeaders::default();
    /// assert!(controls.apply("X-Sleep", "250"));
    /// assert!(!controls.apply("Host", "localhost"));
    /// assert_eq!(controls.sleep_ms, 250);
    /// ```
    pub fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            SLEEP_HEADER => self.sleep_ms = parse_uint(value),
            REQUEST_HEADER => self.request_id = parse_uint(value),
            _ => return false,
        }
        true
    }

    /// Whether the reply for this request must wait before being written.
    pub fn is_delayed(&self) -> bool {
        self.sleep_ms > 0
    }
}

/// Reads the leading decimal digits of `value`, skipping leading whitespace.
/// No digits gives 0; overflow saturates.
fn parse_uint(value: &str) -> u64 {
    value
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u64, |n, d| n.saturating_mul(10).saturating_add(u64::from(d - b'0')))
}
