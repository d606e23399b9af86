use crate::http::boundary::BoundaryMatcher;
use crate::http::header::HeaderExtractor;
use crate::http::request::ControlHeaders;

/// Splits a pipelined byte stream into requests without buffering them.
///
/// Bytes go through the boundary matcher and the header extractor in
/// lockstep. Control headers seen before a boundary belong to the request
/// that boundary ends; the accumulators are zeroed afterwards. A request
/// split across several reads is handled transparently.
#[derive(Debug, Default)]
pub struct RequestParser {
    end_of_message: BoundaryMatcher,
    header: HeaderExtractor,
    current: ControlHeaders,
}

impl RequestParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes `buf`, returning the controls of every request it completed,
    /// in arrival order.
    pub fn feed(&mut self, buf: &[u8]) -> Vec<ControlHeaders> {
        let mut completed = Vec::new();

        for &byte in buf {
            let boundary = self.end_of_message.feed(byte);
            let header_done = self.header.feed(byte);

            if boundary {
                self.header.reset();
                completed.push(std::mem::take(&mut self.current));
            } else if header_done {
                if let Some((key, value)) = self.header.matched() {
                    let key = String::from_utf8_lossy(key);
                    let value = String::from_utf8_lossy(value);
                    self.current.apply(&key, &value);
                }
            }
        }

        completed
    }

    /// Controls gathered so far for the request still being received.
    pub fn pending(&self) -> ControlHeaders {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_request() {
        let mut parser = RequestParser::new();
        let done = parser.feed(b"GET / HTTP/1.1\r\nX-Sleep: 10\r\nX-Request: 4\r\n\r\n");

        assert_eq!(
            done,
            vec![ControlHeaders {
                sleep_ms: 10,
                request_id: 4
            }]
        );
        assert_eq!(parser.pending(), ControlHeaders::default());
    }

    #[test]
    fn controls_reset_between_requests() {
        let mut parser = RequestParser::new();
        let done = parser.feed(b"GET / HTTP/1.1\r\nX-Sleep: 10\r\nX-Request: 4\r\n\r\nGET / HTTP/1.1\r\n\r\n");

        assert_eq!(done.len(), 2);
        assert_eq!(done[1], ControlHeaders::default());
    }
}
