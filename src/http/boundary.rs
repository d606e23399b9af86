//! Streaming detection of the byte sequence that ends a request.

/// The separator that terminates every pipelined request.
pub const END_OF_MESSAGE: &[u8] = b"\r\n\r\n";

/// Matches a fixed byte sequence one byte at a time.
///
/// `feed` returns `true` exactly on the byte that completes an occurrence of
/// the target. After a match the cursor starts over, so one matcher serves
/// every request on a connection.
///
/// On a mismatch the cursor falls back to the start and only the current byte
/// is re-tested against the first target byte. There is no failure-function
/// backtracking, so a target with internal self-overlap (e.g. `aab` fed
/// `aaab`) can be missed. `\r\n\r\n` only overlaps itself at a `\r`, which the
/// re-test covers.
#[derive(Debug, Clone)]
pub struct BoundaryMatcher {
    target: Vec<u8>,
    cursor: usize,
}

impl BoundaryMatcher {
    /// Creates a matcher for `target`.
    ///
    /// # Example
    ///
    /// ```
    /// # use pipeline_server::http::boundary::BoundaryMatcher;
    /// let mut m = BoundaryMatcher::new(b"\r\n\r\n");
    /// let hits: Vec<bool> = b"a\r\n\r\n".iter().map(|&b| m.feed(b)).collect();
    /// assert_eq!(hits, [false, false, false, false, true]);
    /// ```
    pub fn new(target: &[u8]) -> Self {
        assert!(!target.is_empty(), "boundary target must not be empty");
        Self {
            target: target.to_vec(),
            cursor: 0,
        }
    }

    /// Feeds one byte, returning `true` if it completes the target.
    pub fn feed(&mut self, byte: u8) -> bool {
        if byte != self.target[self.cursor] {
            self.cursor = 0;
            if byte != self.target[0] {
                return false;
            }
        }

        self.cursor += 1;
        if self.cursor == self.target.len() {
            self.cursor = 0;
            return true;
        }
        false
    }

    /// Forgets any partial match.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Number of target bytes matched so far.
    pub fn progress(&self) -> usize {
        self.cursor
    }
}

impl Default for BoundaryMatcher {
    fn default() -> Self {
        Self::new(END_OF_MESSAGE)
    }
}
