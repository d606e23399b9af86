//! Incremental `Key: Value\r\n` line recognition.

/// Position of the extractor inside the current header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderState {
    /// Nothing consumed on this line yet
    Begin,
    /// Accumulating the key until `:`
    Key,
    /// Saw `:`, expecting exactly one space
    Colon,
    /// Accumulating the value until `\r`
    Value,
    /// Saw `\r`, expecting `\n`
    CarriageReturn,
    /// A complete line was recognised; cleared by the next byte
    Matched,
}

/// Recognises header lines in a byte stream fed one byte at a time.
///
/// Lines that do not have the `Key: Value` shape (no colon, no space after
/// the colon, a stray byte between `\r` and `\n`) are flagged and dropped
/// when their `\n` arrives. Any `\n` that does not complete a valid line
/// resets the extractor, so the request line and the blank line ending the
/// header block are skipped without special casing.
#[derive(Debug, Clone)]
pub struct HeaderExtractor {
    key: Vec<u8>,
    value: Vec<u8>,
    state: HeaderState,
    error: bool,
}

impl HeaderExtractor {
    pub fn new() -> Self {
        Self {
            key: Vec::new(),
            value: Vec::new(),
            state: HeaderState::Begin,
            error: false,
        }
    }

    /// Clears the current line.
    pub fn reset(&mut self) {
        self.key.clear();
        self.value.clear();
        self.state = HeaderState::Begin;
        self.error = false;
    }

    /// Feeds one byte. Returns `true` when it completes a well-formed line;
    /// the pair stays readable through [`key`](Self::key) and
    /// [`value`](Self::value) until the next byte is fed.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.state == HeaderState::Matched {
            self.reset();
        }

        match self.state {
            HeaderState::Begin | HeaderState::Key => {
                if self.state == HeaderState::Key && byte == b':' {
                    self.state = HeaderState::Colon;
                } else {
                    self.key.push(byte);
                    self.state = HeaderState::Key;
                }
            }
            HeaderState::Colon => {
                if byte == b' ' {
                    self.state = HeaderState::Value;
                } else {
                    self.error = true;
                }
            }
            HeaderState::Value => {
                if byte == b'\r' {
                    self.state = HeaderState::CarriageReturn;
                } else {
                    self.value.push(byte);
                }
            }
            HeaderState::CarriageReturn => {
                if byte == b'\n' && !self.error {
                    self.state = HeaderState::Matched;
                    return true;
                }
                if byte != b'\n' {
                    self.error = true;
                }
            }
            HeaderState::Matched => {}
        }

        if byte == b'\n' {
            self.reset();
        }
        false
    }

    pub fn state(&self) -> HeaderState {
        self.state
    }

    /// Whether the line being parsed has already been marked malformed.
    pub fn is_erroneous(&self) -> bool {
        self.error
    }

    /// Key of the last matched line (lossy UTF-8).
    pub fn key(&self) -> String {
        String::from_utf8_lossy(&self.key).into_owned()
    }

    /// Value of the last matched line (lossy UTF-8).
    pub fn value(&self) -> String {
        String::from_utf8_lossy(&self.value).into_owned()
    }

    /// Returns the matched pair, if the last byte completed one.
    pub fn matched(&self) -> Option<(&[u8], &[u8])> {
        (self.state == HeaderState::Matched).then_some((self.key.as_slice(), self.value.as_slice()))
    }
}

impl Default for HeaderExtractor {
    fn default() -> Self {
        Self::new()
    }
}
