//! Human-readable wire dumps for trace logging.

/// Prefix for bytes received from the client.
pub const READING_PREFIX: &str = "< ";
/// Prefix for bytes written to the client.
pub const WRITING_PREFIX: &str = "> ";

/// Splits raw bytes into display lines with `\r` and `\n` made visible.
///
/// A line ends after each `\n`. A trailing partial line is kept.
///
/// # Example
///
/// ```
/// # use pipeline_server::http::dump::escape_lines;
/// assert_eq!(escape_lines(b"A: 1\r\n\r\n"), vec!["A: 1\\r\\n", "\\r\\n"]);
/// ```
pub fn escape_lines(bytes: &[u8]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = Vec::new();

    for &b in bytes {
        match b {
            b'\r' => line.extend_from_slice(b"\\r"),
            b'\n' => {
                line.extend_from_slice(b"\\n");
                lines.push(String::from_utf8_lossy(&line).into_owned());
                line.clear();
            }
            _ => line.push(b),
        }
    }

    if !line.is_empty() {
        lines.push(String::from_utf8_lossy(&line).into_owned());
    }
    lines
}

/// Emits one trace event per line of `bytes`.
pub fn trace_bytes(prefix: &str, bytes: &[u8]) {
    if !tracing::enabled!(tracing::Level::TRACE) {
        return;
    }
    for line in escape_lines(bytes) {
        tracing::trace!("{}{}", prefix, line);
    }
}
