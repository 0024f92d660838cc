//! SSE line framing
//!
//! Network reads do not line up with SSE line boundaries. [`SseLineBuffer`]
//! reassembles whole lines and [`SseLine`] classifies them.

/// Buffer for incomplete SSE lines across chunk boundaries.
///
/// # Example
/// ```
/// use openai_client::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
///
/// assert!(buffer.feed(b"data: {\"content\":\"hel").is_empty());
/// assert_eq!(buffer.feed(b"lo\"}\n"), vec!["data: {\"content\":\"hello\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    /// Raw bytes; a UTF-8 sequence may be split across reads
    incomplete: Vec<u8>,
}

impl SseLineBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every line completed by them.
    ///
    /// Lines are returned without their `\n` (or `\r\n`). Blank lines, which
    /// only separate SSE events, are dropped. Invalid UTF-8 is replaced with
    /// U+FFFD.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.incomplete.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(newline) = self.incomplete.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.incomplete.drain(..=newline).collect();
            if let Some(line) = decode_line(&raw) {
                lines.push(line);
            }
        }
        lines
    }

    /// Take whatever is left once the body has ended.
    ///
    /// Returns `None` when the stream ended on a line boundary.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.incomplete);
        decode_line(&rest)
    }

    /// Check if there's any incomplete data remaining in the buffer.
    pub fn has_incomplete(&self) -> bool {
        !self.incomplete.is_empty()
    }
}

fn decode_line(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    (!raw.is_empty()).then(|| String::from_utf8_lossy(raw).into_owned())
}

/// One classified SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseLine<'a> {
    /// `data:` payload, leading space stripped
    Data(&'a str),
    /// `data: [DONE]` terminator
    Done,
    /// Comments, `event:`, `id:`, `retry:` and unknown fields
    Ignored,
}

impl<'a> SseLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        match line.strip_prefix("data:") {
            Some(payload) => {
                let payload = payload.strip_prefix(' ').unwrap_or(payload).trim_end();
                if payload == "[DONE]" {
                    SseLine::Done
                } else {
                    SseLine::Data(payload)
                }
            }
            None => SseLine::Ignored,
        }
    }
}
