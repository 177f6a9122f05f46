//! Sentinel-terminated source buffer.
//!
//! The scanner reads bytes through a cursor over this buffer. A `0x00`
//! sentinel plus a cache line of zero padding after the source lets the
//! hot scanning loops peek ahead without bounds checks.

use crate::cursor::Cursor;

/// Padding after the sentinel so `peek`/`peek2` never read out of bounds.
const PADDING: usize = 64;

/// Owned, sentinel-terminated copy of a source file.
pub struct SourceBuffer {
    /// Source bytes + sentinel + zero padding.
    buf: Vec<u8>,
    /// Length of the actual source content.
    source_len: u32,
}

impl SourceBuffer {
    /// Copy `source` into a sentinel-terminated buffer.
    ///
    /// # Panics
    /// Panics if the source exceeds `u32::MAX` bytes. Sources are capped at
    /// 4 GiB by the 32-bit span representation.
    pub fn new(source: &str) -> Self {
        let source_len = u32::try_from(source.len())
            .unwrap_or_else(|_| panic!("source of {} bytes exceeds u32::MAX", source.len()));
        let mut buf = Vec::with_capacity(source.len() + PADDING);
        buf.extend_from_slice(source.as_bytes());
        buf.resize(source.len() + PADDING, 0);
        SourceBuffer { buf, source_len }
    }

    /// Cursor positioned at the start of the source.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.buf, self.source_len)
    }

    /// Length of the source content in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.source_len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.source_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_over_buffer() {
        let buf = SourceBuffer::new("ab");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
        cursor.advance();
        assert!(cursor.is_eof());
        // Padding keeps lookahead safe at EOF.
        assert_eq!(cursor.peek(), 0);
        assert_eq!(cursor.peek2(), 0);
    }

    #[test]
    fn test_empty_source() {
        let buf = SourceBuffer::new("");
        assert!(buf.is_empty());
        assert!(buf.cursor().is_eof());
    }
}
