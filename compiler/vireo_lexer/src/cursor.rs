//! Zero-cost cursor over a sentinel-terminated buffer.
//!
//! The cursor advances byte-by-byte. EOF is detected when the current byte
//! equals the sentinel (`0x00`) and the position has reached the source
//! length; interior nulls at `pos < source_len` are ordinary (error) bytes.
//! The cursor is [`Copy`], which is what makes scanner snapshots cheap.

/// Returns the earliest (minimum) of two optional positions.
///
/// Combines results from separate memchr calls when more needles are
/// needed than `memchr3` supports.
fn earliest_of(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) | (None, Some(x)) => Some(x),
        (None, None) => None,
    }
}

/// Cursor over a sentinel-terminated byte buffer.
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
///
/// # Invariant
///
/// `buf[source_len] == 0x00` and all bytes after it are `0x00` padding,
/// guaranteed by `SourceBuffer` construction.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
    source_len: u32,
}

const _: () = assert!(std::mem::size_of::<Cursor<'static>>() <= 24);

impl<'a> Cursor<'a> {
    pub(crate) fn new(buf: &'a [u8], source_len: u32) -> Self {
        debug_assert!(
            (source_len as usize) < buf.len(),
            "sentinel must be within buffer bounds"
        );
        debug_assert!(buf[source_len as usize] == 0, "sentinel byte must be 0x00");
        Self {
            buf,
            pos: 0,
            source_len,
        }
    }

    /// Byte at the current position; `0x00` at EOF.
    #[inline]
    pub fn current(&self) -> u8 {
        self.buf[self.pos as usize]
    }

    /// Byte one position ahead. Safe at any position thanks to padding.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.buf[self.pos as usize + 1]
    }

    /// Byte two positions ahead.
    #[inline]
    pub fn peek2(&self) -> u8 {
        self.buf[self.pos as usize + 2]
    }

    /// Byte three positions ahead.
    #[inline]
    pub fn peek3(&self) -> u8 {
        self.buf[self.pos as usize + 3]
    }

    #[inline]
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    /// True when the sentinel has been reached (not an interior null).
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.current() == 0 && self.pos >= self.source_len
    }

    /// Current byte offset in the source.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Reposition the cursor. Used by snapshot restore and deferred-body
    /// re-parse; `pos` must come from a previous `pos()` call.
    #[inline]
    pub fn seek(&mut self, pos: u32) {
        debug_assert!(pos <= self.source_len, "seek past end of source");
        self.pos = pos;
    }

    /// Length of the source content.
    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source_len
    }

    /// Extract a source substring as `&str`.
    ///
    /// # Contract
    ///
    /// `start..end` must fall within the source content and on UTF-8
    /// character boundaries, which holds for scanner token boundaries since
    /// the source was originally a valid `&str`.
    #[allow(unsafe_code)]
    pub fn slice(&self, start: u32, end: u32) -> &'a str {
        debug_assert!(
            end <= self.source_len,
            "slice end {end} exceeds source length {}",
            self.source_len
        );
        debug_assert!(start <= end, "slice start {start} exceeds end {end}");
        // SAFETY: the buffer was constructed from `&str` (valid UTF-8) and
        // the scanner keeps start..end on character boundaries.
        unsafe { std::str::from_utf8_unchecked(&self.buf[start as usize..end as usize]) }
    }

    /// Extract a source substring from `start` to the current position.
    pub fn slice_from(&self, start: u32) -> &'a str {
        self.slice(start, self.pos)
    }

    /// Advance while `pred` returns `true` for the current byte.
    ///
    /// `pred(0)` must return `false` so the sentinel stops the loop.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while pred(self.buf[self.pos as usize]) {
            self.pos += 1;
        }
    }

    /// Number of bytes in the UTF-8 character starting with `byte`.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Decode the full character at the current position.
    ///
    /// Returns U+FFFD on malformed sequences, which cannot occur for
    /// buffers built from `&str`.
    pub fn current_char(&self) -> char {
        let width = Self::utf8_char_width(self.current()) as usize;
        let end = (self.pos as usize + width).min(self.source_len as usize);
        std::str::from_utf8(&self.buf[self.pos as usize..end])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or('\u{FFFD}')
    }

    /// Advance past one full UTF-8 character.
    #[inline]
    pub fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.advance_n(width);
    }

    /// Advance to the next `\n` or EOF. Used to skip line comments.
    #[allow(clippy::cast_possible_truncation)] // remaining.len() fits in u32
    pub fn eat_until_newline_or_eof(&mut self) {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'\n', remaining) {
            self.pos += offset as u32;
        } else {
            self.pos = self.source_len;
        }
    }

    /// Advance past ordinary string content to the next interesting byte.
    /// Returns the byte found, or 0 for EOF.
    ///
    /// Interesting bytes for a string delimited by `quote`: the quote
    /// itself, `\`, `\n`, `\r`.
    #[allow(clippy::cast_possible_truncation)] // remaining.len() fits in u32
    pub fn skip_to_string_delim(&mut self, quote: u8) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let primary = memchr::memchr3(quote, b'\\', b'\n', remaining);
        let cr = memchr::memchr(b'\r', remaining);

        if let Some(off) = earliest_of(primary, cr) {
            self.pos += off as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance past ordinary template content to the next interesting byte.
    /// Returns the byte found, or 0 for EOF.
    ///
    /// Template delimiters: `` ` ``, `$` (possible `${`), `\`, `\r`.
    /// Newlines are legal template content and are not delimiters, but the
    /// scanner still needs to see them for line tracking, so `\n` is
    /// included.
    #[allow(clippy::cast_possible_truncation)] // remaining.len() fits in u32
    pub fn skip_to_template_delim(&mut self) -> u8 {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        let primary = memchr::memchr3(b'`', b'$', b'\\', remaining);
        let secondary = memchr::memchr2(b'\n', b'\r', remaining);

        if let Some(off) = earliest_of(primary, secondary) {
            self.pos += off as u32;
            self.buf[self.pos as usize]
        } else {
            self.pos = self.source_len;
            0
        }
    }

    /// Advance to the next `*` or EOF. Used to find block comment ends.
    #[allow(clippy::cast_possible_truncation)] // remaining.len() fits in u32
    pub fn skip_to_star(&mut self) -> bool {
        let remaining = &self.buf[self.pos as usize..self.source_len as usize];
        if let Some(offset) = memchr::memchr(b'*', remaining) {
            self.pos += offset as u32;
            true
        } else {
            self.pos = self.source_len;
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::SourceBuffer;

    #[test]
    fn test_basic_navigation() {
        let buf = SourceBuffer::new("abc");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current(), b'a');
        assert_eq!(cursor.peek(), b'b');
        assert_eq!(cursor.peek2(), b'c');
        cursor.advance_n(2);
        assert_eq!(cursor.current(), b'c');
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_interior_null_is_not_eof() {
        let buf = SourceBuffer::new("a\0b");
        let mut cursor = buf.cursor();
        cursor.advance();
        assert_eq!(cursor.current(), 0);
        assert!(!cursor.is_eof());
        cursor.advance();
        assert_eq!(cursor.current(), b'b');
    }

    #[test]
    fn test_slice() {
        let buf = SourceBuffer::new("hello world");
        let cursor = buf.cursor();
        assert_eq!(cursor.slice(0, 5), "hello");
        assert_eq!(cursor.slice(6, 11), "world");
    }

    #[test]
    fn test_seek_for_snapshots() {
        let buf = SourceBuffer::new("abcdef");
        let mut cursor = buf.cursor();
        cursor.advance_n(4);
        let saved = cursor.pos();
        cursor.seek(1);
        assert_eq!(cursor.current(), b'b');
        cursor.seek(saved);
        assert_eq!(cursor.current(), b'e');
    }

    #[test]
    fn test_skip_to_string_delim_single_quote() {
        let buf = SourceBuffer::new("abc'rest");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_string_delim(b'\'');
        assert_eq!(b, b'\'');
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn test_skip_to_string_delim_backslash_first() {
        let buf = SourceBuffer::new("ab\\\"rest");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_string_delim(b'"');
        assert_eq!(b, b'\\');
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_skip_to_template_delim() {
        let buf = SourceBuffer::new("text${x}");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_template_delim();
        assert_eq!(b, b'$');
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn test_skip_to_template_delim_backtick() {
        let buf = SourceBuffer::new("text`");
        let mut cursor = buf.cursor();
        let b = cursor.skip_to_template_delim();
        assert_eq!(b, b'`');
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn test_eat_until_newline() {
        let buf = SourceBuffer::new("// comment\nnext");
        let mut cursor = buf.cursor();
        cursor.eat_until_newline_or_eof();
        assert_eq!(cursor.pos(), 10);
        assert_eq!(cursor.current(), b'\n');
    }

    #[test]
    fn test_current_char_multibyte() {
        let buf = SourceBuffer::new("λx");
        let mut cursor = buf.cursor();
        assert_eq!(cursor.current_char(), 'λ');
        cursor.advance_char();
        assert_eq!(cursor.current(), b'x');
    }
}
