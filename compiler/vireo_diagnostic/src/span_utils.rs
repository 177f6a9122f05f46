//! Span utility functions for diagnostic rendering.
//!
//! Provides helpers for computing line and column numbers from spans.
//! For repeated lookups on the same source, use [`LineOffsetTable`] which
//! pre-computes line offsets for O(log L) lookup instead of O(n) scanning.

use vireo_ir::Span;

/// Pre-computed line offset table for efficient line/column lookup.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start (0-indexed lines internally).
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    ///
    /// Scans the source once to find all newlines, O(n) construction
    /// for O(log L) lookups where L is the number of lines.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                #[allow(clippy::cast_possible_truncation)] // sources are capped at u32
                offsets.push((i + 1) as u32);
            }
        }
        LineOffsetTable { offsets }
    }

    /// Get 1-based line number from a byte offset using binary search.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        (line_idx as u32) + 1
    }

    /// Get 1-based (line, column) from a byte offset.
    ///
    /// The column is computed as the number of characters (not bytes)
    /// from the start of the line.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_idx = (line - 1) as usize;
        let line_start = self.offsets.get(line_idx).copied().unwrap_or(0) as usize;
        let offset = offset as usize;

        let col_bytes = &source[line_start..offset.min(source.len())];
        let col = u32::try_from(col_bytes.chars().count()).unwrap_or(u32::MAX - 1) + 1;

        (line, col)
    }

    /// Get the byte offset of a line start (1-based line number).
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    /// Get the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// Compute the 1-based line number where a span starts.
///
/// Note: for repeated lookups, use [`LineOffsetTable`] instead.
pub fn line_number(source: &str, span: Span) -> u32 {
    LineOffsetTable::build(source).line_from_offset(span.start)
}

/// Compute 1-based (line, column) from a byte offset.
///
/// Note: for repeated lookups, use [`LineOffsetTable`] instead.
pub fn offset_to_line_col(source: &str, offset: u32) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lines() {
        let source = "line1\nline2\nline3";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_count(), 3);
        assert_eq!(table.line_from_offset(0), 1);
        assert_eq!(table.line_from_offset(5), 1);
        assert_eq!(table.line_from_offset(6), 2);
        assert_eq!(table.line_from_offset(12), 3);
    }

    #[test]
    fn test_offset_to_line_col() {
        let source = "abc\ndefgh\nij";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 2), (1, 3));
        assert_eq!(table.offset_to_line_col(source, 4), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 7), (2, 4));
        assert_eq!(table.offset_to_line_col(source, 10), (3, 1));
    }

    #[test]
    fn test_multibyte_columns() {
        // 'é' is two bytes; columns count characters.
        let source = "é = 1";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 3), (1, 3));
    }

    #[test]
    fn test_line_number_from_span() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_number(source, Span::new(6, 11)), 2);
    }
}
