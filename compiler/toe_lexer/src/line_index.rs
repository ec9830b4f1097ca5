//! Byte-offset to line/column conversion.

use toe_ir::Position;

/// Precomputed line starts for a source buffer.
///
/// Built once per lex run; converting an offset is a binary search over
/// line starts plus a character count within the line, so columns point
/// at characters (what an editor shows), not bytes.
pub struct LineIndex<'src> {
    source: &'src str,
    /// Byte offset of the start of each line. `line_starts[0] == 0`.
    line_starts: Vec<usize>,
}

impl<'src> LineIndex<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        LineIndex {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset into a 1-based position.
    pub fn position(&self, offset: usize) -> Position {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line];
        let column = self.source[line_start..offset].chars().count() + 1;
        Position::new(
            u32::try_from(line + 1).unwrap_or(u32::MAX),
            u32::try_from(column).unwrap_or(u32::MAX),
        )
    }
}
