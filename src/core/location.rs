//! Byte offset to line/column conversion for reporting.

/// 1-based line and column. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceLocation {
    pub line: usize,
    pub col: usize,
}

/// Line start offsets of one buffer.
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { text, starts }
    }

    pub fn location(&self, offset: usize) -> SourceLocation {
        let line_idx = self.starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.starts[line_idx];
        SourceLocation {
            line: line_idx + 1,
            col: self.text[line_start..offset].chars().count() + 1,
        }
    }

    /// Text of the line containing `offset`, without its terminator.
    pub fn line_text(&self, offset: usize) -> &'a str {
        let line_idx = self.starts.partition_point(|&start| start <= offset) - 1;
        let start = self.starts[line_idx];
        let end = self
            .starts
            .get(line_idx + 1)
            .map_or(self.text.len(), |next| next - 1);
        self.text[start..end].trim_end_matches('\r')
    }
}
