//! Source buffer with line bookkeeping for diagnostics.

use crate::error::OutOfRange;

/// Expression source together with the metadata needed to report errors
/// against it: an identifying name and an eagerly computed line table.
///
/// The text is immutable after construction; only the name can be changed.
/// Line breaks are `\n` characters (`\r` is treated as ordinary line
/// content, so CRLF input keeps the `\r` at the end of each line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    text: String,
    name: String,
    /// `(start offset, length)` of each line, excluding the `\n` terminator.
    lines: Vec<(usize, usize)>,
}

impl Code {
    /// Creates a buffer with a randomized identifying name.
    pub fn new(text: impl Into<String>) -> Self {
        let name = format!("{:08x}.fx", rand::random::<u32>());
        Self::named(text, name)
    }

    /// Creates a buffer with an explicit identifying name.
    pub fn named(text: impl Into<String>, name: impl Into<String>) -> Self {
        let text = text.into();
        let lines = split_lines(&text);
        Self {
            text,
            name: name.into(),
            lines,
        }
    }

    /// Full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Identifying name used in rendered errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replaces the identifying name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub(crate) fn line_spans(&self) -> &[(usize, usize)] {
        &self.lines
    }

    /// Maps a byte offset to a 1-based line number and 0-based column.
    ///
    /// Offsets pointing at a `\n` terminator or past the end of the text are
    /// not part of any line and produce an [`OutOfRange`] error.
    pub fn line_col(&self, pos: usize) -> Result<(usize, usize), OutOfRange> {
        for (i, &(begin, length)) in self.lines.iter().enumerate() {
            if pos >= begin && pos < begin + length {
                return Ok((i + 1, pos - begin));
            }
        }
        Err(OutOfRange::Position(pos))
    }

    /// Returns the text of the 1-based `line_number`.
    pub fn line(&self, line_number: usize) -> Result<&str, OutOfRange> {
        if line_number == 0 || line_number > self.lines.len() {
            return Err(OutOfRange::Line(line_number));
        }
        let (begin, length) = self.lines[line_number - 1];
        Ok(&self.text[begin..begin + length])
    }

    /// Returns the texts of lines `begin_ln..=end_ln` (both 1-based).
    pub fn lines(&self, begin_ln: usize, end_ln: usize) -> Result<Vec<&str>, OutOfRange> {
        if begin_ln == 0 || begin_ln > end_ln {
            return Err(OutOfRange::Line(begin_ln));
        }
        if end_ln > self.lines.len() {
            return Err(OutOfRange::Line(end_ln));
        }
        (begin_ln..=end_ln).map(|ln| self.line(ln)).collect()
    }
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Code {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

fn split_lines(text: &str) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    let mut begin = 0;
    let mut end = 0;
    while end < text.len() {
        end = text[begin..]
            .find('\n')
            .map_or(text.len(), |offset| begin + offset);
        lines.push((begin, end - begin));
        begin = end + 1;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_table_partitions_text() {
        let code = Code::named("a + b\nc\n\nd", "test.fx");
        assert_eq!(code.line_spans(), [(0, 5), (6, 1), (8, 0), (9, 1)]);
        assert_eq!(code.line(1).unwrap(), "a + b");
        assert_eq!(code.line(3).unwrap(), "");
        assert_eq!(code.line(4).unwrap(), "d");
    }

    #[test]
    fn trailing_newline_produces_empty_line() {
        let code = Code::named("x\n", "test.fx");
        assert_eq!(code.line_spans(), [(0, 1), (2, 0)]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        let code = Code::named("", "test.fx");
        assert_eq!(code.line_count(), 0);
        assert!(code.line_col(0).is_err());
    }

    #[test]
    fn line_col_lookup() {
        let code = Code::named("ab\ncd", "test.fx");
        assert_eq!(code.line_col(0).unwrap(), (1, 0));
        assert_eq!(code.line_col(1).unwrap(), (1, 1));
        // The `\n` terminator belongs to no line.
        assert!(code.line_col(2).is_err());
        assert_eq!(code.line_col(3).unwrap(), (2, 0));
        assert_eq!(code.line_col(4).unwrap(), (2, 1));
        assert!(code.line_col(5).is_err());
    }

    #[test]
    fn line_lookup_out_of_range() {
        let code = Code::named("x", "test.fx");
        assert!(code.line(0).is_err());
        assert!(code.line(2).is_err());
        assert!(code.lines(1, 2).is_err());
        assert_eq!(code.lines(1, 1).unwrap(), ["x"]);
    }

    #[test]
    fn random_names_differ() {
        let first = Code::new("1");
        let second = Code::new("1");
        assert_ne!(first.name(), second.name());
        assert!(first.name().ends_with(".fx"));
    }
}
