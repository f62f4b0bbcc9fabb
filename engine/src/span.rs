//! Locating parts of an expression for diagnostics.

use crate::Code;

/// A located region of source text.
///
/// `pointer` is a `begin`-relative offset marking the single most relevant
/// character within the region (e.g., an operator symbol); it is where the
/// caret lands in [rendered previews](Self::preview). Spans may cross line
/// boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeSpan {
    /// Byte offset of the first covered character.
    pub begin: usize,
    /// Number of covered bytes.
    pub length: usize,
    /// Offset of the caret character, relative to `begin`.
    pub pointer: usize,
}

impl CodeSpan {
    /// Creates a span with the caret on its first character.
    pub fn new(begin: usize, length: usize) -> Self {
        Self {
            begin,
            length,
            pointer: 0,
        }
    }

    /// Byte offset one past the last covered character.
    pub fn end(self) -> usize {
        self.begin + self.length
    }

    /// Renders a preview of the covered lines with a marker row under each:
    ///
    /// ```text
    /// 123 | The line that caused an error within it.
    ///     |                      <~~^~~~>
    /// ```
    ///
    /// The marker row uses `<` / `>` on the first / last covered column, `~`
    /// for the body and `^` at the caret column (the caret wins over the
    /// other markers). Spans covering several lines produce one source +
    /// marker pair per line, with markers running to the end of interior
    /// lines. Every emitted line is prefixed with `indent` spaces.
    ///
    /// Returns an empty string if the span does not lie within the code.
    pub fn preview(self, code: &Code, indent: usize) -> String {
        let last_pos = self.begin + self.length.saturating_sub(1);
        let pointer_pos = self.begin + self.pointer;

        let Ok((begin_line, begin_col)) = code.line_col(self.begin) else {
            return String::new();
        };
        let Ok((end_line, end_col_inc)) = code.line_col(last_pos) else {
            return String::new();
        };
        let (pointer_line, pointer_col) = code
            .line_col(pointer_pos)
            .unwrap_or((begin_line, begin_col));

        let width = end_line.to_string().len();
        let mut out = String::new();

        for ln in begin_line..=end_line {
            out.push_str(&" ".repeat(indent));
            out.push_str(&format!(
                "{ln:>width$} | {}\n",
                code.line(ln).unwrap_or_default()
            ));

            out.push_str(&" ".repeat(indent));
            out.push_str(&" ".repeat(width));
            out.push_str(" | ");

            let (_, line_len) = code.line_spans()[ln - 1];
            let start = if ln == begin_line { begin_col } else { 0 };
            let end = if ln == end_line { end_col_inc + 1 } else { line_len };

            out.push_str(&" ".repeat(start));
            for col in start..end {
                out.push(if ln == pointer_line && col == pointer_col {
                    '^'
                } else if ln == begin_line && col == start {
                    '<'
                } else if ln == end_line && col == end - 1 {
                    '>'
                } else {
                    '~'
                });
            }
            out.push('\n');
        }

        out
    }
}
