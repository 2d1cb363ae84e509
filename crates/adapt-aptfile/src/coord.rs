use std::fmt;
use std::sync::Arc;

/// A half-open column range on one Aptfile line.
///
/// Columns are byte offsets into the line and always fall on character
/// boundaries. The line text is shared, so every token of a line points at the
/// same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    line: Arc<str>,
    line_number: usize,
    start: usize,
    end: usize,
}

impl Coordinate {
    /// A coordinate spanning the whole of `line`.
    pub fn whole_line(line_number: usize, line: impl Into<Arc<str>>) -> Self {
        let line = line.into();
        let end = line.len();
        Self {
            line,
            line_number,
            start: 0,
            end,
        }
    }

    /// Build a coordinate from explicit columns, clamped so that
    /// `start <= end <= line.len()`.
    pub fn new(line_number: usize, line: impl Into<Arc<str>>, start: usize, end: usize) -> Self {
        let line = line.into();
        let end = end.min(line.len());
        let start = start.min(end);
        Self {
            line,
            line_number,
            start,
            end,
        }
    }

    /// Another span on the same line.
    pub(crate) fn span(&self, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= self.line.len());
        Self {
            line: Arc::clone(&self.line),
            line_number: self.line_number,
            start,
            end,
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The text covered by this span.
    pub fn text(&self) -> &str {
        self.line.get(self.start..self.end).unwrap_or_default()
    }

    /// Render `message` under the source line with carets marking the span:
    ///
    /// ```text
    /// 20 | deb http://www.example.com
    ///          ^^^^^^^^^^^^^^^^^^^^^^ argument with colon must be quoted
    /// ```
    pub fn annotate(&self, message: impl fmt::Display) -> String {
        let number = self.line_number.to_string();
        let indent = char_columns(&self.line, 0, self.start);
        let width = char_columns(&self.line, self.start, self.end).max(1);
        format!(
            "{number} | {line}\n{gutter}   {indent}{carets} {message}",
            line = self.line,
            gutter = " ".repeat(number.len()),
            indent = " ".repeat(indent),
            carets = "^".repeat(width),
        )
    }
}

fn char_columns(line: &str, start: usize, end: usize) -> usize {
    line.get(start..end)
        .map_or(end.saturating_sub(start), |s| s.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotates_span_under_line() {
        let coord = Coordinate::new(20, "deb http://www.example.com", 4, 26);
        assert_eq!(
            coord.annotate("argument with colon must be quoted"),
            "20 | deb http://www.example.com\n         ^^^^^^^^^^^^^^^^^^^^^^ argument with colon must be quoted"
        );
    }

    #[test]
    fn zero_width_span_draws_one_caret() {
        let coord = Coordinate::new(3, "package", 7, 7);
        assert_eq!(
            coord.annotate("expected argument"),
            "3 | package\n           ^ expected argument"
        );
    }

    #[test]
    fn text_returns_spanned_slice() {
        let line = Coordinate::whole_line(1, "hold curl");
        assert_eq!(line.text(), "hold curl");
        assert_eq!(line.span(5, 9).text(), "curl");
    }

    #[test]
    fn new_clamps_out_of_range_columns() {
        let coord = Coordinate::new(1, "ppa", 10, 12);
        assert_eq!(coord.start(), 3);
        assert_eq!(coord.end(), 3);
        assert_eq!(coord.text(), "");
    }

    #[test]
    fn carets_align_on_characters_not_bytes() {
        // "é" is two bytes wide in UTF-8.
        let coord = Coordinate::new(1, "hold \"é\" x", 10, 11);
        let rendered = coord.annotate("oops");
        let caret_line = rendered.lines().nth(1).unwrap();
        assert_eq!(caret_line, "             ^ oops");
    }
}
