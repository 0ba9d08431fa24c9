#[cfg(feature = "desc-json")]
use serde::{Deserialize, Serialize};

/// A byte offset range into one immutable source buffer, together with the
/// line and column of its start.
///
/// The empty span is canonical: any span with `start >= end` is "absent" and
/// compares equal to [`Span::EMPTY`] for that purpose.
#[cfg_attr(feature = "desc-json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: usize,
}

impl Span {
    pub const EMPTY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
    };

    pub fn new(start: usize, end: usize, line: u32, column: usize) -> Self {
        Span {
            start,
            end,
            line,
            column,
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Combines two spans. An empty operand yields the other span unchanged;
    /// two non-empty spans merge to `{self.start, other.end}` keeping the
    /// line and column of `self`.
    pub fn merge(&self, other: Span) -> Span {
        if self.is_empty() {
            other
        } else if other.is_empty() {
            *self
        } else {
            Span {
                start: self.start,
                end: other.end,
                line: self.line,
                column: self.column,
            }
        }
    }

    /// Slices `source` to this span's text, or `""` for an empty span.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        if self.is_empty() {
            ""
        } else {
            &source[self.start..self.end.min(source.len())]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Span::EMPTY, true)]
    #[case(Span::new(3, 3, 0, 3), true)]
    #[case(Span::new(5, 3, 0, 5), true)]
    #[case(Span::new(3, 5, 0, 3), false)]
    fn test_is_empty(#[case] span: Span, #[case] expected: bool) {
        assert_eq!(span.is_empty(), expected);
    }

    #[test]
    fn test_merge_empty_yields_other() {
        let span = Span::new(2, 7, 0, 2);
        assert_eq!(Span::EMPTY.merge(span), span);
        assert_eq!(span.merge(Span::EMPTY), span);
        assert_eq!(Span::EMPTY.merge(Span::EMPTY), Span::EMPTY);
    }

    #[test]
    fn test_merge_keeps_first_line_and_column() {
        let a = Span::new(2, 4, 1, 0);
        let b = Span::new(8, 12, 3, 2);
        assert_eq!(a.merge(b), Span::new(2, 12, 1, 0));
    }

    #[rstest]
    #[case(Span::new(0, 5, 0, 0), "hello")]
    #[case(Span::new(6, 11, 0, 6), "world")]
    #[case(Span::EMPTY, "")]
    fn test_text(#[case] span: Span, #[case] expected: &str) {
        assert_eq!(span.text("hello world"), expected);
    }

    #[test]
    fn test_len() {
        assert_eq!(Span::new(2, 7, 0, 2).len(), 5);
        assert_eq!(Span::EMPTY.len(), 0);
    }
}
