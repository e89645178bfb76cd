//! Source locations and spans.
//!
//! Every AST node carries a [`Span`] made of two [`Location`]s. Spans are
//! immutable once built by the parser; the only mutation is relocation
//! ([`Span::move_relative_to`]) when a node is re-anchored inside another
//! source context.

use std::fmt;

/// Error when building a span whose end precedes its start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanError {
    /// `end.offset < start.offset`.
    Inverted { start: u32, end: u32 },
}

impl fmt::Display for SpanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanError::Inverted { start, end } => {
                write!(f, "span end {end} precedes span start {start}")
            }
        }
    }
}

impl std::error::Error for SpanError {}

/// A position in a script.
///
/// - `offset`: absolute byte offset from the start of the file
/// - `line_offset`: offset of the first byte of the enclosing line
/// - `line_number`: zero-based line index
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Debug)]
pub struct Location {
    pub offset: u32,
    pub line_offset: u32,
    pub line_number: u32,
}

impl Location {
    /// Sentinel for synthetic nodes.
    pub const EMPTY: Location = Location {
        offset: 0,
        line_offset: 0,
        line_number: 0,
    };

    #[inline]
    pub const fn new(offset: u32, line_offset: u32, line_number: u32) -> Self {
        Location {
            offset,
            line_offset,
            line_number,
        }
    }

    /// One-based line number, for display.
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line_number + 1
    }

    /// One-based column, for display.
    #[inline]
    pub const fn column(&self) -> u32 {
        self.offset.saturating_sub(self.line_offset) + 1
    }

    /// Shift this location by `anchor`, adding `gap` extra bytes to the offset.
    ///
    /// Each coordinate saturates at `u32::MAX`.
    #[inline]
    #[must_use]
    pub const fn moved_relative_to(self, anchor: Location, gap: u32) -> Location {
        Location {
            offset: self.offset.saturating_add(anchor.offset).saturating_add(gap),
            line_offset: self.line_offset.saturating_add(anchor.line_offset),
            line_number: self.line_number.saturating_add(anchor.line_number),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line(), self.column())
    }
}

/// Source location span.
///
/// Invariant: `end.offset >= start.offset`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    /// Dummy span for synthetic nodes and not-yet-located errors.
    pub const DUMMY: Span = Span {
        start: Location::EMPTY,
        end: Location::EMPTY,
    };

    /// Build a span, checking the ordering invariant.
    #[inline]
    pub fn try_new(start: Location, end: Location) -> Result<Self, SpanError> {
        if end.offset < start.offset {
            return Err(SpanError::Inverted {
                start: start.offset,
                end: end.offset,
            });
        }
        Ok(Span { start, end })
    }

    /// Convenience for a span on a single line starting at `line_offset`.
    #[inline]
    pub const fn on_line(line_number: u32, line_offset: u32, start: u32, end: u32) -> Self {
        Span {
            start: Location::new(start, line_offset, line_number),
            end: Location::new(end, line_offset, line_number),
        }
    }

    /// True for the all-zero sentinel.
    #[inline]
    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.offset.saturating_sub(self.start.offset)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Merge two spans to create one covering both.
    #[inline]
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Span { start, end }
    }

    /// Re-anchor both ends of this span relative to the start of `anchor`.
    #[inline]
    pub fn move_relative_to(&mut self, anchor: &Span, gap: u32) {
        self.start = self.start.moved_relative_to(anchor.start, gap);
        self.end = self.end.moved_relative_to(anchor.start, gap);
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.offset, self.end.offset)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.start)
    }
}

/// Anything that carries a source span.
pub trait Spanned {
    fn span(&self) -> Span;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_span_basic() {
        let span = Span::on_line(2, 40, 44, 50);
        assert_eq!(span.len(), 6);
        assert!(!span.is_empty());
        assert!(!span.is_dummy());
        assert_eq!(span.to_string(), "3:5");
    }

    #[test]
    fn test_dummy_span() {
        assert!(Span::DUMMY.is_dummy());
        assert!(Span::default().is_dummy());
        assert_eq!(Span::DUMMY.len(), 0);
    }

    #[test]
    fn test_try_new_rejects_inverted() {
        let result = Span::try_new(Location::new(10, 0, 0), Location::new(5, 0, 0));
        assert_eq!(result, Err(SpanError::Inverted { start: 10, end: 5 }));
        let msg = SpanError::Inverted { start: 10, end: 5 }.to_string();
        assert!(msg.contains("precedes"));
    }

    #[test]
    fn test_span_merge_disjoint() {
        let a = Span::on_line(0, 0, 0, 10);
        let b = Span::on_line(1, 20, 20, 30);
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 30);
        assert_eq!(merged.end.line_number, 1);
    }

    #[test]
    fn test_move_relative_to() {
        let anchor = Span::on_line(4, 100, 108, 140);
        let mut inner = Span::on_line(1, 10, 12, 15);
        inner.move_relative_to(&anchor, 2);
        assert_eq!(inner.start, Location::new(122, 110, 5));
        assert_eq!(inner.end, Location::new(125, 110, 5));
        assert_eq!(inner.len(), 3);
    }

    #[test]
    fn test_move_relative_to_saturates() {
        let anchor = Span::on_line(u32::MAX - 1, u32::MAX - 4, u32::MAX - 2, u32::MAX);
        let mut inner = Span::on_line(3, 10, 12, 15);
        inner.move_relative_to(&anchor, 8);
        assert_eq!(inner.start, Location::new(u32::MAX, u32::MAX, u32::MAX));
        assert_eq!(inner.end, Location::new(u32::MAX, u32::MAX, u32::MAX));
        assert!(inner.is_empty());
    }
}
