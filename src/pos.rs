//! Source text locations, used for assembler diagnostics.
//!
//! Bytecode has no source text, so everything downstream of the decoder identifies
//! locations by byte offset (`pc`) instead.

use std::fmt;
use std::ops::Range;

/// Helper to wrap a value in [`Sp`], as `sp!(span => value)`.
#[macro_export]
macro_rules! sp {
    ($span:expr => $expr:expr) => { $crate::pos::Sp { span: $span, value: $expr } };
}

/// A half-open byte range in a source string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const NULL: Span = Span { start: 0, end: 0 };

    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "backwards span {}..{}. This is a bug!", start, end);
        Span { start, end }
    }

    /// Span covering both `self` and `other`, and everything in between.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn range(self) -> Range<usize> { self.start..self.end }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self { Span::new(range.start, range.end) }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self { span.range() }
}

/// A value with an attached [`Span`].
///
/// Equality ignores the span.
#[derive(Copy, Clone, Default)]
pub struct Sp<T> {
    pub span: Span,
    pub value: T,
}

impl<T: fmt::Debug> fmt::Debug for Sp<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} @ {}..{}", self.value, self.span.start, self.span.end)
    }
}

impl<T: PartialEq> PartialEq for Sp<T> {
    fn eq(&self, other: &Self) -> bool { self.value == other.value }
}

impl<T: Eq> Eq for Sp<T> {}

impl<T> std::ops::Deref for Sp<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.value }
}

#[test]
fn span_merge() {
    let a = Span::new(4, 7);
    let b = Span::new(10, 12);
    assert_eq!(a.merge(b), Span::new(4, 12));
    assert_eq!(b.merge(a), Span::new(4, 12));
}
