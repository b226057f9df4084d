use std::borrow::Cow;
use std::ops::Range;

/// A byte range into the LaTeX source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    #[inline]
    pub const fn zero_width(at: usize) -> Self {
        Span { start: at, end: at }
    }
}

impl From<Span> for Range<usize> {
    #[inline]
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token together with its span in the input string.
///
/// Tokens are plain strings classified by their shape: `\frac`, `x`, `12.5`, `2em`,
/// `\begin{matrix}` and so on. Most tokens borrow from the source; tokens with whitespace
/// stripped out (like `\begin {matrix}`) or substituted symbols are owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokSpan<'source>(Cow<'source, str>, Span);

impl<'source> TokSpan<'source> {
    #[inline]
    pub fn new(token: impl Into<Cow<'source, str>>, span: Span) -> Self {
        TokSpan(token.into(), span)
    }

    #[inline]
    pub fn token(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_token(self) -> Cow<'source, str> {
        self.0
    }

    #[inline]
    pub fn into_parts(self) -> (Cow<'source, str>, Span) {
        (self.0, self.1)
    }

    #[inline]
    pub fn span(&self) -> Span {
        self.1
    }
}
