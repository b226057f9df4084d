use crate::token::{Span, TokSpan};

/// A forward-only cursor over the tokens of one input.
///
/// Tokens are handed out in document order. Once consumed, a token is never seen again.
pub(crate) struct TokenQueue<'source> {
    tokens: Vec<TokSpan<'source>>,
    next: usize,
    input_length: usize,
}

impl<'source> TokenQueue<'source> {
    pub(crate) fn new(tokens: Vec<TokSpan<'source>>, input_length: usize) -> Self {
        TokenQueue {
            tokens,
            next: 0,
            input_length,
        }
    }

    /// Peek at the next token without consuming it.
    #[inline]
    pub(crate) fn peek(&self) -> Option<&TokSpan<'source>> {
        self.tokens.get(self.next)
    }

    /// Returns `true` if the next token is exactly `token`.
    #[inline]
    pub(crate) fn next_is(&self, token: &str) -> bool {
        self.peek().is_some_and(|tok| tok.token() == token)
    }

    pub(crate) fn next(&mut self) -> Option<TokSpan<'source>> {
        let tok = self.tokens.get_mut(self.next)?;
        self.next += 1;
        // The slot is never read again except for its span, so the text can be moved out.
        let span = tok.span();
        Some(std::mem::replace(tok, TokSpan::new("", span)))
    }

    /// The span of the next token, or an empty span at the end of the input.
    pub(crate) fn next_span(&self) -> Span {
        self.peek()
            .map_or(Span::zero_width(self.input_length), TokSpan::span)
    }

    /// The span of the most recently consumed token.
    pub(crate) fn last_span(&self) -> Span {
        match self.next.checked_sub(1) {
            Some(index) => self.tokens.get(index).map_or(Span::default(), TokSpan::span),
            None => Span::zero_width(0),
        }
    }

    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.next >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::TokenQueue;
    use crate::token::{Span, TokSpan};

    fn queue() -> TokenQueue<'static> {
        TokenQueue::new(
            vec![
                TokSpan::new("x", Span::new(0, 1)),
                TokSpan::new("^", Span::new(1, 2)),
                TokSpan::new("2", Span::new(2, 3)),
            ],
            3,
        )
    }

    #[test]
    fn consumes_in_order() {
        let mut queue = queue();
        assert!(queue.next_is("x"));
        assert_eq!(queue.next().map(|tok| tok.into_token()), Some("x".into()));
        assert_eq!(queue.peek().map(TokSpan::token), Some("^"));
        assert_eq!(queue.next_span(), Span::new(1, 2));
        queue.next();
        queue.next();
        assert!(queue.is_exhausted());
        assert!(queue.next().is_none());
        assert_eq!(queue.next_span(), Span::zero_width(3));
    }

    #[test]
    fn last_span_keeps_position_after_move() {
        let mut queue = queue();
        assert_eq!(queue.last_span(), Span::zero_width(0));
        queue.next();
        queue.next();
        assert_eq!(queue.last_span(), Span::new(1, 2));
    }
}
