use std::borrow::Cow;

use crate::ast::{Delimiter, Node};
use crate::commands::{
    self, ABOVE, ABOVEWITHDELIMS, APOSTROPHE, ATOP, ATOPWITHDELIMS, BRACE, BRACES, BRACK, CHOOSE,
    CLOSING_BRACE, CLOSING_BRACKET, DISPLAYSTYLE, FRAC, GENFRAC, LEFT, LIMITS, MATH, MIDDLE, NOT,
    OF, OPENING_BRACE, OPENING_BRACKET, OVERBRACE, PRIME, RIGHT, ROOT, SCRIPTSCRIPTSTYLE,
    SCRIPTSTYLE, SIDESET, SKEW, SQRT, SUBSCRIPT, SUBSUP, SUPERSCRIPT, Shape, TEXTSTYLE,
    UNDERBRACE, VPHANTOM,
};
use crate::error::{DelimiterModifier, LatexErrKind, LatexError, ScriptKind};
use crate::lexer::Lexer;
use crate::symbols::SymbolTable;
use crate::token::Span;
use crate::token_queue::TokenQueue;

pub(crate) type ParseResult<T> = Result<T, Box<LatexError>>;

/// How many nodes a call to [`Parser::parse_sequence`] may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Limit {
    Unbounded,
    Nodes(usize),
}

/// What a token contributed to the sequence being built.
enum Step {
    Push(Node),
    /// The nodes were already placed into the sequence.
    Pushed,
    /// The token consumed everything up to the enclosing terminator.
    Finish,
}

#[inline]
pub(crate) fn error(span: Span, kind: LatexErrKind) -> Box<LatexError> {
    Box::new(LatexError(span.into(), kind))
}

/// Builds the syntax tree from the token stream, in a single forward pass.
pub(crate) struct Parser<'source, 'symbols> {
    pub(crate) tokens: TokenQueue<'source>,
    symbols: &'symbols SymbolTable,
    /// A terminator consumed inside an argument, owed to the enclosing sequence.
    pending_marker: Option<Node>,
}

impl<'source, 'symbols> Parser<'source, 'symbols> {
    pub(crate) fn new(input: &'source str, symbols: &'symbols SymbolTable) -> Self {
        let tokens = Lexer::new(input, symbols).tokenize();
        Parser {
            tokens: TokenQueue::new(tokens, input.len()),
            symbols,
            pending_marker: None,
        }
    }

    /// Parse the whole input. Empty input gives an empty tree.
    pub(crate) fn parse(&mut self) -> ParseResult<Vec<Node>> {
        if self.tokens.is_exhausted() {
            return Ok(Vec::new());
        }
        self.parse_sequence(None, Limit::Unbounded)
    }

    /// Parse nodes until `terminator`, the end of the input, or the limit is reached.
    ///
    /// When the terminator is found, a marker node for it ends the returned list; callers strip
    /// it. Reaching the terminator before a bounded limit is filled is an error. A construct that
    /// runs up to the terminator inside a bounded argument leaves the marker to the enclosing
    /// sequence.
    pub(crate) fn parse_sequence(
        &mut self,
        terminator: Option<&str>,
        limit: Limit,
    ) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut consumed = false;
        loop {
            if let Some(marker) = self.pending_marker.take() {
                if limit != Limit::Unbounded {
                    return Err(error(self.tokens.last_span(), LatexErrKind::MissingArgument));
                }
                consumed = true;
                nodes.push(marker);
                break;
            }
            let Some(tok) = self.tokens.next() else {
                break;
            };
            consumed = true;
            let (token, span) = tok.into_parts();
            if terminator.is_some_and(|t| t == token) {
                if limit != Limit::Unbounded {
                    return Err(error(span, LatexErrKind::MissingArgument));
                }
                let mut marker = Node::leaf(token);
                if marker.is(RIGHT)
                    && let Some(delimiter) = self.tokens.next()
                {
                    let delimiter = delimiter.into_token().into_owned();
                    marker.delimiter = Some(Delimiter::Single(delimiter));
                }
                nodes.push(marker);
                break;
            }
            match self.parse_token(token, span, terminator, &mut nodes)? {
                Step::Push(node) => nodes.push(node),
                Step::Pushed => {}
                Step::Finish => break,
            }
            if let Limit::Nodes(n) = limit
                && nodes.len() >= n
            {
                break;
            }
        }
        if !consumed {
            return Err(error(self.tokens.next_span(), LatexErrKind::NoTokens));
        }
        if let Limit::Nodes(n) = limit {
            let closed = terminator
                .is_some_and(|t| nodes.last().is_some_and(|node| node.is_leaf() && node.is(t)));
            if closed && nodes.len() > n {
                // `\color`, `\over` and friends ran up to the terminator; hand it back.
                self.pending_marker = nodes.pop();
            } else if nodes.len() < n || closed {
                return Err(error(self.tokens.last_span(), LatexErrKind::MissingArgument));
            }
        }
        Ok(nodes)
    }

    /// Like [`parse_sequence`](Self::parse_sequence) without a limit, but an exhausted input
    /// gives an empty list.
    pub(crate) fn parse_optional(&mut self, terminator: Option<&str>) -> ParseResult<Vec<Node>> {
        if self.pending_marker.is_none() && self.tokens.is_exhausted() {
            return Ok(Vec::new());
        }
        self.parse_sequence(terminator, Limit::Unbounded)
    }

    /// Parse up to `closing` and drop the closing marker.
    pub(crate) fn parse_group(&mut self, closing: &str) -> ParseResult<Vec<Node>> {
        let mut children = self.parse_optional(Some(closing))?;
        if children.last().is_some_and(|node| node.is(closing)) {
            children.pop();
        }
        Ok(children)
    }

    /// Parse up to the enclosing terminator, splitting off its marker.
    fn parse_rest(&mut self, terminator: Option<&str>) -> ParseResult<(Vec<Node>, Option<Node>)> {
        let mut children = self.parse_optional(terminator)?;
        let marker = match terminator {
            Some(t) if children.last().is_some_and(|node| node.is(t)) => children.pop(),
            _ => None,
        };
        Ok((children, marker))
    }

    fn parse_arguments(&mut self, terminator: Option<&str>, count: usize) -> ParseResult<Vec<Node>> {
        self.parse_sequence(terminator, Limit::Nodes(count))
    }

    /// Parse exactly one argument.
    fn parse_argument(&mut self, terminator: Option<&str>) -> ParseResult<Node> {
        let nodes = self.parse_arguments(terminator, 1)?;
        Ok(collapse(nodes))
    }

    /// Take the next token verbatim.
    fn raw_argument(&mut self, terminator: Option<&str>) -> ParseResult<String> {
        if self.pending_marker.is_some() || terminator.is_some_and(|t| self.tokens.next_is(t)) {
            return Err(error(self.tokens.next_span(), LatexErrKind::MissingArgument));
        }
        match self.tokens.next() {
            Some(tok) => Ok(tok.into_token().into_owned()),
            None => Err(error(self.tokens.next_span(), LatexErrKind::NoTokens)),
        }
    }

    fn parse_token(
        &mut self,
        token: Cow<'source, str>,
        span: Span,
        terminator: Option<&str>,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<Step> {
        if (token == RIGHT || token == MIDDLE) && terminator != Some(RIGHT) {
            let modifier = if token == RIGHT {
                DelimiterModifier::Right
            } else {
                DelimiterModifier::Middle
            };
            return Err(error(span, LatexErrKind::UnbalancedDelimiter(modifier)));
        }
        if token.starts_with(r"\begin{") {
            return Ok(Step::Push(self.parse_environment(&token, span)?));
        }
        match &*token {
            LEFT => return self.parse_left(span),
            OPENING_BRACE => {
                return Ok(Step::Push(Node::braces(self.parse_group(CLOSING_BRACE)?)));
            }
            SUBSCRIPT | SUPERSCRIPT => {
                let is_sub = token == SUBSCRIPT;
                return Ok(Step::Push(self.parse_script(is_sub, span, terminator, nodes)?));
            }
            APOSTROPHE => return Ok(Step::Push(attach_prime(nodes))),
            _ => {}
        }
        self.parse_command(token, span, terminator, nodes)
    }

    fn parse_left(&mut self, span: Span) -> ParseResult<Step> {
        let unbalanced = || error(span, LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Left));
        let Some(delimiter) = self.tokens.next() else {
            return Err(unbalanced());
        };
        let children = self.parse_optional(Some(RIGHT))?;
        if !children.last().is_some_and(|node| node.is(RIGHT)) {
            return Err(unbalanced());
        }
        Ok(Step::Push(Node {
            token: LEFT.to_string(),
            children: Some(children),
            delimiter: Some(Delimiter::Single(delimiter.into_token().into_owned())),
            ..Default::default()
        }))
    }

    fn parse_script(
        &mut self,
        is_sub: bool,
        span: Span,
        terminator: Option<&str>,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<Node> {
        let mut previous = nodes.pop().unwrap_or_else(|| Node::braces(Vec::new()));

        if is_sub && (previous.is(SUBSCRIPT) || previous.is(SUBSUP)) {
            return Err(error(span, LatexErrKind::DoubleScript(ScriptKind::Sub)));
        }
        let sup_index = superscript_index(&previous);
        let prime_sup = sup_index.is_some_and(|index| {
            previous
                .children()
                .get(index)
                .is_some_and(|sup| commands::is_prime(&sup.token))
        });
        if !is_sub && sup_index.is_some() && !prime_sup {
            return Err(error(span, LatexErrKind::DoubleScript(ScriptKind::Sup)));
        }

        let mut modifier = None;
        if previous.is(LIMITS) && previous.is_leaf() {
            modifier = Some(LIMITS);
            previous = match nodes.pop() {
                Some(operator) if is_named_operator(&operator) => operator,
                _ => return Err(error(span, LatexErrKind::LimitsRequireOperator)),
            };
        }

        let argument = self.parse_argument(terminator)?;
        let fusable = modifier.is_none() && !previous.is_leaf();
        let pair = previous.children().len() == 2;
        if fusable && pair && is_sub && previous.is(SUPERSCRIPT) {
            // x^a_b and x_a^b both become [base, sub, sup].
            let mut children = previous.children.take().unwrap_or_default();
            children.insert(1, argument);
            return Ok(fused(SUBSUP, children, previous.modifier));
        }
        if fusable && pair && !is_sub && previous.is(SUBSCRIPT) {
            let mut children = previous.children.take().unwrap_or_default();
            children.push(argument);
            return Ok(fused(SUBSUP, children, previous.modifier));
        }
        if fusable && prime_sup {
            // x'^2: the prime and the exponent share the superscript.
            let mut children = previous.children.take().unwrap_or_default();
            if let Some(prime) = children.pop() {
                children.push(Node::braces(vec![prime, argument]));
            }
            return Ok(fused(&previous.token, children, previous.modifier));
        }

        if previous.is(OVERBRACE) {
            modifier = Some(OVERBRACE);
        } else if previous.is(UNDERBRACE) {
            modifier = Some(UNDERBRACE);
        }
        let token = if is_sub { SUBSCRIPT } else { SUPERSCRIPT };
        Ok(fused(token, vec![previous, argument], modifier))
    }

    fn parse_command(
        &mut self,
        token: Cow<'source, str>,
        span: Span,
        terminator: Option<&str>,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<Step> {
        let shape = commands::shape(&token).or_else(|| {
            (token.starts_with(MATH) && !self.symbols.contains(&token)).then_some(Shape::OneParam)
        });
        let Some(shape) = shape else {
            return Ok(Step::Push(Node::leaf(token)));
        };
        let node = match shape {
            Shape::OneParam => Node::with_children(token, self.parse_arguments(terminator, 1)?),
            Shape::TwoParams => Node::with_children(token, self.parse_arguments(terminator, 2)?),
            Shape::Reversed => {
                let mut children = self.parse_arguments(terminator, 2)?;
                children.reverse();
                Node::with_children(token, children)
            }
            Shape::Not => return self.parse_not(terminator, nodes),
            Shape::ArrowWithLabel => {
                let children = if self.tokens.next_is(OPENING_BRACKET) {
                    self.tokens.next();
                    let label = self.parse_group(CLOSING_BRACKET)?;
                    vec![Node::braces(label), self.parse_argument(terminator)?]
                } else {
                    vec![self.parse_argument(terminator)?]
                };
                Node::with_children(token, children)
            }
            Shape::Space => {
                let argument = self.parse_argument(terminator)?;
                let width = flat_text(&argument);
                if width.is_empty() {
                    return Err(error(
                        self.tokens.last_span(),
                        LatexErrKind::InvalidWidth(width.into()),
                    ));
                }
                let mut node = Node::leaf(token);
                node.set_attr("width", width);
                node
            }
            Shape::Color => {
                let color = self.raw_argument(terminator)?;
                let (children, marker) = self.parse_rest(terminator)?;
                let mut node = Node::with_children(token, children);
                node.set_attr("mathcolor", color);
                nodes.push(node);
                nodes.extend(marker);
                return Ok(Step::Finish);
            }
            Shape::Style => {
                let style = self.raw_argument(terminator)?;
                let mut node = self.parse_argument(terminator)?;
                node.set_attr("style", style);
                node
            }
            Shape::RawText => Node {
                text: Some(self.raw_argument(terminator)?),
                ..Node::leaf(token)
            },
            Shape::Href => {
                let url = self.raw_argument(terminator)?;
                let mut node = Node::with_children(token, self.parse_arguments(terminator, 1)?);
                node.set_attr("href", url);
                node
            }
            Shape::LegacyFraction => {
                return self.parse_legacy_fraction(&token, span, terminator, nodes);
            }
            Shape::Sqrt => self.parse_sqrt(terminator)?,
            Shape::Root => {
                let index = self.parse_group(OF)?;
                let radicand = self.parse_argument(terminator)?;
                Node::with_children(ROOT, vec![radicand, collapse(index)])
            }
            Shape::Matrix => {
                if self.tokens.next_is(OPENING_BRACE) {
                    self.tokens.next();
                    Node::with_children(token, self.parse_group(CLOSING_BRACE)?)
                } else {
                    let (mut children, marker) = self.parse_rest(terminator)?;
                    if children.len() == 1 && children[0].is(BRACES) {
                        children = children.pop().and_then(|group| group.children).unwrap_or_default();
                    }
                    nodes.push(Node::with_children(token, children));
                    nodes.extend(marker);
                    return Ok(Step::Finish);
                }
            }
            Shape::Genfrac => self.parse_genfrac(terminator)?,
            Shape::Sideset => self.parse_sideset(terminator)?,
            Shape::Skew => self.parse_skew(span, terminator)?,
        };
        Ok(Step::Push(node))
    }

    /// `\not=` becomes `\ne`, `\not\in` becomes `\nin` and so on, when the negated symbol exists.
    fn parse_not(&mut self, terminator: Option<&str>, nodes: &mut Vec<Node>) -> ParseResult<Step> {
        let target = self.parse_argument(terminator)?;
        if target.is_leaf()
            && let Some(negated) = self.negated(&target.token)
        {
            return Ok(Step::Push(Node::leaf(negated)));
        }
        nodes.push(Node::leaf(NOT));
        nodes.push(target);
        Ok(Step::Pushed)
    }

    fn negated(&self, token: &str) -> Option<String> {
        match token {
            "=" => Some(r"\ne".to_string()),
            "<" => Some(r"\nless".to_string()),
            ">" => Some(r"\ngtr".to_string()),
            _ => {
                let name = token.strip_prefix('\\')?;
                let negated = format!(r"\n{name}");
                self.symbols.contains(&negated).then_some(negated)
            }
        }
    }

    /// `\over` and friends: everything before is the numerator, everything after (up to the
    /// end of the group) the denominator.
    fn parse_legacy_fraction(
        &mut self,
        token: &str,
        span: Span,
        terminator: Option<&str>,
        nodes: &mut Vec<Node>,
    ) -> ParseResult<Step> {
        let mut fraction = Node::leaf(FRAC);
        let defaults = match token {
            BRACE => Some(("{", "}")),
            BRACK => Some(("[", "]")),
            CHOOSE => Some(("(", ")")),
            _ => None,
        };
        if let Some((open, close)) = defaults {
            fraction.delimiter = Some(Delimiter::Pair(Some(open.into()), Some(close.into())));
        }
        if token == ABOVEWITHDELIMS || token == ATOPWITHDELIMS {
            let open = self.parse_delimiter(terminator)?;
            let close = self.parse_delimiter(terminator)?;
            fraction.delimiter = Some(Delimiter::Pair(open, close));
        }
        match token {
            ABOVE | ABOVEWITHDELIMS => {
                let thickness = self.parse_argument(terminator)?;
                fraction.set_attr("linethickness", flat_text(&thickness));
            }
            ATOP | ATOPWITHDELIMS | BRACE | BRACK | CHOOSE => {
                fraction.set_attr("linethickness", "0");
            }
            _ => {}
        }

        let (mut denominator, marker) = self.parse_rest(terminator)?;
        if denominator.is_empty() {
            if defaults.is_none() {
                return Err(error(span, LatexErrKind::MissingDenominator));
            }
            denominator.push(Node::braces(Vec::new()));
        }
        let mut numerator = std::mem::take(nodes);
        if numerator.is_empty() {
            if defaults.is_none() {
                return Err(error(span, LatexErrKind::MissingNumerator));
            }
            numerator.push(Node::braces(Vec::new()));
        }
        fraction.children = Some(vec![collapse(numerator), collapse(denominator)]);
        nodes.push(fraction);
        nodes.extend(marker);
        Ok(Step::Finish)
    }

    /// A delimiter given as a bare token or in braces; `.` and `{}` mean none.
    fn parse_delimiter(&mut self, terminator: Option<&str>) -> ParseResult<Option<String>> {
        let mut delimiter = self.raw_argument(terminator)?;
        if delimiter == OPENING_BRACE {
            delimiter.clear();
            while let Some(tok) = self.tokens.next() {
                if tok.token() == CLOSING_BRACE {
                    break;
                }
                delimiter.push_str(tok.token());
            }
        }
        Ok((!delimiter.is_empty() && delimiter != ".").then_some(delimiter))
    }

    fn parse_sqrt(&mut self, terminator: Option<&str>) -> ParseResult<Node> {
        if !self.tokens.next_is(OPENING_BRACKET) {
            return Ok(Node::with_children(SQRT, vec![self.parse_argument(terminator)?]));
        }
        self.tokens.next();
        let index = self.parse_group(CLOSING_BRACKET)?;
        let radicand = self.parse_argument(terminator)?;
        if index.is_empty() {
            Ok(Node::with_children(SQRT, vec![radicand]))
        } else {
            Ok(Node::with_children(ROOT, vec![radicand, collapse(index)]))
        }
    }

    /// `\genfrac{left}{right}{thickness}{style}{numerator}{denominator}`
    fn parse_genfrac(&mut self, terminator: Option<&str>) -> ParseResult<Node> {
        let open = self.parse_delimiter(terminator)?;
        let close = self.parse_delimiter(terminator)?;
        let thickness = flat_text(&self.parse_argument(terminator)?);
        let style = flat_text(&self.parse_argument(terminator)?);
        let mut fraction = Node::with_children(GENFRAC, self.parse_arguments(terminator, 2)?);
        if open.is_some() || close.is_some() {
            fraction.delimiter = Some(Delimiter::Pair(open, close));
        }
        if !thickness.is_empty() {
            fraction.set_attr("linethickness", thickness);
        }
        let switch = match style.as_str() {
            "0" => Some(DISPLAYSTYLE),
            "1" => Some(TEXTSTYLE),
            "2" => Some(SCRIPTSTYLE),
            "3" => Some(SCRIPTSCRIPTSTYLE),
            _ => None,
        };
        Ok(match switch {
            Some(switch) => Node::braces(vec![Node::leaf(switch), fraction]),
            None => fraction,
        })
    }

    /// `\sideset{_a^b}{_c^d}\sum` places scripts on both sides of the operator.
    fn parse_sideset(&mut self, terminator: Option<&str>) -> ParseResult<Node> {
        let mut arguments = self.parse_arguments(terminator, 3)?.into_iter();
        let (Some(left), Some(right), Some(operator)) =
            (arguments.next(), arguments.next(), arguments.next())
        else {
            return Err(error(self.tokens.last_span(), LatexErrKind::MissingArgument));
        };
        let mut operator = Node {
            token: operator.token,
            children: operator.children,
            ..Default::default()
        };
        operator.set_attr("movablelimits", "false");

        let (left_token, left_scripts) = split_scripts(left);
        let (right_token, right_scripts) = split_scripts(right);
        let phantom = Node::with_children(VPHANTOM, vec![operator.clone()]);
        let left = Node::with_children(
            left_token,
            std::iter::once(phantom).chain(left_scripts).collect(),
        );
        let right = Node::with_children(
            right_token,
            std::iter::once(operator).chain(right_scripts).collect(),
        );
        Ok(Node::with_children(SIDESET, vec![left, right]))
    }

    /// `\skew{width}{accent}`; the width is in units of 1/18 em.
    fn parse_skew(&mut self, span: Span, terminator: Option<&str>) -> ParseResult<Node> {
        let mut arguments = self.parse_arguments(terminator, 2)?.into_iter();
        let (Some(width), Some(target)) = (arguments.next(), arguments.next()) else {
            return Err(error(self.tokens.last_span(), LatexErrKind::MissingArgument));
        };
        let width = flat_text(&width);
        let Some(em) = width.parse::<i64>().ok().and_then(skew_width) else {
            return Err(error(span, LatexErrKind::InvalidWidth(width.into())));
        };
        let mut node = Node::with_children(SKEW, vec![target]);
        node.set_attr("width", em);
        Ok(node)
    }
}

fn fused(token: &str, children: Vec<Node>, modifier: Option<&'static str>) -> Node {
    Node {
        modifier,
        ..Node::with_children(token, children)
    }
}

/// The position of the superscript in a script node, if it has one.
fn superscript_index(node: &Node) -> Option<usize> {
    match (node.token.as_str(), node.children().len()) {
        (SUPERSCRIPT, 2) => Some(1),
        (SUBSUP, 3) => Some(2),
        _ => None,
    }
}

/// Commands like `\sum` or `\lim`, which `\limits` may follow.
fn is_named_operator(node: &Node) -> bool {
    node.is_leaf() && node.token.starts_with('\\') && node.token.len() > 2
}

/// Attach a prime to the previous node, extending an existing prime chain.
fn attach_prime(nodes: &mut Vec<Node>) -> Node {
    let mut previous = nodes.pop().unwrap_or_else(|| Node::braces(Vec::new()));
    if let Some(index) = superscript_index(&previous)
        && let Some(sup) = previous.children.as_mut().and_then(|c| c.get_mut(index))
    {
        extend_prime(sup);
        return previous;
    }
    if previous.is(SUBSCRIPT) && previous.children().len() == 2 {
        if let Some(children) = previous.children.as_mut() {
            children.push(Node::leaf(PRIME));
        }
        previous.token = SUBSUP.to_string();
        return previous;
    }
    Node::with_children(SUPERSCRIPT, vec![previous, Node::leaf(PRIME)])
}

/// `\prime` becomes `\dprime` and so on; anything else gets a prime appended.
fn extend_prime(sup: &mut Node) {
    if sup.is_leaf()
        && let Some(next) = commands::next_prime(&sup.token)
    {
        sup.token = next.to_string();
        return;
    }
    if sup.is(BRACES)
        && let Some(children) = sup.children.as_mut()
    {
        let next = children
            .last()
            .filter(|last| last.is_leaf())
            .and_then(|last| commands::next_prime(&last.token));
        match (next, children.last_mut()) {
            (Some(next), Some(last)) => last.token = next.to_string(),
            _ => children.push(Node::leaf(PRIME)),
        }
        return;
    }
    let old = std::mem::take(sup);
    *sup = Node::braces(vec![old, Node::leaf(PRIME)]);
}

/// A single node stays as it is; anything else is grouped in braces.
pub(crate) fn collapse(mut nodes: Vec<Node>) -> Node {
    if nodes.len() == 1
        && let Some(node) = nodes.pop()
    {
        return node;
    }
    Node::braces(nodes)
}

/// The literal text of an argument: a token, or the tokens of a braces group.
pub(crate) fn flat_text(node: &Node) -> String {
    if node.is(BRACES) {
        node.children().iter().map(|child| child.token.as_str()).collect()
    } else {
        node.token.clone()
    }
}

/// Splits `{_a^b}` into the script kind and its scripts.
fn split_scripts(node: Node) -> (&'static str, Vec<Node>) {
    let script = match node.children.as_deref() {
        Some([only]) if node.is(BRACES) => only,
        _ => return (BRACES, Vec::new()),
    };
    let token = match script.token.as_str() {
        SUBSCRIPT => SUBSCRIPT,
        SUPERSCRIPT => SUPERSCRIPT,
        SUBSUP => SUBSUP,
        _ => return (BRACES, Vec::new()),
    };
    (token, script.children().iter().skip(1).cloned().collect())
}

/// `value`/18 em, written without trailing zeros.
fn skew_width(value: i64) -> Option<String> {
    // 1/18 em is 0.0555 em, computed in units of 1/10000 em.
    let units = value.unsigned_abs().checked_mul(555)?;
    let (whole, fraction) = (units / 10000, units % 10000);
    let mut width = String::new();
    if value < 0 {
        width.push('-');
    }
    width += &whole.to_string();
    if fraction != 0 {
        let digits = format!("{fraction:04}");
        width.push('.');
        width.push_str(digits.trim_end_matches('0'));
    }
    width.push_str("em");
    Some(width)
}

#[cfg(test)]
mod tests {
    use super::{Parser, skew_width};
    use crate::ast::{Delimiter, Node};
    use crate::error::{DelimiterModifier, LatexErrKind, ScriptKind};
    use crate::symbols::SymbolTable;

    fn parse(input: &str) -> Vec<Node> {
        Parser::new(input, SymbolTable::bundled())
            .parse()
            .unwrap_or_else(|err| panic!("failed to parse {input:?}: {err}"))
    }

    fn parse_err(input: &str) -> LatexErrKind {
        match Parser::new(input, SymbolTable::bundled()).parse() {
            Ok(nodes) => panic!("expected an error for {input:?}, got {nodes:?}"),
            Err(err) => err.1,
        }
    }

    /// A compact rendering of the tree: `token[child child]`.
    fn show(nodes: &[Node]) -> String {
        nodes.iter().map(show_node).collect::<Vec<_>>().join(" ")
    }

    fn show_node(node: &Node) -> String {
        let mut out = node.token.clone();
        if let Some(text) = &node.text {
            out += &format!("<{text}>");
        }
        if let Some(children) = &node.children {
            out += &format!("[{}]", show(children));
        }
        out
    }

    #[test]
    fn tree_shapes() {
        let problems = [
            ("empty", "", ""),
            ("letters", "ab", "a b"),
            ("superscript", "x^2", "^[x 2]"),
            ("subsup", "x_1^2", "_^[x 1 2]"),
            ("supsub", "x^2_1", "_^[x 1 2]"),
            ("script_without_base", "^2", "^[{}[] 2]"),
            ("braces", "{a b}", "{}[a b]"),
            ("empty_braces", "{}", "{}[]"),
            ("nested_braces", "{{a}}", "{}[{}[a]]"),
            ("frac", r"\frac{1}{2}", r"\frac[{}[1] {}[2]]"),
            ("short_frac", r"\frac12", r"\frac[1 2]"),
            ("overset", r"\overset{a}{b}", r"\overset[{}[b] {}[a]]"),
            ("sqrt", r"\sqrt{2}", r"\sqrt[{}[2]]"),
            ("root", r"\sqrt[3]{2}", r"\root[{}[2] 3]"),
            ("empty_root_index", r"\sqrt[]{2}", r"\sqrt[{}[2]]"),
            ("root_of", r"\root 3 \of x", r"\root[x 3]"),
            ("prime", "f'", r"^[f \prime]"),
            ("double_prime", "f''", r"^[f \dprime]"),
            ("quadruple_prime", "f''''", r"^[f \qprime]"),
            ("prime_then_sup", "f'^2", r"^[f {}[\prime 2]]"),
            ("sup_then_prime", "x^1'", r"^[x {}[1 \prime]]"),
            ("sub_then_prime", "x_1'", r"_^[x 1 \prime]"),
            ("limits", r"\sum\limits_0^n", r"_^[\sum 0 n]"),
            ("text", r"\text{a b}", r"\text<a b>"),
            ("big", r"\bigl(", r"\bigl<(>"),
            ("math_font", r"\mathbf{x}", r"\mathbf[{}[x]]"),
            ("math_symbol", r"x\mathdollar", r"x \mathdollar"),
            ("not_equal", r"a\not=b", r"a \ne b"),
            ("not_in", r"\not\in", r"\nin"),
            ("not_other", r"\not x", r"\not x"),
            ("over", r"a+b \over c", r"\frac[{}[a + b] c]"),
            ("over_in_group", r"{a \over b} c", r"{}[\frac[a b]] c"),
            ("choose_empty", r"\choose", r"\frac[{}[] {}[]]"),
            ("matrix_command", r"\pmatrix{a & b}", r"\pmatrix[a & b]"),
            ("matrix_rest", r"{\matrix a & b} c", r"{}[\matrix[a & b]] c"),
            ("xarrow", r"\xrightarrow{f}", r"\xrightarrow[{}[f]]"),
            ("xarrow_label", r"\xrightarrow[g]{f}", r"\xrightarrow[{}[g] {}[f]]"),
            ("color", r"{a \color{red} b c} d", r"{}[a \color[b c]] d"),
            ("color_in_script", r"{x^\color{red}a} b", r"{}[^[x \color[a]]] b"),
            ("choose_in_subscript", r"{x_\choose y} z", r"{}[_[x \frac[{}[] y]]] z"),
            ("matrix_in_script", r"{x^\matrix a & b}^2", r"^[{}[^[x \matrix[a & b]]] 2]"),
            ("left_right", r"\left( x \right)", r"\left[x \right]"),
            ("genfrac_style", r"\genfrac(){0pt}{0}{a}{b}", r"{}[\displaystyle \genfrac[{}[a] {}[b]]]"),
            ("environment", r"\begin{matrix}a&b\\c&d\end{matrix}", r"\matrix[a & b \\ c & d]"),
        ];
        for (name, input, expected) in problems {
            assert_eq!(show(&parse(input)), expected, "failed: {name}");
        }
    }

    #[test]
    fn braces_drop_the_closing_marker() {
        for input in ["{a}", "{a b c}", "{{x}y}"] {
            let nodes = parse(input);
            assert_eq!(nodes.len(), 1);
            assert!(nodes[0].children().iter().all(|child| !child.is("}")));
        }
    }

    #[test]
    fn attributes_and_delimiters() {
        let nodes = parse(r"\hspace{1em}");
        assert_eq!(nodes[0].attr("width"), Some("1em"));

        let nodes = parse(r"\color{red} x");
        assert_eq!(nodes[0].attr("mathcolor"), Some("red"));

        let nodes = parse(r"\style{color: red}{x}");
        assert_eq!(nodes[0].attr("style"), Some("color: red"));

        let nodes = parse(r"\left[ x \right)");
        assert_eq!(nodes[0].delimiter, Some(Delimiter::Single("[".into())));
        let right = nodes[0].children().last().unwrap();
        assert_eq!(right.delimiter, Some(Delimiter::Single(")".into())));

        let nodes = parse(r"a \choose b");
        assert_eq!(
            nodes[0].delimiter,
            Some(Delimiter::Pair(Some("(".into()), Some(")".into())))
        );
        assert_eq!(nodes[0].attr("linethickness"), Some("0"));

        let nodes = parse(r"a \abovewithdelims [ . 2pt b");
        assert_eq!(
            nodes[0].delimiter,
            Some(Delimiter::Pair(Some("[".into()), None))
        );
        assert_eq!(nodes[0].attr("linethickness"), Some("2pt"));

        let nodes = parse(r"\genfrac{}{}{}{}{a}{b}");
        assert_eq!(nodes[0].delimiter, None);
        assert_eq!(nodes[0].attr("linethickness"), None);

        let nodes = parse(r"\overbrace{x}^{n}");
        assert_eq!(nodes[0].modifier, Some(r"\overbrace"));

        let nodes = parse(r"\skew{5}\hat{x}");
        assert_eq!(nodes[0].attr("width"), Some("0.2775em"));
    }

    #[test]
    fn sideset() {
        let nodes = parse(r"\sideset{_1^2}{_3^4}\sum");
        let sideset = &nodes[0];
        assert!(sideset.is(r"\sideset"));
        let [left, right] = sideset.children() else {
            panic!("expected two children: {sideset:?}");
        };
        assert!(left.is("_^"));
        assert!(left.children()[0].is(r"\vphantom"));
        assert!(right.is("_^"));
        assert_eq!(right.children()[0].attr("movablelimits"), Some("false"));
        assert_eq!(right.children().len(), 3);
    }

    #[test]
    fn errors() {
        let problems = [
            ("double_sub", "x_1_2", LatexErrKind::DoubleScript(ScriptKind::Sub)),
            ("double_sup", "x^1^2", LatexErrKind::DoubleScript(ScriptKind::Sup)),
            ("subsup_sub", "x_1^2_3", LatexErrKind::DoubleScript(ScriptKind::Sub)),
            (
                "unclosed_left",
                r"\left( x",
                LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Left),
            ),
            (
                "stray_right",
                r"x \right)",
                LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Right),
            ),
            (
                "stray_middle",
                r"a \middle| b",
                LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Middle),
            ),
            ("limits_alone", r"\limits_0", LatexErrKind::LimitsRequireOperator),
            ("limits_on_letter", r"x\limits_0", LatexErrKind::LimitsRequireOperator),
            ("over_without_numerator", r"\over b", LatexErrKind::MissingNumerator),
            ("over_without_denominator", r"a \over", LatexErrKind::MissingDenominator),
            ("skew_not_integer", r"\skew{x}\hat{a}", LatexErrKind::InvalidWidth("x".into())),
            ("hspace_empty", r"\hspace{}", LatexErrKind::InvalidWidth("".into())),
            ("missing_end", r"\begin{matrix} a", LatexErrKind::MissingEnd("matrix".into())),
            ("trailing_script", "x^", LatexErrKind::NoTokens),
            ("closed_script", "{x^}", LatexErrKind::MissingArgument),
            ("closed_frac", r"{\frac{a}}", LatexErrKind::MissingArgument),
            ("frac_at_end", r"\frac{a}", LatexErrKind::MissingArgument),
        ];
        for (name, input, expected) in problems {
            assert_eq!(parse_err(input), expected, "failed: {name}");
        }
    }

    #[test]
    fn error_spans() {
        let err = Parser::new("ab_1_2", SymbolTable::bundled()).parse().unwrap_err();
        assert_eq!(err.0, 4..5);
        let err = Parser::new(r"x+\left(", SymbolTable::bundled()).parse().unwrap_err();
        assert_eq!(err.0, 2..7);
        let err = Parser::new("x^", SymbolTable::bundled()).parse().unwrap_err();
        assert_eq!(err.0, 2..2);
    }

    #[test]
    fn degenerate_left_right() {
        let nodes = parse(r"\left(\right.");
        assert_eq!(nodes.len(), 1);
        let right = nodes[0].children().last().unwrap();
        assert_eq!(right.delimiter, Some(Delimiter::Single(".".into())));
        assert_eq!(nodes[0].children().len(), 1);
    }

    #[test]
    fn skew_widths() {
        let problems = [
            (0, "0em"),
            (1, "0.0555em"),
            (5, "0.2775em"),
            (10, "0.555em"),
            (20, "1.11em"),
            (-3, "-0.1665em"),
        ];
        for (value, expected) in problems {
            assert_eq!(skew_width(value).as_deref(), Some(expected), "failed: {value}");
        }
        assert_eq!(skew_width(i64::MAX), None);
    }
}
