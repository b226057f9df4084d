use crate::ast::Node;
use crate::commands::{BRACES, CLOSING_BRACKET, OPENING_BRACKET};
use crate::error::LatexErrKind;
use crate::parser::{ParseResult, Parser, error};
use crate::token::Span;

/// Characters allowed in a column alignment specifier.
const ALIGNMENT_CHARS: &str = "lcr|";

/// Environments which require a braced column specifier.
const SPECIFIER_REQUIRED: [&str; 2] = ["array", "subarray"];

impl Parser<'_, '_> {
    /// Parse `\begin{name} ... \end{name}` into a node named `\name`.
    ///
    /// A leading column specifier (`{c|c}`, or `[r]` for starred environments) is moved from the
    /// body into the node's alignment.
    pub(crate) fn parse_environment(&mut self, header: &str, span: Span) -> ParseResult<Node> {
        let name = header
            .strip_prefix(r"\begin{")
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or_default();
        let end = format!(r"\end{{{name}}}");

        let mut children = self.parse_optional(Some(&end))?;
        if !children.last().is_some_and(|node| node.is(&end)) {
            return Err(error(span, LatexErrKind::MissingEnd(name.into())));
        }
        children.pop();

        let alignment = take_alignment(name, &mut children)
            .map_err(|spec| error(span, LatexErrKind::InvalidAlignment(spec.into())))?;
        Ok(Node {
            alignment,
            ..Node::with_children(format!(r"\{name}"), children)
        })
    }
}

/// Removes the column specifier from the start of `children`.
///
/// Returns the offending specifier text as the error.
fn take_alignment(name: &str, children: &mut Vec<Node>) -> Result<Option<String>, String> {
    let starred = name.ends_with('*');
    if starred && children.first().is_some_and(|node| node.is(OPENING_BRACKET)) {
        let Some(close) = children.iter().position(|node| node.is(CLOSING_BRACKET)) else {
            return Err(OPENING_BRACKET.to_string());
        };
        let spec: String = children[1..close].iter().map(|node| node.token.as_str()).collect();
        if !is_valid_alignment(&spec) {
            return Err(spec);
        }
        children.drain(..=close);
        return Ok(Some(spec));
    }

    let spec = children
        .first()
        .filter(|node| node.is(BRACES))
        .map(|group| {
            group
                .children()
                .iter()
                .map(|node| node.token.as_str())
                .collect::<String>()
        });
    if SPECIFIER_REQUIRED.contains(&name) {
        let spec = spec.unwrap_or_default();
        if !is_valid_alignment(&spec) {
            return Err(spec);
        }
        children.remove(0);
        return Ok(Some(spec));
    }
    match spec {
        Some(spec) if is_valid_alignment(&spec) => {
            children.remove(0);
            Ok(Some(spec))
        }
        _ => Ok(None),
    }
}

fn is_valid_alignment(spec: &str) -> bool {
    !spec.is_empty() && spec.chars().all(|ch| ALIGNMENT_CHARS.contains(ch))
}
