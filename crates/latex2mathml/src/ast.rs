use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::commands::BRACES;

/// A node of the syntax tree built by the parser.
///
/// `children == None` marks a leaf, which is rendered from its token, text and attributes alone.
/// `Some(vec![])` is an empty group and renders differently from a leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Node {
    /// The command (`\frac`), literal (`x`, `12`) or marker (`{}`) this node stands for.
    pub token: String,
    pub children: Option<Vec<Node>>,
    pub delimiter: Option<Delimiter>,
    /// Column alignment of a table environment, made of `l`, `c`, `r` and `|`.
    pub alignment: Option<String>,
    /// Raw text captured by box, text and sized delimiter commands.
    pub text: Option<String>,
    pub attributes: Option<BTreeMap<&'static str, String>>,
    /// Records that a script was attached through `\limits`, `\overbrace` or `\underbrace`.
    pub modifier: Option<&'static str>,
}

/// Delimiters attached to a node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Delimiter {
    /// The delimiter after `\left`, `\right` and similar commands.
    Single(String),
    /// Opening and closing delimiters of a generalized fraction; `None` means no delimiter.
    Pair(Option<String>, Option<String>),
}

static_assertions::assert_impl_all!(Node: Send, Sync);

impl Node {
    pub fn leaf(token: impl Into<String>) -> Node {
        Node {
            token: token.into(),
            ..Default::default()
        }
    }

    pub fn with_children(token: impl Into<String>, children: Vec<Node>) -> Node {
        Node {
            token: token.into(),
            children: Some(children),
            ..Default::default()
        }
    }

    /// A `{...}` group.
    pub fn braces(children: Vec<Node>) -> Node {
        Node::with_children(BRACES, children)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[inline]
    pub fn is(&self, token: &str) -> bool {
        self.token == token
    }

    /// The children of this node; empty for leaves.
    #[inline]
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(name, value.into());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.as_ref()?.get(name).map(String::as_str)
    }
}
