#[cfg(feature = "serde")]
use serde::Serialize;

use crate::escape::{escape_double_quoted_attribute, escape_text_content};
use crate::fmt::new_line_and_indent;

/// A MathML element: tag name, ordered attributes, text content and child elements.
///
/// Attribute names are unique; setting an existing attribute replaces its value in place, so the
/// serialized attribute order is the order in which names were first set.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    tag: &'static str,
    attributes: Vec<(&'static str, String)>,
    text: String,
    children: Vec<Element>,
}

static_assertions::assert_impl_all!(Element: Send, Sync);

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Appends a new, empty child element and returns a reference to it.
    pub fn create_child(&mut self, tag: &'static str) -> &mut Element {
        self.push_child(Element::new(tag))
    }

    /// Appends `child` and returns a reference to it.
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, old)) => *old = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Returns the value of the attribute `name`, if set.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[inline]
    pub fn attributes(&self) -> &[(&'static str, String)] {
        &self.attributes
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// An element without text and without children.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }

    /// Serializes this element into `s`.
    ///
    /// `level` is the nesting depth of this element and `width` the number of spaces per level.
    /// A width of zero produces compact output. Elements without children keep their text on the
    /// same line as their tags.
    pub fn emit(&self, s: &mut String, level: usize, width: usize) {
        s.push('<');
        s.push_str(self.tag);
        for (name, value) in &self.attributes {
            s.push(' ');
            s.push_str(name);
            s.push_str("=\"");
            escape_double_quoted_attribute(s, value);
            s.push('"');
        }
        s.push('>');
        escape_text_content(s, &self.text);
        for child in &self.children {
            new_line_and_indent(s, level + 1, width);
            child.emit(s, level + 1, width);
        }
        if !self.children.is_empty() {
            new_line_and_indent(s, level, width);
        }
        s.push_str("</");
        s.push_str(self.tag);
        s.push('>');
    }

    pub fn write_to_string(&self, width: usize) -> String {
        let mut s = String::new();
        self.emit(&mut s, 0, width);
        s
    }
}
