use std::slice;

use mathml_tree::Element;

use crate::ast::{Delimiter, Node};
use crate::commands::{
    self, BINOM, BMOD, CASES, CFRAC, DBINOM, DFRAC, DIACRITICS, FBOX, FENCES, FRAC, FUNCTIONS,
    Font, GENFRAC, GLOBAL_FONTS, HBOX, HPHANTOM, IDOTSINT, LATEX, LBRACE, LEFT, LIMIT, LIMITS,
    LOCAL_FONTS, MATH, MATRICES, MBOX, MKERN, MOD, NOT, OPERATORS, OVERBRACE, PMOD, SIDESET,
    SKEW, SMALLMATRIX, SPACES, SUB_LIST, SUBARRAY, SUBSCRIPT, SUBSTACK, SUBSUP, SUPERSCRIPT,
    Style, TBINOM, TEX, TFRAC, UNDERBRACE, VPHANTOM, XLEFTARROW, XRIGHTARROW,
};
use crate::symbols::SymbolTable;
use crate::{table, text_mode};

const NO_BREAK_SPACE: &str = "\u{A0}";

/// Renders syntax trees into MathML elements.
///
/// Rendering never fails: unknown commands fall back to their raw text.
pub(crate) struct Converter<'symbols> {
    pub(crate) symbols: &'symbols SymbolTable,
}

/// Opening and closing fences drawn around a command.
struct Fences<'node> {
    open: Option<&'node str>,
    close: Option<&'node str>,
    sized: bool,
}

impl<'symbols> Converter<'symbols> {
    pub(crate) fn new(symbols: &'symbols SymbolTable) -> Self {
        Converter { symbols }
    }

    /// Render `nodes` as children of `parent`.
    pub(crate) fn render_group(&self, nodes: &[Node], parent: &mut Element, font: &Font) {
        let mut font = font;
        for (index, node) in nodes.iter().enumerate() {
            let token = node.token.as_str();
            // A style switch applies to everything after it in the group.
            if let Some(attributes) = commands::style_switch(token) {
                let scope = parent.create_child("mstyle");
                for &(name, value) in attributes {
                    scope.set_attr(name, value);
                }
                self.render_group(&nodes[index + 1..], scope, font);
                return;
            }
            if let Some(style) = commands::tag_style(token) {
                self.render_command(node, style, parent, font);
            } else if let Some(local) = LOCAL_FONTS.get(token)
                && !node.is_leaf()
            {
                self.render_group(node.children(), parent, local);
            } else if token.starts_with(MATH) && !node.is_leaf() {
                self.render_group(node.children(), parent, font);
            } else if let Some(global) = GLOBAL_FONTS.get(token) {
                font = global;
            } else if node.is_leaf() {
                self.render_symbol(node, parent, font);
            } else {
                let row = parent.create_child("mrow");
                copy_attributes(row, node);
                self.render_group(node.children(), row, font);
            }
        }
    }

    fn render_command(&self, node: &Node, style: &Style, parent: &mut Element, font: &Font) {
        let command = node.token.as_str();
        if matches!(command, MOD | PMOD) {
            parent.create_child("mspace").set_attr("width", "1em");
        }
        let target = match self.command_scope(command) {
            Some(scope) => parent.push_child(scope),
            None => parent,
        };

        let fences = fence_pair(node);
        let fence_size = if target.attr("displaystyle") == Some("false") || command == TBINOM {
            "1.2em"
        } else {
            "2.047em"
        };
        if let Some(fences) = &fences
            && let Some(open) = fences.open
        {
            self.push_fence(target, open, fences.sized.then_some(fence_size));
        }

        let mut element = Element::new(select_tag(node, style.tag));
        for &(name, value) in &*style.attributes {
            element.set_attr(name, value);
        }
        if command != SKEW {
            copy_attributes(&mut element, node);
        }
        if LIMIT.contains(command) {
            element.set_attr("movablelimits", "true");
        }
        let (alignment, column_lines) = table::split_alignment(node.alignment.as_deref());
        if let Some(column_lines) = column_lines {
            element.set_attr("columnlines", column_lines);
        }

        if LIMIT.contains(command) {
            element.set_text(&command[1..]);
        } else if matches!(command, MOD | PMOD | BMOD) {
            element.set_text("mod");
        } else if matches!(command, XLEFTARROW | XRIGHTARROW) {
            let arrow = if command == XLEFTARROW { "\u{2190}" } else { "\u{2192}" };
            let scope = element.create_child("mstyle");
            scope.set_attr("scriptlevel", "0");
            scope.create_child("mo").set_text(arrow);
        } else if let Some(text) = &node.text {
            if command == HBOX {
                text_mode::render_hbox(self, text, &element, target, font);
                return;
            }
            if style.tag == "mo" {
                // Sized delimiters and \middle name their glyph.
                element.set_text(self.symbol_text(text));
            } else if command == FBOX {
                let inner = element.create_child("mtext");
                inner.set_text(text.replace(' ', NO_BREAK_SPACE));
                set_font(inner, "mtext", font);
            } else {
                element.set_text(text.replace(' ', NO_BREAK_SPACE));
                set_font(&mut element, "mtext", font);
            }
        } else if let Some(Delimiter::Single(delimiter)) = &node.delimiter
            && delimiter != "."
        {
            element.set_text(self.symbol_text(delimiter));
        }

        if matches!(command, LEFT | MOD | PMOD) {
            target.push_child(element);
            if command != LEFT {
                target.create_child("mspace").set_attr("width", "0.333em");
            }
            self.render_children(node, alignment.as_deref(), target, font);
        } else {
            self.render_children(node, alignment.as_deref(), &mut element, font);
            if let Some((glyph, attributes)) = DIACRITICS.get(command) {
                let accent = element.create_child("mo");
                for &(name, value) in *attributes {
                    accent.set_attr(name, value);
                }
                accent.set_text(*glyph);
            }
            target.push_child(element);
        }

        if let Some(fences) = &fences
            && let Some(close) = fences.close
        {
            self.push_fence(target, close, fences.sized.then_some(fence_size));
        }
        if command == SKEW
            && let Some(width) = node.attr("width")
        {
            let negated = match width.strip_prefix('-') {
                Some(positive) => positive.to_string(),
                None => format!("-{width}"),
            };
            target.create_child("mspace").set_attr("width", negated);
        }
    }

    /// The wrapper element some commands are rendered in.
    fn command_scope(&self, command: &str) -> Option<Element> {
        let mut scope;
        match command {
            SUBSTACK | SMALLMATRIX | SUBARRAY => {
                scope = Element::new("mstyle");
                scope.set_attr("scriptlevel", "1");
            }
            CASES => {
                scope = Element::new("mrow");
                let brace = scope.create_child("mo");
                brace.set_attr("stretchy", "true");
                brace.set_attr("fence", "true");
                brace.set_attr("form", "prefix");
                brace.set_text(self.symbol_text(LBRACE));
            }
            DBINOM | DFRAC => {
                scope = Element::new("mstyle");
                scope.set_attr("displaystyle", "true");
                scope.set_attr("scriptlevel", "0");
            }
            HPHANTOM => {
                scope = Element::new("mpadded");
                scope.set_attr("height", "0");
                scope.set_attr("depth", "0");
            }
            VPHANTOM => {
                scope = Element::new("mpadded");
                scope.set_attr("width", "0");
            }
            TBINOM | HBOX | MBOX | TFRAC => {
                scope = Element::new("mstyle");
                scope.set_attr("displaystyle", "false");
                scope.set_attr("scriptlevel", "0");
            }
            LEFT => scope = Element::new("mrow"),
            _ => return None,
        }
        Some(scope)
    }

    fn render_children(
        &self,
        node: &Node,
        alignment: Option<&str>,
        parent: &mut Element,
        font: &Font,
    ) {
        let command = node.token.as_str();
        let children = node.children();
        if MATRICES.contains(command) {
            let alignment = if command == CASES {
                "l"
            } else if commands::is_align_family(command) {
                "rl"
            } else {
                alignment.unwrap_or_default()
            };
            table::render_table(self, children, parent, command, alignment, font);
        } else if command == CFRAC {
            for child in children {
                let scope = parent.create_child("mstyle");
                scope.set_attr("displaystyle", "false");
                scope.set_attr("scriptlevel", "0");
                self.render_group(slice::from_ref(child), scope, font);
            }
        } else if command == SIDESET {
            let [left, right] = children else {
                return self.render_group(children, parent, font);
            };
            self.render_group(slice::from_ref(left), parent, font);
            let fill = parent.create_child("mstyle");
            fill.set_attr("scriptlevel", "0");
            fill.create_child("mspace").set_attr("width", "-0.167em");
            self.render_group(slice::from_ref(right), parent, font);
        } else if command == SKEW {
            if let Some(target) = children.first() {
                let skewed = kerned(target, node);
                self.render_group(slice::from_ref(&skewed), parent, font);
            }
        } else if matches!(command, XLEFTARROW | XRIGHTARROW) {
            for child in children {
                let padded = parent.create_child("mpadded");
                self.render_group(slice::from_ref(child), padded, font);
                padded.create_child("mspace").set_attr("depth", "0.25em");
            }
        } else {
            self.render_group(children, parent, font);
        }
    }

    fn push_fence(&self, parent: &mut Element, name: &str, size: Option<&'static str>) {
        let fence = parent.create_child("mo");
        if let Some(size) = size {
            fence.set_attr("minsize", size);
            fence.set_attr("maxsize", size);
        }
        fence.set_text(self.symbol_text(name));
    }

    fn render_symbol(&self, node: &Node, parent: &mut Element, font: &Font) {
        let token = node.token.as_str();
        if token.bytes().any(|b| b.is_ascii_digit()) {
            let number = parent.create_child("mn");
            copy_attributes(number, node);
            number.set_text(token);
            set_font(number, "mn", font);
        } else if OPERATORS.contains(token) {
            let operator = parent.create_child("mo");
            copy_attributes(operator, node);
            operator.set_text(self.symbol_text(token));
            if token == r"\|" {
                operator.set_attr("fence", "false");
            } else if token == r"\smallint" {
                operator.set_attr("largeop", "false");
            }
            if FENCES.contains(token) {
                operator.set_attr("stretchy", "false");
                set_font(operator, "fence", font);
            } else {
                set_font(operator, "mo", font);
            }
        } else if token == "." || self.symbols.code_point(token).is_some_and(is_operator_code) {
            let operator = parent.create_child("mo");
            copy_attributes(operator, node);
            operator.set_text(self.symbol_text(token));
            set_font(operator, "mo", font);
        } else if SPACES.contains(token) {
            let space = parent.create_child("mtext");
            copy_attributes(space, node);
            space.set_text(NO_BREAK_SPACE);
            set_font(space, "mtext", font);
        } else if token == NOT {
            let padded = parent.create_child("mpadded");
            padded.set_attr("width", "0");
            padded.create_child("mtext").set_text("\u{29F8}");
        } else if let Some(label) = SUB_LIST.get(token) {
            let operator = parent.create_child("mo");
            operator.set_attr("movablelimits", "true");
            copy_attributes(operator, node);
            operator.set_text(*label);
            set_font(operator, "mo", font);
        } else if token == IDOTSINT {
            let row = parent.create_child("mrow");
            copy_attributes(row, node);
            for glyph in ["\u{222B}", "\u{22EF}", "\u{222B}"] {
                row.create_child("mo").set_text(glyph);
            }
        } else if token == LATEX || token == TEX {
            let row = parent.create_child("mrow");
            copy_attributes(row, node);
            render_logo(row, token == LATEX, font);
        } else if let Some(name) = token
            .strip_prefix(r"\operatorname{")
            .and_then(|rest| rest.strip_suffix('}'))
        {
            let operator = parent.create_child("mo");
            copy_attributes(operator, node);
            operator.set_text(name);
        } else if let Some(name) = token.strip_prefix('\\') {
            let identifier = parent.create_child("mi");
            copy_attributes(identifier, node);
            match self.symbols.lookup(token) {
                Some(ch) => identifier.set_text(ch),
                None if FUNCTIONS.contains(token) => identifier.set_text(name),
                None => identifier.set_text(token),
            }
            set_font(identifier, "mi", font);
        } else {
            let identifier = parent.create_child("mi");
            copy_attributes(identifier, node);
            identifier.set_text(token);
            set_font(identifier, "mi", font);
        }
    }

    /// The character `name` stands for, or `name` itself when it is not a known symbol.
    pub(crate) fn symbol_text(&self, name: &str) -> String {
        match self.symbols.lookup(name) {
            Some(ch) => ch.to_string(),
            None => name.to_string(),
        }
    }
}

/// Arrows and mathematical operators are rendered as `mo`.
fn is_operator_code(code: u32) -> bool {
    (0x2200..=0x22FF).contains(&code) || (0x2190..=0x21FF).contains(&code)
}

fn copy_attributes(element: &mut Element, node: &Node) {
    if let Some(attributes) = &node.attributes {
        for (&name, value) in attributes {
            element.set_attr(name, value.as_str());
        }
    }
}

pub(crate) fn set_font(element: &mut Element, kind: &str, font: &Font) {
    if let Some(variant) = font.variant(kind) {
        element.set_attr("mathvariant", variant);
    }
}

/// Scripts on limit-like operators and on `\limits`, `\overbrace` or `\underbrace` go above and
/// below instead of to the side.
fn select_tag(node: &Node, default: &'static str) -> &'static str {
    let limit_base = node.children().first().is_some_and(|base| {
        let token = base.token.as_str();
        base.is_leaf() && (LIMIT.contains(token) || SUB_LIST.contains_key(token))
    });
    let modifier = node.modifier;
    let over = limit_base || matches!(modifier, Some(LIMITS | OVERBRACE));
    let under = limit_base || matches!(modifier, Some(LIMITS | UNDERBRACE));
    match node.token.as_str() {
        SUPERSCRIPT if over => "mover",
        SUBSCRIPT if under => "munder",
        SUBSUP if limit_base || modifier.is_some() => "munderover",
        XLEFTARROW | XRIGHTARROW if node.children().len() == 2 => "munderover",
        _ => default,
    }
}

fn fixed(open: &'static str, close: &'static str, sized: bool) -> Option<Fences<'static>> {
    Some(Fences {
        open: Some(open),
        close: Some(close),
        sized,
    })
}

fn fence_pair(node: &Node) -> Option<Fences<'_>> {
    match node.token.trim_end_matches('*') {
        r"\pmatrix" | PMOD => fixed(r"\lparen", r"\rparen", false),
        BINOM | DBINOM | TBINOM => fixed(r"\lparen", r"\rparen", true),
        r"\bmatrix" => fixed(r"\lbrack", r"\rbrack", false),
        r"\Bmatrix" => fixed(r"\lbrace", r"\rbrace", false),
        r"\vmatrix" => fixed(r"\vert", r"\vert", false),
        r"\Vmatrix" => fixed(r"\Vert", r"\Vert", false),
        FRAC | GENFRAC => match &node.delimiter {
            Some(Delimiter::Pair(open, close)) => Some(Fences {
                open: open.as_deref(),
                close: close.as_deref(),
                sized: true,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// `\skew` shifts its accent by appending a kern inside the accented base.
fn kerned(target: &Node, skew: &Node) -> Node {
    let kern = Node {
        attributes: skew.attributes.clone(),
        ..Node::leaf(MKERN)
    };
    if target.is_leaf() {
        return Node::braces(vec![target.clone(), kern]);
    }
    let mut inner = target.children().to_vec();
    inner.push(kern);
    Node {
        children: Some(vec![Node::braces(inner)]),
        ..target.clone()
    }
}

fn letter(parent: &mut Element, text: &str, font: &Font) {
    let identifier = parent.create_child("mi");
    identifier.set_text(text);
    set_font(identifier, "mi", font);
}

fn kern(parent: &mut Element, width: &'static str) {
    parent.create_child("mspace").set_attr("width", width);
}

/// The `\TeX` and `\LaTeX` logos, kerned letter by letter.
fn render_logo(row: &mut Element, latex: bool, font: &Font) {
    if latex {
        letter(row, "L", font);
        kern(row, "-0.325em");
        let raised = row.create_child("mpadded");
        raised.set_attr("height", "0.21ex");
        raised.set_attr("depth", "-0.21ex");
        raised.set_attr("voffset", "0.21ex");
        let small = raised.create_child("mstyle");
        small.set_attr("displaystyle", "false");
        small.set_attr("scriptlevel", "1");
        letter(small.create_child("mrow"), "A", font);
        kern(row, "-0.17em");
    }
    letter(row, "T", font);
    kern(row, "-0.14em");
    let lowered = row.create_child("mpadded");
    lowered.set_attr("height", "-0.5ex");
    lowered.set_attr("depth", "0.5ex");
    lowered.set_attr("voffset", "-0.5ex");
    letter(lowered.create_child("mrow"), "E", font);
    kern(row, "-0.115em");
    letter(row, "X", font);
}
