//! Static tables describing how commands are parsed and rendered.
//!
//! Everything here is immutable. The one derived table ([`DERIVED_TAGS`]) is expanded from small
//! templates on first use.

use std::borrow::Cow;
use std::sync::LazyLock;

use phf::{phf_map, phf_set};
use rustc_hash::FxHashMap;

pub(crate) const BRACES: &str = "{}";
pub(crate) const OPENING_BRACE: &str = "{";
pub(crate) const CLOSING_BRACE: &str = "}";
pub(crate) const OPENING_BRACKET: &str = "[";
pub(crate) const CLOSING_BRACKET: &str = "]";

pub(crate) const SUBSCRIPT: &str = "_";
pub(crate) const SUPERSCRIPT: &str = "^";
pub(crate) const SUBSUP: &str = "_^";
pub(crate) const APOSTROPHE: &str = "'";

pub(crate) const PRIME: &str = r"\prime";
pub(crate) const DPRIME: &str = r"\dprime";
pub(crate) const TRPRIME: &str = r"\trprime";
pub(crate) const QPRIME: &str = r"\qprime";

pub(crate) const LEFT: &str = r"\left";
pub(crate) const MIDDLE: &str = r"\middle";
pub(crate) const RIGHT: &str = r"\right";

pub(crate) const ABOVE: &str = r"\above";
pub(crate) const ABOVEWITHDELIMS: &str = r"\abovewithdelims";
pub(crate) const ATOP: &str = r"\atop";
pub(crate) const ATOPWITHDELIMS: &str = r"\atopwithdelims";
pub(crate) const BINOM: &str = r"\binom";
pub(crate) const BRACE: &str = r"\brace";
pub(crate) const BRACK: &str = r"\brack";
pub(crate) const CFRAC: &str = r"\cfrac";
pub(crate) const CHOOSE: &str = r"\choose";
pub(crate) const DBINOM: &str = r"\dbinom";
pub(crate) const DFRAC: &str = r"\dfrac";
pub(crate) const FRAC: &str = r"\frac";
pub(crate) const GENFRAC: &str = r"\genfrac";
pub(crate) const TBINOM: &str = r"\tbinom";
pub(crate) const TFRAC: &str = r"\tfrac";

pub(crate) const ROOT: &str = r"\root";
pub(crate) const OF: &str = r"\of";
pub(crate) const SQRT: &str = r"\sqrt";

pub(crate) const OVERBRACE: &str = r"\overbrace";
pub(crate) const UNDERBRACE: &str = r"\underbrace";
pub(crate) const XLEFTARROW: &str = r"\xleftarrow";
pub(crate) const XRIGHTARROW: &str = r"\xrightarrow";

pub(crate) const FBOX: &str = r"\fbox";
pub(crate) const HBOX: &str = r"\hbox";
pub(crate) const MBOX: &str = r"\mbox";

pub(crate) const LIMITS: &str = r"\limits";
pub(crate) const LBRACE: &str = r"\{";

pub(crate) const MOD: &str = r"\mod";
pub(crate) const PMOD: &str = r"\pmod";
pub(crate) const BMOD: &str = r"\bmod";

pub(crate) const HLINE: &str = r"\hline";
pub(crate) const HDASHLINE: &str = r"\hdashline";
pub(crate) const HFIL: &str = r"\hfil";

pub(crate) const CASES: &str = r"\cases";
pub(crate) const SMALLMATRIX: &str = r"\smallmatrix";
pub(crate) const SUBSTACK: &str = r"\substack";
pub(crate) const SUBARRAY: &str = r"\subarray";

pub(crate) const COLUMN_SEPARATOR: &str = "&";
pub(crate) const ROW_SEPARATOR: &str = r"\\";
pub(crate) const CARRIAGE_RETURN: &str = r"\cr";

pub(crate) const MKERN: &str = r"\mkern";
pub(crate) const HPHANTOM: &str = r"\hphantom";
pub(crate) const VPHANTOM: &str = r"\vphantom";

pub(crate) const DISPLAYSTYLE: &str = r"\displaystyle";
pub(crate) const TEXTSTYLE: &str = r"\textstyle";
pub(crate) const SCRIPTSTYLE: &str = r"\scriptstyle";
pub(crate) const SCRIPTSCRIPTSTYLE: &str = r"\scriptscriptstyle";

pub(crate) const IDOTSINT: &str = r"\idotsint";
pub(crate) const LATEX: &str = r"\LaTeX";
pub(crate) const TEX: &str = r"\TeX";

pub(crate) const SIDESET: &str = r"\sideset";
pub(crate) const SKEW: &str = r"\skew";
pub(crate) const NOT: &str = r"\not";

/// Prefix shared by the math font commands (`\mathbf`, `\mathrm`, ...).
pub(crate) const MATH: &str = r"\math";

/// The prime symbols, ordered by the number of strokes.
pub(crate) const PRIMES: [&str; 4] = [PRIME, DPRIME, TRPRIME, QPRIME];

/// How the parser consumes the arguments following a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    /// Exactly one argument node.
    OneParam,
    /// Exactly two argument nodes.
    TwoParams,
    /// `\overset` and `\underset`: two argument nodes, stored in reverse order.
    Reversed,
    Not,
    /// An optional `[label]` followed by one argument node.
    ArrowWithLabel,
    /// A width, given bare or in braces.
    Space,
    Color,
    Style,
    /// One raw token kept as text.
    RawText,
    Href,
    /// An infix fraction like `\over`, which splits the surrounding group.
    LegacyFraction,
    Sqrt,
    Root,
    Matrix,
    Genfrac,
    Sideset,
    Skew,
}

static PARSE_SHAPES: phf::Map<&'static str, Shape> = phf_map! {
    r"\acute" => Shape::OneParam,
    r"\bar" => Shape::OneParam,
    r"\Bbb" => Shape::OneParam,
    r"\boldsymbol" => Shape::OneParam,
    r"\boxed" => Shape::OneParam,
    r"\breve" => Shape::OneParam,
    r"\check" => Shape::OneParam,
    r"\dot" => Shape::OneParam,
    r"\ddot" => Shape::OneParam,
    r"\dddot" => Shape::OneParam,
    r"\ddddot" => Shape::OneParam,
    r"\grave" => Shape::OneParam,
    r"\hat" => Shape::OneParam,
    r"\hphantom" => Shape::OneParam,
    r"\mathring" => Shape::OneParam,
    r"\mit" => Shape::OneParam,
    r"\mod" => Shape::OneParam,
    r"\oldstyle" => Shape::OneParam,
    r"\overbrace" => Shape::OneParam,
    r"\overleftarrow" => Shape::OneParam,
    r"\overleftrightarrow" => Shape::OneParam,
    r"\overline" => Shape::OneParam,
    r"\overparen" => Shape::OneParam,
    r"\overrightarrow" => Shape::OneParam,
    r"\phantom" => Shape::OneParam,
    r"\pmod" => Shape::OneParam,
    r"\scr" => Shape::OneParam,
    r"\tilde" => Shape::OneParam,
    r"\tt" => Shape::OneParam,
    r"\underbrace" => Shape::OneParam,
    r"\underleftarrow" => Shape::OneParam,
    r"\underline" => Shape::OneParam,
    r"\underparen" => Shape::OneParam,
    r"\underrightarrow" => Shape::OneParam,
    r"\underleftrightarrow" => Shape::OneParam,
    r"\vec" => Shape::OneParam,
    r"\vphantom" => Shape::OneParam,
    r"\widehat" => Shape::OneParam,
    r"\widetilde" => Shape::OneParam,

    r"\binom" => Shape::TwoParams,
    r"\cfrac" => Shape::TwoParams,
    r"\dbinom" => Shape::TwoParams,
    r"\dfrac" => Shape::TwoParams,
    r"\frac" => Shape::TwoParams,
    r"\tbinom" => Shape::TwoParams,
    r"\tfrac" => Shape::TwoParams,
    r"\overset" => Shape::Reversed,
    r"\underset" => Shape::Reversed,

    r"\not" => Shape::Not,
    r"\xleftarrow" => Shape::ArrowWithLabel,
    r"\xrightarrow" => Shape::ArrowWithLabel,

    r"\hskip" => Shape::Space,
    r"\hspace" => Shape::Space,
    r"\kern" => Shape::Space,
    r"\mkern" => Shape::Space,
    r"\mskip" => Shape::Space,
    r"\mspace" => Shape::Space,

    r"\color" => Shape::Color,
    r"\style" => Shape::Style,
    r"\href" => Shape::Href,

    r"\fbox" => Shape::RawText,
    r"\hbox" => Shape::RawText,
    r"\mbox" => Shape::RawText,
    r"\middle" => Shape::RawText,
    r"\text" => Shape::RawText,
    r"\textbf" => Shape::RawText,
    r"\textit" => Shape::RawText,
    r"\textrm" => Shape::RawText,
    r"\textsf" => Shape::RawText,
    r"\texttt" => Shape::RawText,
    r"\big" => Shape::RawText,
    r"\Big" => Shape::RawText,
    r"\bigg" => Shape::RawText,
    r"\Bigg" => Shape::RawText,
    r"\bigl" => Shape::RawText,
    r"\Bigl" => Shape::RawText,
    r"\biggl" => Shape::RawText,
    r"\Biggl" => Shape::RawText,
    r"\bigm" => Shape::RawText,
    r"\Bigm" => Shape::RawText,
    r"\biggm" => Shape::RawText,
    r"\Biggm" => Shape::RawText,
    r"\bigr" => Shape::RawText,
    r"\Bigr" => Shape::RawText,
    r"\biggr" => Shape::RawText,
    r"\Biggr" => Shape::RawText,

    r"\above" => Shape::LegacyFraction,
    r"\abovewithdelims" => Shape::LegacyFraction,
    r"\atop" => Shape::LegacyFraction,
    r"\atopwithdelims" => Shape::LegacyFraction,
    r"\brace" => Shape::LegacyFraction,
    r"\brack" => Shape::LegacyFraction,
    r"\choose" => Shape::LegacyFraction,
    r"\over" => Shape::LegacyFraction,

    r"\sqrt" => Shape::Sqrt,
    r"\root" => Shape::Root,

    r"\matrix" => Shape::Matrix,
    r"\matrix*" => Shape::Matrix,
    r"\pmatrix" => Shape::Matrix,
    r"\pmatrix*" => Shape::Matrix,
    r"\bmatrix" => Shape::Matrix,
    r"\bmatrix*" => Shape::Matrix,
    r"\Bmatrix" => Shape::Matrix,
    r"\Bmatrix*" => Shape::Matrix,
    r"\vmatrix" => Shape::Matrix,
    r"\vmatrix*" => Shape::Matrix,
    r"\Vmatrix" => Shape::Matrix,
    r"\Vmatrix*" => Shape::Matrix,
    r"\array" => Shape::Matrix,
    r"\substack" => Shape::Matrix,
    r"\cases" => Shape::Matrix,
    r"\displaylines" => Shape::Matrix,
    r"\smallmatrix" => Shape::Matrix,
    r"\split" => Shape::Matrix,
    r"\align*" => Shape::Matrix,

    r"\genfrac" => Shape::Genfrac,
    r"\sideset" => Shape::Sideset,
    r"\skew" => Shape::Skew,
};

/// The argument shape of `command`, if it takes arguments.
///
/// Math font commands (`\mathbf`, `\mathcal`, ...) take one argument unless the name is a symbol;
/// that check needs the symbol table and happens in the parser.
pub(crate) fn shape(command: &str) -> Option<Shape> {
    PARSE_SHAPES.get(command).copied()
}

pub(crate) type Attributes = &'static [(&'static str, &'static str)];

/// The element a command renders to, with its fixed attributes.
#[derive(Debug, Clone)]
pub(crate) struct Style {
    pub(crate) tag: &'static str,
    pub(crate) attributes: Cow<'static, [(&'static str, &'static str)]>,
}

const fn style(tag: &'static str, attributes: Attributes) -> Style {
    Style {
        tag,
        attributes: Cow::Borrowed(attributes),
    }
}

const NONE: Attributes = &[];
const LINETHICKNESS_ZERO: Attributes = &[("linethickness", "0")];
const BOX: Attributes = &[("notation", "box")];
const ALIGNED: Attributes = &[("displaystyle", "true"), ("rowspacing", "3pt")];

static TAGS: phf::Map<&'static str, Style> = phf_map! {
    r"\displaylines" => style(
        "mtable",
        &[("rowspacing", "0.5em"), ("columnspacing", "1em"), ("displaystyle", "true")],
    ),
    r"\smallmatrix" => style("mtable", &[("rowspacing", "0.1em"), ("columnspacing", "0.2778em")]),
    r"\split" => style(
        "mtable",
        &[("displaystyle", "true"), ("columnspacing", "0em"), ("rowspacing", "3pt")],
    ),
    r"\align" => style("mtable", ALIGNED),
    r"\align*" => style("mtable", ALIGNED),
    r"\aligned" => style("mtable", ALIGNED),
    r"\gather" => style("mtable", ALIGNED),
    r"\gather*" => style("mtable", ALIGNED),
    r"\gathered" => style("mtable", ALIGNED),
    "_" => style("msub", NONE),
    "^" => style("msup", NONE),
    "_^" => style("msubsup", NONE),
    r"\binom" => style("mfrac", LINETHICKNESS_ZERO),
    r"\cfrac" => style("mfrac", NONE),
    r"\dbinom" => style("mfrac", LINETHICKNESS_ZERO),
    r"\dfrac" => style("mfrac", NONE),
    r"\frac" => style("mfrac", NONE),
    r"\genfrac" => style("mfrac", NONE),
    r"\tbinom" => style("mfrac", LINETHICKNESS_ZERO),
    r"\tfrac" => style("mfrac", NONE),
    r"\acute" => style("mover", NONE),
    r"\bar" => style("mover", NONE),
    r"\breve" => style("mover", NONE),
    r"\check" => style("mover", NONE),
    r"\dot" => style("mover", NONE),
    r"\ddot" => style("mover", NONE),
    r"\dddot" => style("mover", NONE),
    r"\ddddot" => style("mover", NONE),
    r"\grave" => style("mover", NONE),
    r"\hat" => style("mover", NONE),
    r"\limits" => style("munderover", NONE),
    r"\mathring" => style("mover", NONE),
    r"\overbrace" => style("mover", NONE),
    r"\overleftarrow" => style("mover", NONE),
    r"\overleftrightarrow" => style("mover", NONE),
    r"\overline" => style("mover", NONE),
    r"\overparen" => style("mover", NONE),
    r"\overrightarrow" => style("mover", NONE),
    r"\tilde" => style("mover", NONE),
    r"\overset" => style("mover", NONE),
    r"\underbrace" => style("munder", NONE),
    r"\underleftarrow" => style("munder", NONE),
    r"\underline" => style("munder", NONE),
    r"\underparen" => style("munder", NONE),
    r"\underrightarrow" => style("munder", NONE),
    r"\underleftrightarrow" => style("munder", NONE),
    r"\underset" => style("munder", NONE),
    r"\vec" => style("mover", NONE),
    r"\widehat" => style("mover", NONE),
    r"\widetilde" => style("mover", NONE),
    r"\:" => style("mspace", &[("width", "0.222em")]),
    r"\," => style("mspace", &[("width", "0.167em")]),
    r"\\" => style("mspace", &[("linebreak", "newline")]),
    r"\enspace" => style("mspace", &[("width", "0.5em")]),
    r"\!" => style("mspace", &[("width", "negativethinmathspace")]),
    r"\>" => style("mspace", &[("width", "0.222em")]),
    r"\hskip" => style("mspace", NONE),
    r"\hspace" => style("mspace", NONE),
    r"\kern" => style("mspace", NONE),
    r"\mkern" => style("mspace", NONE),
    r"\mskip" => style("mspace", NONE),
    r"\mspace" => style("mspace", NONE),
    r"\negthinspace" => style("mspace", &[("width", "negativethinmathspace")]),
    r"\negmedspace" => style("mspace", &[("width", "negativemediummathspace")]),
    r"\negthickspace" => style("mspace", &[("width", "negativethickmathspace")]),
    r"\thinspace" => style("mspace", &[("width", "thinmathspace")]),
    r"\qquad" => style("mspace", &[("width", "2em")]),
    r"\quad" => style("mspace", &[("width", "1em")]),
    r"\;" => style("mspace", &[("width", "0.278em")]),
    r"\boxed" => style("menclose", BOX),
    r"\fbox" => style("menclose", BOX),
    r"\left" => style("mo", &[("stretchy", "true"), ("fence", "true"), ("form", "prefix")]),
    r"\middle" => style(
        "mo",
        &[("stretchy", "true"), ("fence", "true"), ("lspace", "0.05em"), ("rspace", "0.05em")],
    ),
    r"\right" => style("mo", &[("stretchy", "true"), ("fence", "true"), ("form", "postfix")]),
    r"\color" => style("mstyle", NONE),
    r"\sqrt" => style("msqrt", NONE),
    r"\root" => style("mroot", NONE),
    r"\href" => style("mrow", NONE),
    r"\text" => style("mtext", NONE),
    r"\textbf" => style("mtext", &[("mathvariant", "bold")]),
    r"\textit" => style("mtext", &[("mathvariant", "italic")]),
    r"\textrm" => style("mtext", NONE),
    r"\textsf" => style("mtext", &[("mathvariant", "sans-serif")]),
    r"\texttt" => style("mtext", &[("mathvariant", "monospace")]),
    r"\hbox" => style("mtext", NONE),
    r"\mbox" => style("mtext", NONE),
    r"\hphantom" => style("mphantom", NONE),
    r"\phantom" => style("mphantom", NONE),
    r"\vphantom" => style("mphantom", NONE),
    r"\sideset" => style("mrow", NONE),
    r"\skew" => style("mrow", NONE),
    r"\mod" => style("mi", NONE),
    r"\pmod" => style("mi", NONE),
    r"\bmod" => style("mo", NONE),
    r"\xleftarrow" => style("mover", NONE),
    r"\xrightarrow" => style("mover", NONE),
    r"\Bigg" => style("mo", &[("minsize", "2.470em"), ("maxsize", "2.470em")]),
    r"\bigg" => style("mo", &[("minsize", "2.047em"), ("maxsize", "2.047em")]),
    r"\Big" => style("mo", &[("minsize", "1.623em"), ("maxsize", "1.623em")]),
    r"\big" => style("mo", &[("minsize", "1.2em"), ("maxsize", "1.2em")]),
};

/// Sized delimiter commands and their size.
const BIG: [(&str, &str); 4] = [
    (r"\Bigg", "2.470em"),
    (r"\bigg", "2.047em"),
    (r"\Big", "1.623em"),
    (r"\big", "1.2em"),
];

/// Commands rendered as a plain table.
pub(crate) static MATRICES: phf::Set<&'static str> = phf_set! {
    r"\matrix",
    r"\matrix*",
    r"\pmatrix",
    r"\pmatrix*",
    r"\bmatrix",
    r"\bmatrix*",
    r"\Bmatrix",
    r"\Bmatrix*",
    r"\vmatrix",
    r"\vmatrix*",
    r"\Vmatrix",
    r"\Vmatrix*",
    r"\array",
    r"\subarray",
    r"\substack",
    r"\cases",
    r"\displaylines",
    r"\smallmatrix",
    r"\split",
    r"\align",
    r"\align*",
    r"\aligned",
    r"\gather",
    r"\gather*",
    r"\gathered",
};

pub(crate) static LIMIT: phf::Set<&'static str> = phf_set! {
    r"\lim", r"\sup", r"\inf", r"\max", r"\min",
};

/// Tags derived from templates: the `l`/`m`/`r` variants of the sized delimiters, plus the
/// matrix and limit commands that share a plain tag.
static DERIVED_TAGS: LazyLock<FxHashMap<String, Style>> = LazyLock::new(|| {
    let mut map = FxHashMap::default();
    for postfix in ["l", "m", "r"] {
        for (command, size) in BIG {
            let attributes = vec![
                ("stretchy", "true"),
                ("fence", "true"),
                ("minsize", size),
                ("maxsize", size),
            ];
            map.insert(
                format!("{command}{postfix}"),
                Style {
                    tag: "mo",
                    attributes: Cow::Owned(attributes),
                },
            );
        }
    }
    for matrix in MATRICES.iter() {
        map.entry((*matrix).to_string())
            .or_insert(style("mtable", NONE));
    }
    for limit in LIMIT.iter() {
        map.insert((*limit).to_string(), style("mo", NONE));
    }
    map
});

/// Sizing and style switches; each applies to the rest of the enclosing group.
static STYLE_SWITCHES: phf::Map<&'static str, Attributes> = phf_map! {
    r"\Huge" => &[("mathsize", "2.49em")],
    r"\huge" => &[("mathsize", "2.07em")],
    r"\LARGE" => &[("mathsize", "1.73em")],
    r"\Large" => &[("mathsize", "1.44em")],
    r"\large" => &[("mathsize", "1.2em")],
    r"\normalsize" => &[("mathsize", "1em")],
    r"\scriptsize" => &[("mathsize", "0.7em")],
    r"\small" => &[("mathsize", "0.85em")],
    r"\tiny" => &[("mathsize", "0.5em")],
    r"\Tiny" => &[("mathsize", "0.6em")],
    r"\displaystyle" => &[("displaystyle", "true"), ("scriptlevel", "0")],
    r"\textstyle" => &[("displaystyle", "false"), ("scriptlevel", "0")],
    r"\scriptstyle" => &[("displaystyle", "false"), ("scriptlevel", "1")],
    r"\scriptscriptstyle" => &[("displaystyle", "false"), ("scriptlevel", "2")],
};

/// The render style of `command`, if it has one.
///
/// Sized delimiters, matrices and limits come from the derived table; style switches are not
/// included (see [`style_switch`]).
pub(crate) fn tag_style(command: &str) -> Option<&'static Style> {
    TAGS.get(command).or_else(|| DERIVED_TAGS.get(command))
}

/// The `mstyle` attributes of a sizing or style switch.
pub(crate) fn style_switch(command: &str) -> Option<Attributes> {
    STYLE_SWITCHES.get(command).copied()
}

/// Maps an element kind (`mi`, `mn`, `mo`, `mtext`, or `fence` for fence operators) to a
/// `mathvariant`. Kinds without an entry use `default`; the value `none` means no variant.
#[derive(Debug)]
pub(crate) struct Font(Attributes);

pub(crate) static NO_FONT: Font = Font(NONE);

impl Font {
    pub(crate) fn variant(&self, kind: &str) -> Option<&'static str> {
        let lookup = |key: &str| {
            self.0
                .iter()
                .find_map(|(k, v)| if *k == key { Some(*v) } else { None })
        };
        match lookup(kind).or_else(|| lookup("default")) {
            Some("none") | None => None,
            Some(variant) => Some(variant),
        }
    }
}

/// Fonts which apply to the argument of the command.
pub(crate) static LOCAL_FONTS: phf::Map<&'static str, Font> = phf_map! {
    r"\Bbb" => Font(&[("default", "double-struck"), ("fence", "none")]),
    r"\boldsymbol" => Font(&[("default", "bold"), ("mi", "bold-italic"), ("mtext", "none")]),
    r"\mathbb" => Font(&[("default", "double-struck"), ("fence", "none")]),
    r"\mathbf" => Font(&[("default", "bold"), ("fence", "none")]),
    r"\mathcal" => Font(&[("default", "script"), ("fence", "none")]),
    r"\mathfrak" => Font(&[("default", "fraktur"), ("fence", "none")]),
    r"\mathit" => Font(&[("default", "italic"), ("fence", "none")]),
    r"\mathrm" => Font(&[("default", "none"), ("mi", "normal")]),
    r"\mathscr" => Font(&[("default", "script"), ("fence", "none")]),
    r"\mathsf" => Font(&[("default", "none"), ("mi", "sans-serif")]),
    r"\mathtt" => Font(&[("default", "monospace"), ("fence", "none")]),
    r"\mit" => Font(&[("default", "italic"), ("fence", "none"), ("mi", "none")]),
    r"\oldstyle" => Font(&[("default", "normal"), ("fence", "none")]),
    r"\scr" => Font(&[("default", "script"), ("fence", "none")]),
    r"\tt" => Font(&[("default", "monospace"), ("fence", "none")]),
};

/// Fonts which apply to the rest of the enclosing group.
pub(crate) static GLOBAL_FONTS: phf::Map<&'static str, Font> = phf_map! {
    r"\rm" => Font(&[("default", "none"), ("mi", "normal")]),
    r"\bf" => Font(&[("default", "none"), ("mi", "bold")]),
    r"\it" => Font(&[("default", "none"), ("mi", "italic")]),
    r"\sf" => Font(&[("default", "none"), ("mi", "sans-serif")]),
    r"\tt" => Font(&[("default", "none"), ("mi", "monospace")]),
    r"\cal" => Font(&[("default", "script"), ("fence", "none")]),
    r"\frak" => Font(&[("default", "fraktur"), ("fence", "none")]),
};

/// Accent glyphs placed over or under the argument of a diacritic command.
pub(crate) static DIACRITICS: phf::Map<&'static str, (&'static str, Attributes)> = phf_map! {
    r"\acute" => ("\u{B4}", NONE),
    r"\bar" => ("\u{AF}", &[("stretchy", "true")]),
    r"\breve" => ("\u{2D8}", NONE),
    r"\check" => ("\u{2C7}", NONE),
    r"\dot" => ("\u{2D9}", NONE),
    r"\ddot" => ("\u{A8}", NONE),
    r"\dddot" => ("\u{20DB}", NONE),
    r"\ddddot" => ("\u{20DC}", NONE),
    r"\grave" => ("`", NONE),
    r"\hat" => ("^", &[("stretchy", "false")]),
    r"\mathring" => ("\u{2DA}", NONE),
    r"\overbrace" => ("\u{23DE}", NONE),
    r"\overleftarrow" => ("\u{2190}", NONE),
    r"\overleftrightarrow" => ("\u{2194}", NONE),
    r"\overline" => ("\u{2015}", &[("accent", "true")]),
    r"\overparen" => ("\u{23DC}", NONE),
    r"\overrightarrow" => ("\u{2192}", NONE),
    r"\tilde" => ("~", &[("stretchy", "false")]),
    r"\underbrace" => ("\u{23DF}", NONE),
    r"\underleftarrow" => ("\u{2190}", NONE),
    r"\underleftrightarrow" => ("\u{2194}", NONE),
    r"\underline" => ("\u{2015}", &[("accent", "true")]),
    r"\underparen" => ("\u{23DD}", NONE),
    r"\underrightarrow" => ("\u{2192}", NONE),
    r"\vec" => ("\u{2192}", &[("stretchy", "true")]),
    r"\widehat" => ("^", NONE),
    r"\widetilde" => ("~", NONE),
};

/// Named functions rendered upright without their backslash.
pub(crate) static FUNCTIONS: phf::Set<&'static str> = phf_set! {
    r"\arccos", r"\arcsin", r"\arctan", r"\cos", r"\cosh", r"\cot", r"\coth", r"\csc", r"\deg",
    r"\dim", r"\exp", r"\hom", r"\ker", r"\ln", r"\lg", r"\log", r"\sec", r"\sin", r"\sinh",
    r"\tan", r"\tanh",
};

/// Operators with movable limits and a fixed label.
pub(crate) static SUB_LIST: phf::Map<&'static str, &'static str> = phf_map! {
    r"\det" => "det",
    r"\gcd" => "gcd",
    r"\intop" => "\u{222B}",
    r"\injlim" => "inj\u{2006}lim",
    r"\liminf" => "lim\u{2006}inf",
    r"\limsup" => "lim\u{2006}sup",
    r"\Pr" => "Pr",
    r"\projlim" => "proj\u{2006}lim",
};

/// Tokens always rendered as `mo`, regardless of their code point.
pub(crate) static OPERATORS: phf::Set<&'static str> = phf_set! {
    "+", "-", "*", "/", "(", ")", "=", ",", "?", "[", "]", "|", r"\|", "!", r"\{", r"\}", ">",
    "<", ".", r"\bigotimes", r"\centerdot", r"\dots", r"\dotsc", r"\dotso", r"\gt", r"\ldotp",
    r"\lt", r"\lvert", r"\lVert", r"\lvertneqq", r"\ngeqq", r"\omicron", r"\rvert", r"\rVert",
    r"\S", r"\smallfrown", r"\smallint", r"\smallsmile", r"\surd", r"\varsubsetneqq",
    r"\varsupsetneqq", r"\times", r"\pm", r"\mp", r"\div", r"\neg", r"\lnot", r"\langle",
    r"\rangle", r"\lfloor", r"\rfloor", r"\lceil", r"\rceil",
};

/// Operators which are fences and never stretch.
pub(crate) static FENCES: phf::Set<&'static str> = phf_set! {
    "(", ")", "[", "]", "|", r"\|", r"\{", r"\}", r"\surd", r"\langle", r"\rangle", r"\lfloor",
    r"\rfloor", r"\lceil", r"\rceil",
};

/// Tokens rendered as a non-breaking space.
pub(crate) static SPACES: phf::Set<&'static str> = phf_set! {
    r"\ ", "~", r"\nobreakspace", r"\space",
};

/// The next prime in the chain `\prime`, `\dprime`, `\trprime`, `\qprime`.
pub(crate) fn next_prime(prime: &str) -> Option<&'static str> {
    let index = PRIMES.iter().position(|p| *p == prime)?;
    PRIMES.get(index + 1).copied()
}

#[inline]
pub(crate) fn is_prime(token: &str) -> bool {
    PRIMES.contains(&token)
}

/// The tabular commands whose cells alternate right and left alignment.
#[inline]
pub(crate) fn is_align_family(command: &str) -> bool {
    matches!(command, r"\split" | r"\align" | r"\align*" | r"\aligned")
}

#[cfg(test)]
mod tests {
    use super::{
        DIACRITICS, FUNCTIONS, GLOBAL_FONTS, LOCAL_FONTS, MATRICES, NO_FONT, OPERATORS, Shape,
        next_prime, shape, style_switch, tag_style,
    };

    #[test]
    fn derived_sized_delimiters() {
        let style = tag_style(r"\Bigl").unwrap();
        assert_eq!(style.tag, "mo");
        assert_eq!(
            &*style.attributes,
            &[
                ("stretchy", "true"),
                ("fence", "true"),
                ("minsize", "1.623em"),
                ("maxsize", "1.623em"),
            ]
        );
        assert_eq!(tag_style(r"\bigm").map(|s| s.tag), Some("mo"));
        assert_eq!(tag_style(r"\big").map(|s| s.attributes.len()), Some(2));
    }

    #[test]
    fn derived_matrices_and_limits() {
        for matrix in MATRICES.iter() {
            assert_eq!(tag_style(matrix).map(|s| s.tag), Some("mtable"), "{matrix}");
        }
        // Explicit entries keep their attributes.
        assert_eq!(tag_style(r"\split").map(|s| s.attributes.len()), Some(3));
        assert_eq!(tag_style(r"\lim").map(|s| s.tag), Some("mo"));
        assert!(tag_style(r"\alpha").is_none());
        assert!(tag_style(r"\displaystyle").is_none());
    }

    #[test]
    fn shapes() {
        let problems = [
            (r"\frac", Some(Shape::TwoParams)),
            (r"\overset", Some(Shape::Reversed)),
            (r"\hat", Some(Shape::OneParam)),
            (r"\Biggr", Some(Shape::RawText)),
            (r"\over", Some(Shape::LegacyFraction)),
            (r"\pmatrix", Some(Shape::Matrix)),
            (r"\mathbf", None),
            (r"\alpha", None),
        ];
        for (command, expected) in problems {
            assert_eq!(shape(command), expected, "failed: {command}");
        }
    }

    #[test]
    fn fonts_fall_back_to_default() {
        let bold = &LOCAL_FONTS[r"\mathbf"];
        assert_eq!(bold.variant("mi"), Some("bold"));
        assert_eq!(bold.variant("mn"), Some("bold"));
        assert_eq!(bold.variant("fence"), None);
        let roman = &LOCAL_FONTS[r"\mathrm"];
        assert_eq!(roman.variant("mi"), Some("normal"));
        assert_eq!(roman.variant("mn"), None);
        assert_eq!(GLOBAL_FONTS[r"\bf"].variant("mi"), Some("bold"));
        assert_eq!(NO_FONT.variant("mi"), None);
    }

    #[test]
    fn table_contents() {
        assert_eq!(DIACRITICS[r"\vec"].0, "\u{2192}");
        assert!(FUNCTIONS.contains(r"\sin"));
        assert!(OPERATORS.contains(r"\times"));
        assert_eq!(style_switch(r"\large"), Some(&[("mathsize", "1.2em")][..]));
    }

    #[test]
    fn prime_chain() {
        assert_eq!(next_prime(r"\prime"), Some(r"\dprime"));
        assert_eq!(next_prime(r"\trprime"), Some(r"\qprime"));
        assert_eq!(next_prime(r"\qprime"), None);
        assert_eq!(next_prime("x"), None);
    }
}
