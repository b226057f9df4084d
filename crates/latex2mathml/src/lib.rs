//! Convert LaTeX math to MathML.
//!
//! The conversion runs in three steps: the lexer splits the LaTeX source into tokens, the parser
//! builds a syntax tree of [`Node`]s, and the converter renders that tree into MathML
//! [`Element`]s, which are finally serialized.
//!
//! # Usage
//!
//! The main struct of this library is [`LatexToMathML`]. Create an instance with a [`Config`] and
//! call [`LatexToMathML::convert`]:
//!
//! ```rust
//! use latex2mathml::{Config, LatexToMathML, MathDisplay};
//!
//! let converter = LatexToMathML::new(Config::default());
//! let mathml = converter.convert(r"x^2", MathDisplay::Inline).unwrap();
//! assert_eq!(
//!     mathml,
//!     r#"<math display="inline"><mrow><msup><mi>x</mi><mn>2</mn></msup></mrow></math>"#
//! );
//! ```
//!
//! For one-off conversions there is also the free function [`convert`].
//!
//! # Features
//!
//! - `serde`: With this feature, [`Config`] implements serde's `Serialize` and `Deserialize`.
//! - `ariadne`: With this feature, [`LatexError::to_report`] builds a pretty error report.
//!
mod ast;
mod commands;
mod converter;
mod environments;
mod error;
mod lexer;
mod parser;
mod symbols;
mod table;
mod text_mode;
mod token;
mod token_queue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use mathml_tree::Element;

pub use self::ast::{Delimiter, Node};
pub use self::error::{DelimiterModifier, LatexErrKind, LatexError, ScriptKind};
pub use self::symbols::SymbolTable;
use self::{commands::NO_FONT, converter::Converter, parser::Parser};

/// Display mode for the LaTeX math equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathDisplay {
    /// For inline equations, like those in `$...$` in LaTeX.
    Inline,
    /// For block equations (or "display style" equations), like those in `$$...$$` in LaTeX.
    Block,
}

impl MathDisplay {
    fn as_str(self) -> &'static str {
        match self {
            MathDisplay::Inline => "inline",
            MathDisplay::Block => "block",
        }
    }
}

/// Configuration for pretty-printing the MathML output.
///
/// Pretty-printing means that newlines and indentation is added to the MathML output, to make it
/// easier to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[non_exhaustive]
pub enum PrettyPrint {
    /// Never pretty print.
    #[default]
    Never,
    /// Always pretty print.
    Always,
    /// Pretty print for block equations only.
    Auto,
}

/// Configuration object for the LaTeX to MathML conversion.
///
/// # Example usage
///
/// ```rust
/// use latex2mathml::{Config, PrettyPrint};
///
/// // Default values
/// let config = Config::default();
///
/// // Pretty print block equations with four spaces and declare the MathML namespace
/// let config = Config {
///     pretty_print: PrettyPrint::Auto,
///     indent: 4,
///     namespace: Some("http://www.w3.org/1998/Math/MathML".to_string()),
/// };
/// ```
///
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct Config {
    /// A configuration for pretty-printing the MathML output. See [`PrettyPrint`] for details.
    pub pretty_print: PrettyPrint,
    /// Spaces per nesting level when pretty printing.
    pub indent: usize,
    /// If set, emitted as the `xmlns` attribute of the `<math>` tag.
    pub namespace: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pretty_print: PrettyPrint::Never,
            indent: 2,
            namespace: None,
        }
    }
}

/// A converter that transforms LaTeX math equations into MathML.
#[derive(Debug)]
pub struct LatexToMathML<'symbols> {
    config: Config,
    symbols: &'symbols SymbolTable,
}

impl LatexToMathML<'static> {
    /// Create a converter that uses the bundled symbol table.
    pub fn new(config: Config) -> Self {
        LatexToMathML {
            config,
            symbols: SymbolTable::bundled(),
        }
    }
}

impl<'symbols> LatexToMathML<'symbols> {
    /// Create a converter that resolves symbol names through `symbols`.
    ///
    /// ```rust
    /// use latex2mathml::{Config, LatexToMathML, MathDisplay, SymbolTable};
    ///
    /// let symbols = SymbolTable::from_unimath("003B1^α^\\alpha^\\mupalpha^L^^");
    /// let converter = LatexToMathML::with_symbols(Config::default(), &symbols);
    /// let mathml = converter.convert(r"\alpha", MathDisplay::Inline).unwrap();
    /// assert!(mathml.contains("<mi>α</mi>"));
    /// ```
    pub fn with_symbols(config: Config, symbols: &'symbols SymbolTable) -> Self {
        LatexToMathML { config, symbols }
    }

    /// Parse LaTeX text into its syntax tree.
    pub fn parse(&self, latex: &str) -> Result<Vec<Node>, Box<LatexError>> {
        Parser::new(latex, self.symbols).parse()
    }

    /// Convert LaTeX text to a `<math>` element.
    pub fn convert_to_element(
        &self,
        latex: &str,
        display: MathDisplay,
    ) -> Result<Element, Box<LatexError>> {
        let nodes = self.parse(latex)?;
        Ok(render_math(
            &nodes,
            self.symbols,
            self.config.namespace.as_deref(),
            display.as_str(),
        ))
    }

    /// Convert LaTeX text to serialized MathML.
    ///
    /// The second argument specifies whether it is inline-equation or block-equation.
    ///
    /// ```rust
    /// use latex2mathml::{Config, LatexToMathML, MathDisplay, PrettyPrint};
    ///
    /// let config = Config {
    ///     pretty_print: PrettyPrint::Always,
    ///     ..Default::default()
    /// };
    /// let converter = LatexToMathML::new(config);
    /// let mathml = converter.convert(r"\frac{1}{2}", MathDisplay::Block).unwrap();
    /// println!("{}", mathml);
    /// ```
    ///
    pub fn convert(&self, latex: &str, display: MathDisplay) -> Result<String, Box<LatexError>> {
        let math = self.convert_to_element(latex, display)?;
        let pretty_print = matches!(self.config.pretty_print, PrettyPrint::Always)
            || (matches!(self.config.pretty_print, PrettyPrint::Auto)
                && display == MathDisplay::Block);
        let width = if pretty_print { self.config.indent } else { 0 };
        Ok(math.write_to_string(width))
    }
}

/// Convert LaTeX text to a serialized `<math>` document.
///
/// `namespace` becomes the `xmlns` attribute unless it is empty, `display` the `display`
/// attribute. An `indent` of zero gives compact output; otherwise each nesting level is indented
/// by that many spaces.
///
/// ```rust
/// let mathml = latex2mathml::convert(r"\sqrt{2}", "", "block", 0).unwrap();
/// assert_eq!(
///     mathml,
///     r#"<math display="block"><mrow><msqrt><mrow><mn>2</mn></mrow></msqrt></mrow></math>"#
/// );
/// ```
pub fn convert(
    latex: &str,
    namespace: &str,
    display: &str,
    indent: usize,
) -> Result<String, Box<LatexError>> {
    let symbols = SymbolTable::bundled();
    let nodes = Parser::new(latex, symbols).parse()?;
    let namespace = (!namespace.is_empty()).then_some(namespace);
    Ok(render_math(&nodes, symbols, namespace, display).write_to_string(indent))
}

fn render_math(
    nodes: &[Node],
    symbols: &SymbolTable,
    namespace: Option<&str>,
    display: &str,
) -> Element {
    let mut math = Element::new("math");
    if let Some(namespace) = namespace {
        math.set_attr("xmlns", namespace);
    }
    math.set_attr("display", display);
    let row = math.create_child("mrow");
    Converter::new(symbols).render_group(nodes, row, &NO_FONT);
    math
}
