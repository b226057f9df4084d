use std::fmt::{self, Write};
use std::ops::Range;

use mathml_tree::{escape_double_quoted_attribute, escape_text_content};
use strum_macros::IntoStaticStr;

use crate::MathDisplay;

/// Represents an error that occurred while building the syntax tree.
///
/// The range points into the LaTeX source: the offending token, or an empty range at the
/// position where input was expected.
#[derive(Debug, Clone, PartialEq)]
pub struct LatexError(pub Range<usize>, pub LatexErrKind);

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum LatexErrKind {
    /// A `\left` without `\right`, or a `\right`/`\middle` outside of `\left ... \right`.
    UnbalancedDelimiter(DelimiterModifier),
    DoubleScript(ScriptKind),
    LimitsRequireOperator,
    MissingNumerator,
    MissingDenominator,
    InvalidWidth(Box<str>),
    /// An environment that is never closed; holds the environment name.
    MissingEnd(Box<str>),
    InvalidAlignment(Box<str>),
    NoTokens,
    /// An argument position closed by the enclosing group before it was filled.
    MissingArgument,
}

#[derive(Debug, Clone, Copy, PartialEq, IntoStaticStr)]
pub enum DelimiterModifier {
    #[strum(serialize = r"\left")]
    Left,
    #[strum(serialize = r"\right")]
    Right,
    #[strum(serialize = r"\middle")]
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, IntoStaticStr)]
pub enum ScriptKind {
    #[strum(serialize = "subscript")]
    Sub,
    #[strum(serialize = "superscript")]
    Sup,
}

impl LatexErrKind {
    /// Returns the error message as a string.
    pub fn string(&self) -> String {
        match self {
            LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Left) => {
                r"Found \left without a matching \right.".to_string()
            }
            LatexErrKind::UnbalancedDelimiter(modifier) => {
                "Found \"".to_string()
                    + <&str>::from(*modifier)
                    + r#"" outside of \left ... \right."#
            }
            LatexErrKind::DoubleScript(kind) => "Double ".to_string() + <&str>::from(*kind) + ".",
            LatexErrKind::LimitsRequireOperator => {
                r"\limits must follow a named operator like \sum or \lim.".to_string()
            }
            LatexErrKind::MissingNumerator => "Fraction is missing its numerator.".to_string(),
            LatexErrKind::MissingDenominator => "Fraction is missing its denominator.".to_string(),
            LatexErrKind::InvalidWidth(got) => {
                "Expected an integer width, got \"".to_string() + got + "\"."
            }
            LatexErrKind::MissingEnd(environment) => {
                "Missing \"\\end{".to_string() + environment + "}\"."
            }
            LatexErrKind::InvalidAlignment(got) => {
                "Invalid column alignment \"".to_string() + got + "\"; expected l, c, r or |."
            }
            LatexErrKind::NoTokens => "Expected more input but reached the end.".to_string(),
            LatexErrKind::MissingArgument => {
                "Expected an argument but the group was closed.".to_string()
            }
        }
    }
}

impl LatexError {
    /// Format a LaTeX error as an HTML snippet.
    ///
    /// # Arguments
    /// - `latex`: The original LaTeX input that caused the error.
    /// - `display`: The display mode of the equation (inline or block).
    /// - `css_class`: An optional CSS class to apply to the error element. If `None`,
    ///   defaults to `"latex2mathml-error"`.
    pub fn to_html(&self, latex: &str, display: MathDisplay, css_class: Option<&str>) -> String {
        let mut output = String::new();
        let tag = if matches!(display, MathDisplay::Block) {
            "p"
        } else {
            "span"
        };
        let css_class = css_class.unwrap_or("latex2mathml-error");
        let _ = write!(
            output,
            r#"<{} class="{}" title="{}: "#,
            tag, css_class, self.0.start
        );
        escape_double_quoted_attribute(&mut output, &self.1.string());
        output.push_str(r#""><code>"#);
        escape_text_content(&mut output, latex);
        let _ = write!(output, "</code></{tag}>");
        output
    }
}

#[cfg(feature = "ariadne")]
impl LatexError {
    /// Convert this error into an [`ariadne::Report`] for pretty-printing.
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match &self.1 {
            LatexErrKind::UnbalancedDelimiter(DelimiterModifier::Left) => {
                r"this \left is never closed".into()
            }
            LatexErrKind::UnbalancedDelimiter(modifier) => {
                format!("unmatched \"{}\"", <&str>::from(*modifier))
            }
            LatexErrKind::DoubleScript(kind) => format!("second {}", <&str>::from(*kind)),
            LatexErrKind::LimitsRequireOperator => "no operator before this".into(),
            LatexErrKind::MissingNumerator => "nothing before this".into(),
            LatexErrKind::MissingDenominator => "nothing after this".into(),
            LatexErrKind::InvalidWidth(_) => "expected an integer here".into(),
            LatexErrKind::MissingEnd(environment) => {
                format!("expected \"\\end{{{environment}}}\" to close this")
            }
            LatexErrKind::InvalidAlignment(_) => "invalid alignment".into(),
            LatexErrKind::NoTokens => "expected input here".into(),
            LatexErrKind::MissingArgument => "expected an argument here".into(),
        };

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, self.0.start..self.0.start))
            .with_config(config)
            .with_message(self.1.string())
            .with_label(Label::new((source_name, self.0.clone())).with_message(label_msg))
            .finish()
    }
}

impl fmt::Display for LatexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.0.start, self.1.string())
    }
}

impl std::error::Error for LatexError {}
