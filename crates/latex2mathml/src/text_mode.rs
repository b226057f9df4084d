//! `\hbox` content, which switches between text and math at each `$`.

use mathml_tree::Element;

use crate::commands::{Font, NO_FONT};
use crate::converter::{Converter, set_font};
use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Text,
    Math,
}

/// Splits `text` into alternating text and math runs.
///
/// An escaped `\$` stays literal: a plain `$` in text, `\$` in math. Empty runs are dropped.
fn split_modes(text: &str) -> Vec<(Mode, String)> {
    let mut runs = Vec::new();
    let mut mode = Mode::Text;
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'$') => {
                chars.next();
                if mode == Mode::Math {
                    current.push('\\');
                }
                current.push('$');
            }
            '$' => {
                if !current.is_empty() {
                    runs.push((mode, std::mem::take(&mut current)));
                }
                mode = match mode {
                    Mode::Text => Mode::Math,
                    Mode::Math => Mode::Text,
                };
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        runs.push((mode, current));
    }
    runs
}

/// Render the text of an `\hbox` into `parent`.
///
/// Text runs are copies of `template` (the box's `mtext`); math runs are parsed and rendered in
/// an `mrow`. Math that fails to parse is shown as text.
pub(crate) fn render_hbox(
    converter: &Converter<'_>,
    text: &str,
    template: &Element,
    parent: &mut Element,
    font: &Font,
) {
    for (mode, run) in split_modes(text) {
        if mode == Mode::Math
            && let Ok(nodes) = Parser::new(&run, converter.symbols).parse()
        {
            let row = parent.create_child("mrow");
            converter.render_group(&nodes, row, &NO_FONT);
            continue;
        }
        let mut element = template.clone();
        element.set_text(run.replace(' ', "\u{A0}"));
        set_font(&mut element, "mtext", font);
        parent.push_child(element);
    }
}

#[cfg(test)]
mod tests {
    use mathml_tree::Element;

    use super::{Mode, split_modes};
    use crate::commands::NO_FONT;
    use crate::converter::Converter;
    use crate::parser::Parser;
    use crate::symbols::SymbolTable;

    #[test]
    fn modes() {
        let problems = [
            ("a", vec![(Mode::Text, "a")]),
            ("a $x$ b", vec![(Mode::Text, "a "), (Mode::Math, "x"), (Mode::Text, " b")]),
            ("$x$", vec![(Mode::Math, "x")]),
            (r"cost \$5", vec![(Mode::Text, "cost $5")]),
            (r"$\$$", vec![(Mode::Math, r"\$")]),
            ("$$", vec![]),
            ("a $x", vec![(Mode::Text, "a "), (Mode::Math, "x")]),
        ];
        for (input, expected) in problems {
            let got = split_modes(input);
            let got: Vec<(Mode, &str)> = got.iter().map(|(m, s)| (*m, s.as_str())).collect();
            assert_eq!(got, expected, "failed: {input:?}");
        }
    }

    fn render(input: &str) -> String {
        let symbols = SymbolTable::bundled();
        let nodes = Parser::new(input, symbols).parse().unwrap();
        let mut row = Element::new("mrow");
        Converter::new(symbols).render_group(&nodes, &mut row, &NO_FONT);
        row.children()
            .iter()
            .map(|child| child.write_to_string(0))
            .collect()
    }

    #[test]
    fn hbox() {
        assert_eq!(
            render(r"\hbox{if $x^2$ then}"),
            "<mstyle displaystyle=\"false\" scriptlevel=\"0\"><mtext>if\u{A0}</mtext><mrow><msup><mi>x</mi><mn>2</mn></msup></mrow><mtext>\u{A0}then</mtext></mstyle>"
        );
        assert_eq!(
            render(r"\hbox{a}"),
            r#"<mstyle displaystyle="false" scriptlevel="0"><mtext>a</mtext></mstyle>"#
        );
    }

    #[test]
    fn broken_math_is_text() {
        assert_eq!(
            render(r"\hbox{$x^$}"),
            r#"<mstyle displaystyle="false" scriptlevel="0"><mtext>x^</mtext></mstyle>"#
        );
    }
}
