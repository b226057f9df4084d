use latex2mathml::{Config, LatexErrKind, LatexToMathML, MathDisplay, ScriptKind};
use regex::Regex;

fn converter() -> LatexToMathML<'static> {
    LatexToMathML::new(Config::default())
}

#[test]
fn conversion_is_repeatable() {
    let converter = converter();
    let inputs = [
        r"\begin{pmatrix}a&b\\c&d\end{pmatrix}",
        r"\sum_{i=0}^\infty \frac{x^i}{i!}",
        r"\left[ \mathbf{x} \middle| \hbox{if $y$} \right]",
        r"a \displaystyle \int_0^1 f",
    ];
    for input in inputs {
        let first = converter.convert_to_element(input, MathDisplay::Block).unwrap();
        let second = converter.convert_to_element(input, MathDisplay::Block).unwrap();
        assert_eq!(first, second, "failed: {input}");
    }
}

#[test]
fn braces_contain_exactly_their_content() {
    let converter = converter();
    let inputs = ["{a}", "{a+b}", "{{a}b}", "{}", r"{\frac{1}{2}}"];
    for input in inputs {
        let inner = &input[1..input.len() - 1];
        let group = converter.parse(input).unwrap();
        let content = converter.parse(inner).unwrap();
        assert_eq!(group.len(), 1, "failed: {input}");
        assert_eq!(group[0].children(), content.as_slice(), "failed: {input}");
    }
}

#[test]
fn single_digit_scripts_stay_separate() {
    let converter = converter();
    let script = Regex::new(r"^<math display=.inline.><mrow><msub><mi>x</mi><mn>(\d)</mn></msub></mrow></math>$")
        .unwrap();
    for digit in 0..10 {
        let input = format!("x_{digit}");
        let mathml = converter.convert(&input, MathDisplay::Inline).unwrap();
        let captures = script
            .captures(&mathml)
            .unwrap_or_else(|| panic!("unexpected output for {input}: {mathml}"));
        assert_eq!(&captures[1], digit.to_string(), "failed: {input}");
    }
}

#[test]
fn row_lines_follow_hlines() {
    let converter = converter();
    let row_lines = Regex::new(r#"<mtable rowlines="([a-z ]+)">"#).unwrap();
    for rows in 2..6 {
        for ruled in 1..rows {
            let body: Vec<String> = (0..rows)
                .map(|row| {
                    if row == ruled {
                        format!(r"\hline r{row}")
                    } else {
                        format!("r{row}")
                    }
                })
                .collect();
            let input = format!(r"\begin{{matrix}}{}\end{{matrix}}", body.join(r"\\"));
            let mathml = converter.convert(&input, MathDisplay::Inline).unwrap();
            let captures = row_lines
                .captures(&mathml)
                .unwrap_or_else(|| panic!("no rowlines for {input}: {mathml}"));
            let lines: Vec<&str> = captures[1].split(' ').collect();
            assert_eq!(lines.len(), rows - 1, "failed: {input}");
            for (index, line) in lines.iter().enumerate() {
                let expected = if index + 1 == ruled { "solid" } else { "none" };
                assert_eq!(*line, expected, "failed: {input}");
            }
        }
    }
}

#[test]
fn double_scripts_fail() {
    let converter = converter();
    let problems = [
        ("x_1_2", ScriptKind::Sub),
        ("x^1^2", ScriptKind::Sup),
        ("x'^1^2", ScriptKind::Sup),
    ];
    for (input, kind) in problems {
        let err = converter.convert(input, MathDisplay::Inline).unwrap_err();
        assert_eq!(err.1, LatexErrKind::DoubleScript(kind), "failed: {input}");
    }
}

#[test]
fn primes_after_superscripts_chain() {
    let converter = converter();
    let chained = Regex::new("<msup><mi>x</mi><mrow><mn>1</mn><mi>(′|″)</mi></mrow></msup>").unwrap();
    for (input, prime) in [("x^1'", "′"), ("x^1''", "″")] {
        let mathml = converter.convert(input, MathDisplay::Inline).unwrap();
        let captures = chained
            .captures(&mathml)
            .unwrap_or_else(|| panic!("unexpected output for {input}: {mathml}"));
        assert_eq!(&captures[1], prime, "failed: {input}");
    }
}

#[test]
fn output_is_well_nested() {
    let converter = converter();
    let tag = Regex::new(r"<(/?)([a-z]+)[^>]*>").unwrap();
    let inputs = [
        r"\begin{array}{c|c}1&2\\\hline 3&4\end{array}",
        r"\overbrace{a+b}^{n} \underbrace{c}_{m}",
        r"\binom{n}{k} \pmod{p} \LaTeX",
        r"\sideset{_1^2}{_3^4}\sum \skew{3}\hat{x}",
        r"\xrightarrow[a]{b} \not= \color{red} x",
    ];
    for input in inputs {
        let mathml = converter.convert(input, MathDisplay::Block).unwrap();
        let mut stack = Vec::new();
        for captures in tag.captures_iter(&mathml) {
            let name = captures[2].to_string();
            if captures[1].is_empty() {
                stack.push(name);
            } else {
                assert_eq!(stack.pop().as_deref(), Some(name.as_str()), "failed: {input}");
            }
        }
        assert!(stack.is_empty(), "failed: {input}");
    }
}
