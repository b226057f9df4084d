use latex2mathml::{
    Config, DelimiterModifier, LatexErrKind, LatexError, LatexToMathML, MathDisplay, ScriptKind,
};

fn convert_err(converter: &LatexToMathML<'_>, problem: &str) -> LatexError {
    let Err(error) = converter
        .convert(problem, MathDisplay::Inline)
        .map_err(|e| *e)
    else {
        panic!("problem `{}` did not return an error", problem);
    };
    error
}

#[test]
fn main() {
    let problems = [
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
        ("sub_sub", "x_1_2", LatexErrKind::DoubleScript(ScriptKind::Sub)),
        ("sup_sup", "x^1^2", LatexErrKind::DoubleScript(ScriptKind::Sup)),
        ("limits_on_letter", r"x\limits_0", LatexErrKind::LimitsRequireOperator),
        ("over_without_numerator", r"\over b", LatexErrKind::MissingNumerator),
        ("over_without_denominator", r"a \over", LatexErrKind::MissingDenominator),
        ("skew_not_integer", r"\skew{x}\hat{a}", LatexErrKind::InvalidWidth("x".into())),
        ("unclosed_env", r"\begin{matrix} x", LatexErrKind::MissingEnd("matrix".into())),
        (
            "mismatched_begin_end",
            r"\begin{matrix} 1 \end{bmatrix}",
            LatexErrKind::MissingEnd("matrix".into()),
        ),
        (
            "array_without_alignment",
            r"\begin{array} 1 \end{array}",
            LatexErrKind::InvalidAlignment("".into()),
        ),
        (
            "array_bad_alignment",
            r"\begin{array}{cq} 1 \end{array}",
            LatexErrKind::InvalidAlignment("cq".into()),
        ),
        ("incomplete_sup", "x^", LatexErrKind::NoTokens),
        ("incomplete_sqrt", r"\sqrt", LatexErrKind::NoTokens),
        ("sup_closed", "{x^}", LatexErrKind::MissingArgument),
        ("frac_closed", r"{\frac{a}}", LatexErrKind::MissingArgument),
        ("frac_cut_short_by_color", r"{\frac\color{red}a}", LatexErrKind::MissingArgument),
    ];

    let converter = LatexToMathML::new(Config::default());
    for (name, problem, expected) in problems.into_iter() {
        let error = convert_err(&converter, problem);
        assert_eq!(error.1, expected, "failed: {name}");
        assert!(
            error.0.start <= error.0.end && error.0.end <= problem.len(),
            "span out of bounds for {name}: {:?}",
            error.0
        );

        let report = error.to_report("<input>", false);
        let mut buf = Vec::new();
        report
            .write(("<input>", ariadne::Source::from(problem)), &mut buf)
            .expect("failed to write report");
        let output = String::from_utf8(buf).expect("report should be valid UTF-8");
        assert!(output.contains(&expected.string()), "failed: {name}\n{output}");
        assert!(output.contains("<input>"), "failed: {name}\n{output}");
    }
}

#[test]
fn spans_point_at_the_offending_token() {
    let converter = LatexToMathML::new(Config::default());
    let problems = [
        ("ab_1_2", 4..5),
        (r"x+\left(", 2..7),
        (r"x \right)", 2..8),
        ("x^", 2..2),
        (r"\begin{cases} a", 0..13),
    ];
    for (problem, span) in problems {
        assert_eq!(convert_err(&converter, problem).0, span, "failed: {problem}");
    }
}

#[test]
fn html_snippet() {
    let converter = LatexToMathML::new(Config::default());
    let error = convert_err(&converter, "x_1_2");
    assert_eq!(
        error.to_html("x_1_2", MathDisplay::Block, None),
        r#"<p class="latex2mathml-error" title="3: Double subscript."><code>x_1_2</code></p>"#
    );
}
