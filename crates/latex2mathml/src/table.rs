use std::mem;
use std::slice;

use mathml_tree::Element;

use crate::ast::Node;
use crate::commands::{
    BRACES, CARRIAGE_RETURN, COLUMN_SEPARATOR, Font, HDASHLINE, HFIL, HLINE, ROW_SEPARATOR,
    is_align_family,
};
use crate::converter::Converter;

/// Cycles through the column alignment specifier, one letter per cell.
struct Columns<'a> {
    alignment: &'a [u8],
    index: usize,
    current: Option<&'static str>,
}

impl<'a> Columns<'a> {
    fn new(alignment: &'a str) -> Self {
        Columns {
            alignment: alignment.as_bytes(),
            index: 0,
            current: None,
        }
    }

    /// The alignment of the next cell. Letters without a meaning keep the previous alignment.
    fn next(&mut self) -> Option<&'static str> {
        if !self.alignment.is_empty() {
            let letter = self.alignment[self.index % self.alignment.len()];
            if let Some(align) = column_align(letter) {
                self.current = Some(align);
            }
            self.index += 1;
        }
        self.current
    }
}

fn column_align(letter: u8) -> Option<&'static str> {
    match letter {
        b'l' => Some("left"),
        b'c' => Some("center"),
        b'r' => Some("right"),
        _ => None,
    }
}

fn new_cell(alignment: Option<&'static str>) -> Element {
    let mut cell = Element::new("mtd");
    if let Some(alignment) = alignment {
        cell.set_attr("columnalign", alignment);
    }
    cell
}

/// `\hfil` before all content aligns the cell right; after all content, left.
fn set_cell_alignment(cell: &mut Element, fills: &[bool]) {
    if !fills.contains(&true) {
        return;
    }
    match (fills.first(), fills.last()) {
        (Some(true), Some(false)) => cell.set_attr("columnalign", "right"),
        (Some(false), Some(true)) => cell.set_attr("columnalign", "left"),
        _ => {}
    }
}

/// Render the body of a tabular command into `table`, splitting it into rows at `\\` and into
/// cells at `&`.
pub(crate) fn render_table(
    converter: &Converter<'_>,
    nodes: &[Node],
    table: &mut Element,
    command: &str,
    alignment: &str,
    font: &Font,
) {
    let mut columns = Columns::new(alignment);
    let mut row: Option<Element> = None;
    let mut cell: Option<Element> = None;
    let mut max_columns = 0;
    let mut row_index = 0;
    let mut row_lines: Vec<&str> = Vec::new();
    let mut fills: Vec<bool> = Vec::new();

    for node in nodes {
        let current_row = row.get_or_insert_with(|| Element::new("mtr"));
        let current_cell = cell.get_or_insert_with(|| new_cell(columns.next()));
        match node.token.as_str() {
            BRACES => converter.render_group(slice::from_ref(node), current_cell, font),
            COLUMN_SEPARATOR => {
                set_cell_alignment(current_cell, &fills);
                fills.clear();
                let mut next = new_cell(columns.next());
                if is_align_family(command) && columns.index % 2 == 0 {
                    next.create_child("mi");
                }
                current_row.push_child(mem::replace(current_cell, next));
            }
            ROW_SEPARATOR | CARRIAGE_RETURN => {
                set_cell_alignment(current_cell, &fills);
                fills.clear();
                row_index += 1;
                max_columns = max_columns.max(columns.index);
                columns.index = 0;
                let next = new_cell(columns.next());
                current_row.push_child(mem::replace(current_cell, next));
                table.push_child(mem::replace(current_row, Element::new("mtr")));
            }
            HLINE => row_lines.push("solid"),
            HDASHLINE => row_lines.push("dashed"),
            HFIL => fills.push(true),
            _ => {
                if row_index > row_lines.len() {
                    row_lines.push("none");
                }
                fills.push(false);
                converter.render_group(slice::from_ref(node), current_cell, font);
            }
        }
    }
    max_columns = max_columns.max(columns.index);

    if let (Some(mut row), Some(mut cell)) = (row, cell) {
        set_cell_alignment(&mut cell, &fills);
        // A final `\\` leaves a row holding one empty cell.
        let trailing = row.children().is_empty() && cell.is_empty();
        if !trailing {
            row.push_child(cell);
            table.push_child(row);
        }
    }

    if row_lines.contains(&"solid") {
        table.set_attr("rowlines", row_lines.join(" "));
    }
    if max_columns > 0 && matches!(command, r"\align" | r"\align*" | r"\aligned") {
        let pairs = (max_columns / 2).max(1);
        table.set_attr("columnspacing", vec!["0em 2em"; pairs].join(" "));
    }
}

/// Splits `|` column rules out of an alignment specifier.
///
/// Returns the remaining alignment letters and, when the specifier has rules, the
/// `columnlines` value: one entry per gap between columns.
pub(crate) fn split_alignment(alignment: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(alignment) = alignment else {
        return (None, None);
    };
    if !alignment.contains('|') {
        return (Some(alignment.to_string()), None);
    }
    let mut columns = String::new();
    let mut lines = Vec::new();
    for ch in alignment.chars() {
        if ch == '|' {
            lines.push("solid");
        } else {
            columns.push(ch);
        }
        if columns.len() == lines.len() + 2 {
            lines.push("none");
        }
    }
    (Some(columns), Some(lines.join(" ")))
}

#[cfg(test)]
mod tests {
    use mathml_tree::Element;

    use super::split_alignment;
    use crate::commands::NO_FONT;
    use crate::converter::Converter;
    use crate::parser::Parser;
    use crate::symbols::SymbolTable;

    fn render(input: &str) -> String {
        let symbols = SymbolTable::bundled();
        let nodes = Parser::new(input, symbols)
            .parse()
            .unwrap_or_else(|err| panic!("failed to parse {input:?}: {err}"));
        let mut row = Element::new("mrow");
        Converter::new(symbols).render_group(&nodes, &mut row, &NO_FONT);
        row.children()
            .iter()
            .map(|child| child.write_to_string(0))
            .collect()
    }

    #[test]
    fn alignment_and_column_lines() {
        let problems = [
            (None, None, None),
            (Some("cc"), Some("cc"), None),
            (Some("c|c"), Some("cc"), Some("solid")),
            (Some("ccc|c"), Some("cccc"), Some("none none solid")),
            (Some("l|c|r"), Some("lcr"), Some("solid solid")),
        ];
        for (input, alignment, lines) in problems {
            let (got_alignment, got_lines) = split_alignment(input);
            assert_eq!(got_alignment.as_deref(), alignment, "failed: {input:?}");
            assert_eq!(got_lines.as_deref(), lines, "failed: {input:?}");
        }
    }

    #[test]
    fn tables() {
        let problems = [
            (
                "matrix",
                r"\begin{matrix}a&b\\c&d\end{matrix}",
                "<mtable><mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr><mtr><mtd><mi>c</mi></mtd><mtd><mi>d</mi></mtd></mtr></mtable>",
            ),
            (
                "trailing_row_separator",
                r"\begin{matrix}a\\\end{matrix}",
                "<mtable><mtr><mtd><mi>a</mi></mtd></mtr></mtable>",
            ),
            (
                "empty_last_cell_is_kept",
                r"\begin{matrix}a&\end{matrix}",
                "<mtable><mtr><mtd><mi>a</mi></mtd><mtd></mtd></mtr></mtable>",
            ),
            (
                "empty",
                r"\begin{matrix}\end{matrix}",
                "<mtable></mtable>",
            ),
            (
                "pmatrix",
                r"\begin{pmatrix}1\end{pmatrix}",
                "<mo>(</mo><mtable><mtr><mtd><mn>1</mn></mtd></mtr></mtable><mo>)</mo>",
            ),
            (
                "vmatrix",
                r"\begin{vmatrix}1\end{vmatrix}",
                "<mo>|</mo><mtable><mtr><mtd><mn>1</mn></mtd></mtr></mtable><mo>|</mo>",
            ),
            (
                "array",
                r"\begin{array}{l|r}a&b\end{array}",
                r#"<mtable columnlines="solid"><mtr><mtd columnalign="left"><mi>a</mi></mtd><mtd columnalign="right"><mi>b</mi></mtd></mtr></mtable>"#,
            ),
            (
                "cases",
                r"\begin{cases}a&b\end{cases}",
                r#"<mrow><mo stretchy="true" fence="true" form="prefix">{</mo><mtable><mtr><mtd columnalign="left"><mi>a</mi></mtd><mtd columnalign="left"><mi>b</mi></mtd></mtr></mtable></mrow>"#,
            ),
            (
                "hline",
                r"\begin{array}{c}a\\\hline b\end{array}",
                r#"<mtable rowlines="solid"><mtr><mtd columnalign="center"><mi>a</mi></mtd></mtr><mtr><mtd columnalign="center"><mi>b</mi></mtd></mtr></mtable>"#,
            ),
            (
                "hfil",
                r"\begin{matrix}\hfil a\end{matrix}",
                r#"<mtable><mtr><mtd columnalign="right"><mi>a</mi></mtd></mtr></mtable>"#,
            ),
            (
                "aligned",
                r"\begin{aligned}a&=b\end{aligned}",
                r#"<mtable displaystyle="true" rowspacing="3pt" columnspacing="0em 2em"><mtr><mtd columnalign="right"><mi>a</mi></mtd><mtd columnalign="left"><mi></mi><mo>=</mo><mi>b</mi></mtd></mtr></mtable>"#,
            ),
            (
                "substack",
                r"\substack{a\\b}",
                r#"<mstyle scriptlevel="1"><mtable><mtr><mtd><mi>a</mi></mtd></mtr><mtr><mtd><mi>b</mi></mtd></mtr></mtable></mstyle>"#,
            ),
        ];
        for (name, input, expected) in problems {
            assert_eq!(render(input), expected, "failed: {name}");
        }
    }

    #[test]
    fn row_lines_mark_each_ruled_row() {
        let output = render(r"\begin{matrix}a\\b\\\hline c\\d\end{matrix}");
        assert!(
            output.starts_with(r#"<mtable rowlines="none solid none">"#),
            "{output}"
        );
    }
}
