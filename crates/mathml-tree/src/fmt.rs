/// Starts a new line indented by `level * width` spaces.
///
/// With a width of zero nothing is written, which yields compact output.
pub(crate) fn new_line_and_indent(s: &mut String, level: usize, width: usize) {
    if width == 0 {
        return;
    }
    s.push('\n');
    for _ in 0..level.saturating_mul(width) {
        s.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::new_line_and_indent;

    #[test]
    fn compact_writes_nothing() {
        let mut s = String::from("<mi>");
        new_line_and_indent(&mut s, 3, 0);
        assert_eq!(s, "<mi>");
    }

    #[test]
    fn indents_by_level_and_width() {
        let mut s = String::new();
        new_line_and_indent(&mut s, 2, 3);
        assert_eq!(s, "\n      ");
    }

    #[test]
    fn level_zero_only_breaks_the_line() {
        let mut s = String::from("x");
        new_line_and_indent(&mut s, 0, 4);
        assert_eq!(s, "x\n");
    }
}
