/// Escapes `&`, `<` and `>` in `input` for use as element content and appends the result.
///
/// The three special characters are ASCII, so every match position is a char boundary.
pub fn escape_text_content(output: &mut String, input: &str) {
    let mut last = 0;
    for index in memchr::memchr3_iter(b'&', b'<', b'>', input.as_bytes()) {
        output.push_str(&input[last..index]);
        match input.as_bytes()[index] {
            b'&' => output.push_str("&amp;"),
            b'<' => output.push_str("&lt;"),
            _ => output.push_str("&gt;"),
        }
        last = index + 1;
    }
    output.push_str(&input[last..]);
}

/// Escapes `&` and `"` in `input` for use inside a double-quoted attribute value.
///
/// Attribute values are short, so this is a plain character loop.
pub fn escape_double_quoted_attribute(output: &mut String, input: &str) {
    for ch in input.chars() {
        match ch {
            '&' => output.push_str("&amp;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(ch),
        }
    }
}
