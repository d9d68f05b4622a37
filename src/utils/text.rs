/// Neutralize markup-significant characters before text reaches a view
/// target.
///
/// `&`, `<`, `>`, `"` and `'` become HTML entities and control characters
/// (other than newline and tab) are dropped, so untrusted catalog metadata
/// always renders as literal text.
pub fn safe_text(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '\n' | '\t' => escaped.push(ch),
            c if c.is_control() => {}
            c => escaped.push(c),
        }
    }
    escaped
}
