//! Markup helpers for previews

use std::borrow::Cow;

/// Escape text for inclusion in HTML content or a quoted attribute
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Wrap plain text in a paragraph, escaping it
pub fn paragraph(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text))
}
