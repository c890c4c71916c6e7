//! Encoding of post bodies before they are persisted.

use std::fmt::Write;

/// Escape markup-significant characters so stored content can never carry raw
/// caller-supplied markup.
///
/// `& < > " '` become named references; every non-ASCII character becomes a
/// hexadecimal numeric reference. Everything else passes through unchanged.
pub fn encode_content(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_ascii() => out.push(c),
            c => {
                // Writing into a String cannot fail.
                let _ = write!(out, "&#x{:x};", c as u32);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            encode_content(r#"<p class="x">Tom & Jerry's</p>"#),
            "&lt;p class=&quot;x&quot;&gt;Tom &amp; Jerry&apos;s&lt;/p&gt;"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(encode_content("hello world\n"), "hello world\n");
    }

    #[test]
    fn test_non_ascii_as_numeric_reference() {
        assert_eq!(encode_content("café"), "caf&#xe9;");
        assert_eq!(encode_content("🚀"), "&#x1f680;");
    }

    #[test]
    fn test_encoding_is_not_idempotent() {
        // Already-encoded input is encoded again, never passed through.
        assert_eq!(encode_content("&amp;"), "&amp;amp;");
    }
}
