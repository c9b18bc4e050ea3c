//! Store-specific string escaping
//!
//! Quoting of string literals belongs to the store adapter; the builder
//! only decides *whether* a value is quoted.

/// Escapes the body of a quoted string literal for a particular store
pub trait ValueEscaper {
    /// Returns `raw` escaped for inclusion between single quotes
    fn escape_str(&self, raw: &str) -> String;
}

/// MySQL-compatible escaping (backslash style)
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlEscaper;

impl ValueEscaper for MysqlEscaper {
    fn escape_str(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len() + 8);
        for c in raw.chars() {
            match c {
                '\0' => out.push_str("\\0"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\\' => out.push_str("\\\\"),
                '\'' => out.push_str("\\'"),
                '"' => out.push_str("\\\""),
                '\x1a' => out.push_str("\\Z"),
                c => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(MysqlEscaper.escape_str("photo-2020.jpg"), "photo-2020.jpg");
    }

    #[test]
    fn test_quotes_and_backslashes() {
        assert_eq!(MysqlEscaper.escape_str("it's"), "it\\'s");
        assert_eq!(MysqlEscaper.escape_str("a\\b"), "a\\\\b");
        assert_eq!(MysqlEscaper.escape_str("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn test_control_characters() {
        assert_eq!(MysqlEscaper.escape_str("a\nb\r\0"), "a\\nb\\r\\0");
    }
}
