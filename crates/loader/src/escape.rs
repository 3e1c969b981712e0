//! Decoding of `\ddd` escapes in string literals.

/// Replace every backslash followed by exactly three decimal digits with
/// the character of that code. A backslash not followed by three digits is
/// kept as-is.
pub fn decode_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' {
            if let Some(c) = escape_at(&chars[i + 1..]) {
                out.push(c);
                i += 4;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

fn escape_at(rest: &[char]) -> Option<char> {
    let digits = rest.get(..3)?;
    let mut code = 0u32;
    for d in digits {
        code = code * 10 + d.to_digit(10)?;
    }
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(decode_escapes("hello"), "hello");
        assert_eq!(decode_escapes(""), "");
    }

    #[test]
    fn space_and_newline() {
        assert_eq!(decode_escapes("a\\032b"), "a b");
        assert_eq!(decode_escapes("line\\010"), "line\n");
    }

    #[test]
    fn backslash_and_hash() {
        assert_eq!(decode_escapes("\\092\\035"), "\\#");
    }

    #[test]
    fn adjacent_escapes() {
        assert_eq!(decode_escapes("\\065\\066\\067"), "ABC");
    }

    #[test]
    fn short_escape_kept() {
        assert_eq!(decode_escapes("\\12"), "\\12");
        assert_eq!(decode_escapes("x\\"), "x\\");
        assert_eq!(decode_escapes("\\1a2"), "\\1a2");
    }

    #[test]
    fn only_three_digits_consumed() {
        assert_eq!(decode_escapes("\\0650"), "A0");
    }

    #[test]
    fn non_ascii_passthrough() {
        assert_eq!(decode_escapes("čaj\\032ß"), "čaj ß");
    }
}
