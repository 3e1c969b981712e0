//! Tokenizer for triad source text.

/// A single token from a source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'s> {
    /// A word starting with `.`, such as the `.triad` header.
    Directive(&'s str),
    /// A word containing `@`: a variable or a typed constant.
    Tagged {
        prefix: &'s str,
        body: &'s str,
        text: &'s str,
    },
    /// Any other word: an opcode, a label, or a type name.
    Word(&'s str),
}

impl<'s> Token<'s> {
    /// The token exactly as written.
    pub(crate) fn text(&self) -> &'s str {
        match *self {
            Token::Directive(text) | Token::Word(text) | Token::Tagged { text, .. } => text,
        }
    }
}

/// Tokenize a single line.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `#` and extend to end of line. Only ASCII
/// whitespace separates tokens.
pub(crate) fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    line.split_ascii_whitespace()
        .map(|word| {
            if word.starts_with('.') {
                Token::Directive(word)
            } else if let Some((prefix, body)) = word.split_once('@') {
                Token::Tagged {
                    prefix,
                    body,
                    text: word,
                }
            } else {
                Token::Word(word)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() {
        assert_eq!(tokenize_line(""), vec![]);
        assert_eq!(tokenize_line("   \t  "), vec![]);
    }

    #[test]
    fn comment_only() {
        assert_eq!(tokenize_line("# this is a comment"), vec![]);
    }

    #[test]
    fn instruction_with_comment() {
        assert_eq!(
            tokenize_line("WRITE GF@x # print it"),
            vec![
                Token::Word("WRITE"),
                Token::Tagged {
                    prefix: "GF",
                    body: "x",
                    text: "GF@x"
                }
            ]
        );
    }

    #[test]
    fn constant_body_keeps_later_at_signs() {
        let tokens = tokenize_line("PUSHS string@a@b");
        assert_eq!(
            tokens[1],
            Token::Tagged {
                prefix: "string",
                body: "a@b",
                text: "string@a@b"
            }
        );
    }

    #[test]
    fn header_is_directive() {
        assert_eq!(tokenize_line(".triad"), vec![Token::Directive(".triad")]);
        assert_eq!(tokenize_line("  .TRIAD  ")[0].text(), ".TRIAD");
    }

    #[test]
    fn unicode_space_stays_inside_token() {
        let tokens = tokenize_line("WRITE string@a\u{a0}b\u{2003}c");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text(), "string@a\u{a0}b\u{2003}c");
    }
}
