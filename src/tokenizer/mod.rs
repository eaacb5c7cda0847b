//! Splits a source string into the [Token] alphabet the parser tree matches
//! against (§6.2). The only layer of the engine that reads raw text.

use crate::error::TokenizeError;
use crate::token::{NumberMode, NumberValue, StringMode, Token};

/// Lexical choices that change what a source string tokenizes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Emit [Token::Whitespace] tokens instead of silently skipping runs of
    /// whitespace.
    pub include_whitespace: bool,
    /// A label may contain digits after its first letter (`[Letter][Letter|Digit]*`)
    /// rather than letters only (`[Letter]+`).
    pub labels_have_digits: bool,
    /// A digit run followed by `.` and another digit run is captured as one
    /// `Decimal` token instead of an `Integer`, a `Symbol('.')`, and another
    /// `Integer`.
    pub capture_decimal_numbers: bool,
    /// Inside a string literal, `\X` is replaced by the literal character
    /// `X` (a raw de-escape, not JSON's table of named escapes).
    pub resolve_escaped_string_characters: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions {
            include_whitespace: false,
            labels_have_digits: true,
            capture_decimal_numbers: true,
            resolve_escaped_string_characters: true,
        }
    }
}

/// The fixed punctuation alphabet (§6.2): any byte not covered by
/// whitespace, a label start, a quote, a digit, or this set is a
/// tokenization error.
const SYMBOLS: &[char] = &[
    '!', '~', '&', '^', '$', '%', '#', '@', '=', '+', '-', '*', '/', '\\', '|', '_', ';', ':',
    '?', ',', '.', '[', '{', '(', '<', ']', '}', ')', '>',
];

fn is_symbol(c: char) -> bool {
    SYMBOLS.contains(&c)
}

fn is_label_start(c: char) -> bool {
    c.is_alphabetic()
}

/// Split `source` into tokens per `options`, per §6.2's lexical rules.
pub fn tokenize(source: &str, options: TokenizerOptions) -> Result<Vec<Token>, TokenizeError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_whitespace() {
                pos += 1;
            }
            if options.include_whitespace {
                tokens.push(Token::Whitespace(chars[start..pos].iter().collect()));
            }
            continue;
        }

        if is_label_start(c) {
            let start = pos;
            pos += 1;
            while pos < chars.len() {
                let next = chars[pos];
                let continues = if options.labels_have_digits {
                    next.is_alphanumeric()
                } else {
                    next.is_alphabetic()
                };
                if !continues {
                    break;
                }
                pos += 1;
            }
            tokens.push(Token::Label(chars[start..pos].iter().collect()));
            continue;
        }

        if c == '\'' || c == '"' {
            let quote = c;
            let mode = if quote == '"' {
                StringMode::Strong
            } else {
                StringMode::Weak
            };
            let token_start = pos;
            pos += 1;
            let mut text = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(TokenizeError::new(
                        token_start,
                        format!("unterminated string starting with {:?}", quote),
                    ));
                }
                let ch = chars[pos];
                if ch == '\\' {
                    pos += 1;
                    if pos >= chars.len() {
                        return Err(TokenizeError::new(
                            pos - 1,
                            "backslash escape at end of input".to_string(),
                        ));
                    }
                    let escaped = chars[pos];
                    if options.resolve_escaped_string_characters {
                        text.push(escaped);
                    } else {
                        text.push('\\');
                        text.push(escaped);
                    }
                    pos += 1;
                    continue;
                }
                if ch == quote {
                    pos += 1;
                    break;
                }
                text.push(ch);
                pos += 1;
            }
            tokens.push(Token::String(text, mode));
            continue;
        }

        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            if options.capture_decimal_numbers
                && pos < chars.len()
                && chars[pos] == '.'
                && pos + 1 < chars.len()
                && chars[pos + 1].is_ascii_digit()
            {
                pos += 1;
                while pos < chars.len() && chars[pos].is_ascii_digit() {
                    pos += 1;
                }
                let text: String = chars[start..pos].iter().collect();
                let value: f64 = text.parse().expect("decimal digit run must parse as f64");
                tokens.push(Token::Number(NumberValue::Decimal(value), NumberMode::Decimal));
            } else {
                let text: String = chars[start..pos].iter().collect();
                let value: i64 = text.parse().expect("digit run must parse as i64");
                tokens.push(Token::Number(NumberValue::Integer(value), NumberMode::Integer));
            }
            continue;
        }

        if is_symbol(c) {
            tokens.push(Token::Symbol(c));
            pos += 1;
            continue;
        }

        return Err(TokenizeError::new(
            pos,
            format!("unrecognized character {:?}", c),
        ));
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_whitespace_labels_and_symbols() {
        let tokens = tokenize("foo (bar)", TokenizerOptions::default()).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Label("foo".to_string()),
                Token::Symbol('('),
                Token::Label("bar".to_string()),
                Token::Symbol(')'),
            ]
        );
    }

    #[test]
    fn whitespace_is_dropped_by_default() {
        let tokens = tokenize("a  b", TokenizerOptions::default()).unwrap();
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn whitespace_included_when_requested() {
        let options = TokenizerOptions {
            include_whitespace: true,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize("a  b", options).unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(matches!(&tokens[1], Token::Whitespace(s) if s == "  "));
    }

    #[test]
    fn labels_without_digits_split_on_a_digit() {
        let options = TokenizerOptions {
            labels_have_digits: false,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize("abc123", options).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Label("abc".to_string()),
                Token::Number(NumberValue::Integer(123), NumberMode::Integer),
            ]
        );
    }

    #[test]
    fn labels_with_digits_consume_the_whole_run() {
        let tokens = tokenize("abc123", TokenizerOptions::default()).unwrap();
        assert_eq!(tokens, vec![Token::Label("abc123".to_string())]);
    }

    #[test]
    fn decimal_numbers_captured_when_enabled() {
        let tokens = tokenize("3.14", TokenizerOptions::default()).unwrap();
        assert_eq!(
            tokens,
            vec![Token::Number(NumberValue::Decimal(3.14), NumberMode::Decimal)]
        );
    }

    #[test]
    fn decimal_numbers_split_when_disabled() {
        let options = TokenizerOptions {
            capture_decimal_numbers: false,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize("3.14", options).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(NumberValue::Integer(3), NumberMode::Integer),
                Token::Symbol('.'),
                Token::Number(NumberValue::Integer(14), NumberMode::Integer),
            ]
        );
    }

    #[test]
    fn strings_preserve_mode_and_resolve_escapes() {
        let tokens = tokenize(r#""a\"b""#, TokenizerOptions::default()).unwrap();
        assert_eq!(
            tokens,
            vec![Token::String("a\"b".to_string(), StringMode::Strong)]
        );
    }

    #[test]
    fn weak_strings_use_single_quotes() {
        let tokens = tokenize("'hi'", TokenizerOptions::default()).unwrap();
        assert_eq!(tokens, vec![Token::String("hi".to_string(), StringMode::Weak)]);
    }

    #[test]
    fn escapes_kept_raw_when_disabled() {
        let options = TokenizerOptions {
            resolve_escaped_string_characters: false,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize(r#""a\"b""#, options).unwrap();
        assert_eq!(
            tokens,
            vec![Token::String("a\\\"b".to_string(), StringMode::Strong)]
        );
    }

    #[test]
    fn unterminated_string_is_a_tokenization_error() {
        let err = tokenize("\"abc", TokenizerOptions::default()).unwrap_err();
        assert_eq!(err.position, 0);
    }

    #[test]
    fn unrecognized_character_is_a_tokenization_error() {
        let err = tokenize("a`b", TokenizerOptions::default()).unwrap_err();
        assert_eq!(err.position, 1);
    }
}
