//! Token predicates: the leaf-level acceptance test used by
//! [TokenMatch](crate::parser::TokenMatch).

use crate::token::{NumberMode, StringMode, Token, TokenKind};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// A reusable, named test against a single [Token].
///
/// Built only through the factory functions in this module so that every
/// predicate carries a human-readable label for grammar printing and
/// debug tracing.
#[derive(Clone)]
pub struct TokenPredicate {
    label: &'static str,
    test: Rc<dyn Fn(&Token) -> bool>,
}

impl TokenPredicate {
    fn new(label: &'static str, test: impl Fn(&Token) -> bool + 'static) -> Self {
        TokenPredicate {
            label,
            test: Rc::new(test),
        }
    }

    /// Evaluate the predicate against a token.
    pub fn matches(&self, token: &Token) -> bool {
        (self.test)(token)
    }
}

impl Display for TokenPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Matches any token at all.
pub fn any() -> TokenPredicate {
    TokenPredicate::new("<any>", |_| true)
}

/// Matches a token structurally equal to `expected`.
pub fn exact(expected: Token) -> TokenPredicate {
    TokenPredicate::new("<exact>", move |t| t == &expected)
}

/// Matches a [Token::Label] with exactly this text.
pub fn label(text: impl Into<String>) -> TokenPredicate {
    let text = text.into();
    TokenPredicate::new("<label>", move |t| matches!(t, Token::Label(s) if s == &text))
}

/// Matches any [Token::Label], regardless of text.
pub fn label_any() -> TokenPredicate {
    TokenPredicate::new("<label:any>", |t| matches!(t, Token::Label(_)))
}

/// Matches any [Token::String], regardless of text or quote mode.
pub fn string_any() -> TokenPredicate {
    TokenPredicate::new("<string:any>", |t| matches!(t, Token::String(_, _)))
}

/// Matches a [Token::String] with the given quote mode, any text.
pub fn string_mode(mode: StringMode) -> TokenPredicate {
    TokenPredicate::new("<string:mode>", move |t| {
        matches!(t, Token::String(_, m) if *m == mode)
    })
}

/// Matches any [Token::Number], regardless of value or mode.
pub fn number_any() -> TokenPredicate {
    TokenPredicate::new("<number:any>", |t| matches!(t, Token::Number(_, _)))
}

/// Matches a [Token::Number] whose value falls in `[low, high]` inclusive.
pub fn number_range(low: f64, high: f64) -> TokenPredicate {
    TokenPredicate::new("<number:range>", move |t| {
        t.as_f64().map_or(false, |v| v >= low && v <= high)
    })
}

/// Matches a [Token::Number] of the given mode, any value.
pub fn number_mode(mode: NumberMode) -> TokenPredicate {
    TokenPredicate::new("<number:mode>", move |t| {
        matches!(t, Token::Number(_, m) if *m == mode)
    })
}

/// Matches a [Token::Symbol] with exactly this character.
pub fn symbol(c: char) -> TokenPredicate {
    TokenPredicate::new("<symbol>", move |t| matches!(t, Token::Symbol(s) if *s == c))
}

/// Matches any [Token::Whitespace].
pub fn whitespace() -> TokenPredicate {
    TokenPredicate::new("<whitespace>", |t| matches!(t, Token::Whitespace(_)))
}

/// Matches any token of the given [TokenKind].
pub fn kind(k: TokenKind) -> TokenPredicate {
    TokenPredicate::new("<kind>", move |t| t.kind() == k)
}
