//! Error types for the one failure class the public API surfaces directly:
//! tokenization failure (§7 class 1). "No match" (class 2) is a plain
//! `None`/`Option`, carrying no location, by design; class 3 (programmer
//! error) panics at the point of violation rather than producing a value of
//! this type — see the `MatchResult` accessors and `Quantifier` constructors.

use crate::util::Position;
use std::fmt::{Display, Formatter};

/// The tokenizer got stuck: no lexical rule matched at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizeError {
    pub position: usize,
    pub message: String,
}

impl TokenizeError {
    pub fn new(position: usize, message: String) -> Self {
        TokenizeError { position, message }
    }

    /// The human-readable line/column location of the failure, given the
    /// source buffer it was tokenizing.
    pub fn position_in(&self, source: &[u8]) -> Position {
        crate::util::Code::new(source).obtain_position(self.position)
    }
}

impl Display for TokenizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TokenizeError: {} (byte {})", self.message, self.position)
    }
}

impl std::error::Error for TokenizeError {}
