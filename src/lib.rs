//! A combinator-based backtracking pattern-matching engine over token
//! sequences.
//!
//! # Overview
//!
//! A grammar is built as a tree of small, composable matcher primitives:
//! [TokenMatch](parser::TokenMatch) matches a single token against a
//! [TokenPredicate](predicate::TokenPredicate), [Sequence](parser::Sequence)
//! and [Branch](parser::Branch) combine matchers in order and as
//! alternatives, [Quantified](parser::Quantified) repeats a matcher under a
//! greedy, reluctant, or possessive strategy, and [Lazy](parser::Lazy) ties
//! the knot for recursive grammars. [ResultTransform](parser::ResultTransform),
//! [FlagTransform](parser::FlagTransform), and [Fixed](parser::Fixed) let a
//! grammar project its own result type instead of the raw token tree.
//!
//! Parser nodes are immutable and `Rc`-shared; running one against a token
//! slice produces a [MatcherInstance](matcher::MatcherInstance), the mutable
//! cursor through that parser's space of possible matches. [parser::parse]
//! drives an instance to completion, backtracking through alternatives
//! until one consumes the entire input or every alternative is exhausted.
//!
//! # Example
//!
//! ```
//! use tok_match::parser::{parse, Quantified, Sequence, TokenMatch};
//! use tok_match::predicate;
//! use tok_match::quantifier::Quantifier;
//! use tok_match::tokenizer::{tokenize, TokenizerOptions};
//!
//! let tokens = tokenize("()()", TokenizerOptions::default()).unwrap();
//!
//! let open = TokenMatch::new(predicate::symbol('('));
//! let close = TokenMatch::new(predicate::symbol(')'));
//! let pair = Sequence::new(vec![open, close]);
//! let grammar = Quantified::new(pair, Quantifier::greedy(1, 10));
//!
//! assert!(parse(&*grammar, &tokens, &()).is_some());
//! ```
//!
//! See [demos::json] for a complete recursive grammar built from these
//! primitives.

pub mod demos;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod predicate;
pub mod quantifier;
pub mod result;
pub mod token;
pub mod tokenizer;
pub mod util;
