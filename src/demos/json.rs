//! A JSON-like grammar assembled entirely from public combinators: string,
//! number, `true`/`false`/`null`, array, and object, with arbitrary
//! nesting tied together through [Lazy]. Used as an integration-test
//! fixture, not shipped as a JSON parser in its own right.

use crate::parser::{Branch, Fixed, Lazy, Parser, Quantified, ResultTransform, Sequence, TokenMatch};
use crate::predicate;
use crate::quantifier::Quantifier;
use crate::result::MatchResult;
use crate::token::Token;
use once_cell::unsync::OnceCell;
use std::rc::Rc;

/// The value this grammar produces in a [MatchResult::Value].
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    Object(Vec<(String, JsonValue)>),
}

fn punct(c: char) -> Rc<dyn Parser<JsonValue>> {
    Fixed::value(TokenMatch::new(predicate::symbol(c)), JsonValue::Null)
}

fn keyword(text: &'static str, value: JsonValue) -> Rc<dyn Parser<JsonValue>> {
    Fixed::value(TokenMatch::new(predicate::label(text)), value)
}

fn json_string() -> Rc<dyn Parser<JsonValue>> {
    ResultTransform::value(TokenMatch::new(predicate::string_any()), |result| {
        match result.into_token() {
            Token::String(text, _) => JsonValue::String(text),
            _ => unreachable!("string_any predicate guarantees a Token::String"),
        }
    })
}

fn json_number() -> Rc<dyn Parser<JsonValue>> {
    ResultTransform::value(TokenMatch::new(predicate::number_any()), |result| {
        let token = result.into_token();
        JsonValue::Number(token.as_f64().expect("number_any predicate guarantees a numeric token"))
    })
}

/// `, item` with the comma discarded, keeping only `item`'s value.
fn after_comma(item: Rc<dyn Parser<JsonValue>>) -> Rc<dyn Parser<JsonValue>> {
    let seq = Sequence::new(vec![punct(','), item]);
    ResultTransform::value(seq, |result| match result {
        MatchResult::Compound(mut items) => items.pop().unwrap().into_value(),
        _ => unreachable!("Sequence always yields Compound"),
    })
}

/// `item (, item)*`, collapsed to a plain `Vec<JsonValue>`. Matches zero
/// items as an empty vec when `opt_list` itself never gets built (callers
/// wrap the whole thing in a `{0,1}` quantifier).
fn comma_list(item: Rc<dyn Parser<JsonValue>>, rest_item: Rc<dyn Parser<JsonValue>>) -> Rc<dyn Parser<JsonValue>> {
    let rest = Quantified::new(after_comma(rest_item), Quantifier::greedy(0, usize::MAX));
    let seq = Sequence::new(vec![item, rest]);
    ResultTransform::new(seq, |result, _flags: &()| match result {
        MatchResult::Compound(items) => {
            let mut values = Vec::with_capacity(items.len());
            let mut iter = items.into_iter();
            values.push(iter.next().unwrap().into_value());
            let rest_compound = iter.next().unwrap();
            match rest_compound {
                MatchResult::Compound(rest_items) => {
                    values.extend(rest_items.into_iter().map(MatchResult::into_value));
                }
                _ => unreachable!("Quantified always yields Compound"),
            }
            MatchResult::Value(JsonValue::Array(values))
        }
        _ => unreachable!("Sequence always yields Compound"),
    })
}

fn array(value: Rc<dyn Parser<JsonValue>>) -> Rc<dyn Parser<JsonValue>> {
    let items = comma_list(value.clone(), value);
    let maybe_items = Quantified::new(items, Quantifier::maybe());
    let seq = Sequence::new(vec![punct('['), maybe_items, punct(']')]);
    ResultTransform::value(seq, |result| match result {
        MatchResult::Compound(mut items) => {
            let middle = items.remove(1);
            match middle {
                MatchResult::Compound(reps) => match reps.into_iter().next() {
                    Some(MatchResult::Value(JsonValue::Array(values))) => JsonValue::Array(values),
                    None => JsonValue::Array(Vec::new()),
                    Some(_) => unreachable!("comma_list always produces a JsonValue::Array"),
                },
                _ => unreachable!("Quantified always yields Compound"),
            }
        }
        _ => unreachable!("Sequence always yields Compound"),
    })
}

/// `"key" : value`, represented as a single-entry object so it shares the
/// same `JsonValue` type as every other grammar node; `object` merges the
/// entries of however many pairs were matched.
fn pair(value: Rc<dyn Parser<JsonValue>>) -> Rc<dyn Parser<JsonValue>> {
    let seq = Sequence::new(vec![json_string(), punct(':'), value]);
    ResultTransform::value(seq, |result| match result {
        MatchResult::Compound(items) => {
            let mut iter = items.into_iter();
            let key = match iter.next().unwrap().into_value() {
                JsonValue::String(s) => s,
                _ => unreachable!("json_string always produces JsonValue::String"),
            };
            iter.next(); // colon placeholder
            let value = iter.next().unwrap().into_value();
            JsonValue::Object(vec![(key, value)])
        }
        _ => unreachable!("Sequence always yields Compound"),
    })
}

fn object(value: Rc<dyn Parser<JsonValue>>) -> Rc<dyn Parser<JsonValue>> {
    let items = comma_list(pair(value.clone()), pair(value));
    let maybe_items = Quantified::new(items, Quantifier::maybe());
    let seq = Sequence::new(vec![punct('{'), maybe_items, punct('}')]);
    ResultTransform::value(seq, |result| match result {
        MatchResult::Compound(mut items) => {
            let middle = items.remove(1);
            let entries = match middle {
                MatchResult::Compound(reps) => match reps.into_iter().next() {
                    Some(MatchResult::Value(JsonValue::Array(pairs))) => pairs,
                    None => Vec::new(),
                    Some(_) => unreachable!("comma_list always produces a JsonValue::Array"),
                },
                _ => unreachable!("Quantified always yields Compound"),
            };
            let mut merged = Vec::new();
            for entry in entries {
                match entry {
                    JsonValue::Object(mut kvs) => merged.append(&mut kvs),
                    _ => unreachable!("pair always produces a single-entry JsonValue::Object"),
                }
            }
            JsonValue::Object(merged)
        }
        _ => unreachable!("Sequence always yields Compound"),
    })
}

/// Build the recursive `value` grammar: string, number, the three
/// keywords, array, and object, any of which may nest through the others.
pub fn value() -> Rc<dyn Parser<JsonValue>> {
    let cell: Rc<OnceCell<Rc<dyn Parser<JsonValue>>>> = Rc::new(OnceCell::new());
    let cell_for_lazy = cell.clone();
    let lazy: Rc<dyn Parser<JsonValue>> = Lazy::new(move || cell_for_lazy.get().unwrap().clone());

    let rule: Rc<dyn Parser<JsonValue>> = Branch::new(vec![
        json_string(),
        json_number(),
        keyword("true", JsonValue::Bool(true)),
        keyword("false", JsonValue::Bool(false)),
        keyword("null", JsonValue::Null),
        array(lazy.clone()),
        object(lazy),
    ]);
    cell.set(rule.clone())
        .unwrap_or_else(|_| panic!("json::value grammar built twice"));
    rule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::tokenizer::{tokenize, TokenizerOptions};

    fn parse_json(source: &str) -> Option<JsonValue> {
        let tokens = tokenize(source, TokenizerOptions::default()).unwrap();
        let grammar = value();
        parse(&*grammar, &tokens, &()).map(MatchResult::into_value)
    }

    #[test]
    fn parses_scalars() {
        assert_eq!(parse_json("null"), Some(JsonValue::Null));
        assert_eq!(parse_json("true"), Some(JsonValue::Bool(true)));
        assert_eq!(parse_json("42"), Some(JsonValue::Number(42.0)));
        assert_eq!(
            parse_json("\"hi\""),
            Some(JsonValue::String("hi".to_string()))
        );
    }

    #[test]
    fn parses_nested_structure() {
        let result = parse_json(r#"{"k": 1, "m": [true, null]}"#).unwrap();
        assert_eq!(
            result,
            JsonValue::Object(vec![
                ("k".to_string(), JsonValue::Number(1.0)),
                (
                    "m".to_string(),
                    JsonValue::Array(vec![JsonValue::Bool(true), JsonValue::Null])
                ),
            ])
        );
    }

    #[test]
    fn trailing_garbage_rejected_by_full_input_anchor() {
        assert!(parse_json(r#"{"k": 1, "m": [true, null]}}"#).is_none());
    }

    #[test]
    fn parses_empty_array_and_object() {
        assert_eq!(parse_json("[]"), Some(JsonValue::Array(Vec::new())));
        assert_eq!(parse_json("{}"), Some(JsonValue::Object(Vec::new())));
    }
}
