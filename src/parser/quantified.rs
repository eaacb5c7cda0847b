//! Repeats a child parser a bounded number of times, per the chosen
//! [QuantifierMode] (§4.6).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::quantifier::{Quantifier, QuantifierMode};
use crate::result::MatchResult;
use crate::token::Token;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Matches its inner parser between `quantifier.min` and `quantifier.max`
/// times. The repetition strategy (maximize-then-shrink, minimize-then-grow,
/// or take-max-and-never-give-it-back) is fixed by the quantifier's
/// [QuantifierMode].
pub struct Quantified<Value, Flags = ()> {
    inner: Rc<dyn Parser<Value, Flags>>,
    quantifier: Quantifier,
}

impl<Value: 'static, Flags: 'static> Quantified<Value, Flags> {
    pub fn new(inner: Rc<dyn Parser<Value, Flags>>, quantifier: Quantifier) -> Rc<Self> {
        Rc::new(Quantified { inner, quantifier })
    }
}

impl<Value: 'static, Flags: 'static> Parser<Value, Flags> for Quantified<Value, Flags> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Flags>> {
        match self.quantifier.mode {
            QuantifierMode::Greedy | QuantifierMode::Possessive => {
                let possessive = self.quantifier.mode == QuantifierMode::Possessive;
                Box::new(GreedyInstance::new(
                    self.inner.clone(),
                    tokens,
                    pos,
                    self.quantifier.min,
                    self.quantifier.max,
                    possessive,
                ))
            }
            QuantifierMode::Reluctant => Box::new(ReluctantInstance::new(
                self.inner.clone(),
                tokens,
                pos,
                self.quantifier.min,
                self.quantifier.max,
            )),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Flags> Display for Quantified<Value, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.inner, self.quantifier)
    }
}

/// Drives Greedy and Possessive quantifiers: fills as many repetitions as
/// possible (bounded by `max`) using each repetition's first candidate. On
/// `try_again`, first asks the last repetition for its own next alternative
/// (it may itself be a composite with several candidates) and re-fills
/// forward from there; only once that repetition has none left does it get
/// popped and the one before it asked in turn, down to `min`. A possessive
/// instance gives up its single candidate immediately on `try_again`,
/// matching the "no backtracking given back to the caller" contract. Once
/// exhausted, the stack is cleared: a spent instance holds no sub-instances.
struct GreedyInstance<Value, Flags> {
    tokens: Rc<[Token]>,
    inner: Rc<dyn Parser<Value, Flags>>,
    start: usize,
    min: usize,
    max: usize,
    possessive: bool,
    stack: Vec<Box<dyn MatcherInstance<Value, Flags>>>,
    end: Option<usize>,
    exhausted: bool,
}

impl<Value, Flags> GreedyInstance<Value, Flags> {
    fn new(
        inner: Rc<dyn Parser<Value, Flags>>,
        tokens: Rc<[Token]>,
        start: usize,
        min: usize,
        max: usize,
        possessive: bool,
    ) -> Self {
        let mut instance = GreedyInstance {
            tokens,
            inner,
            start,
            min,
            max,
            possessive,
            stack: Vec::new(),
            end: None,
            exhausted: false,
        };
        instance.fill();
        instance
    }

    fn current_pos(&self) -> usize {
        self.stack.last().map_or(self.start, |i| i.end().unwrap())
    }

    /// Push one more repetition if under `max` and doing so makes progress,
    /// or (below `min` only) consumes zero tokens — accepting a zero-width
    /// repetition once per rep slot keeps the fill bounded by `min` instead
    /// of looping forever on a zero-width inner match.
    fn push_one(&mut self) -> bool {
        if self.stack.len() >= self.max {
            return false;
        }
        let pos = self.current_pos();
        let instance = self.inner.create_instance(self.tokens.clone(), pos);
        match instance.end() {
            Some(end) if end > pos => {
                self.stack.push(instance);
                true
            }
            Some(end) if end == pos && self.stack.len() < self.min => {
                self.stack.push(instance);
                true
            }
            _ => false,
        }
    }

    fn fill(&mut self) {
        while self.push_one() {}
        self.end = if self.stack.len() >= self.min {
            Some(self.current_pos())
        } else {
            None
        };
    }

    fn exhaust(&mut self) {
        self.exhausted = true;
        self.stack.clear();
        self.end = None;
    }
}

impl<Value, Flags> MatcherInstance<Value, Flags> for GreedyInstance<Value, Flags> {
    fn end(&self) -> Option<usize> {
        self.end
    }

    /// Ask the last repetition for its own next alternative before ever
    /// shrinking the stack: a repetition instance may itself have further
    /// candidates (it can be a `Branch`, another `Quantified`, anything
    /// composite), and those must be exhausted first. Only once the last
    /// repetition reports no more candidates does it get popped and the
    /// repetition before it asked the same question, down to `min`.
    fn try_again(&mut self) {
        if self.exhausted {
            return;
        }
        if self.possessive {
            self.exhaust();
            return;
        }
        loop {
            let top_has_next = match self.stack.last_mut() {
                Some(top) => {
                    top.try_again();
                    top.end().is_some()
                }
                None => {
                    self.exhaust();
                    return;
                }
            };
            if top_has_next {
                // The last repetition may now end earlier than before,
                // leaving room to re-fill forward up to `max` again.
                self.fill();
                return;
            }
            if self.stack.len() > self.min {
                self.stack.pop();
            } else {
                self.exhaust();
                return;
            }
        }
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<Value> {
        assert!(
            self.end.is_some(),
            "Quantified::get_result called with no candidate"
        );
        MatchResult::Compound(self.stack.iter().map(|i| i.get_result(flags)).collect())
    }
}

/// Drives Reluctant quantifiers: fills the minimum repetitions, then grows
/// one at a time (up to `max`) on `try_again`, preferring fewer reps. When it
/// can no longer grow (`max` reached, or the inner parser has no fresh
/// candidate at the current position), it falls back to asking the last
/// repetition for its own next alternative, exactly as Greedy does, before
/// shrinking below that repetition.
struct ReluctantInstance<Value, Flags> {
    tokens: Rc<[Token]>,
    inner: Rc<dyn Parser<Value, Flags>>,
    start: usize,
    min: usize,
    max: usize,
    stack: Vec<Box<dyn MatcherInstance<Value, Flags>>>,
    end: Option<usize>,
    exhausted: bool,
}

impl<Value, Flags> ReluctantInstance<Value, Flags> {
    fn new(
        inner: Rc<dyn Parser<Value, Flags>>,
        tokens: Rc<[Token]>,
        start: usize,
        min: usize,
        max: usize,
    ) -> Self {
        let mut instance = ReluctantInstance {
            tokens,
            inner,
            start,
            min,
            max,
            stack: Vec::new(),
            end: None,
            exhausted: false,
        };
        instance.fill_to_min(min);
        instance
    }

    fn current_pos(&self) -> usize {
        self.stack.last().map_or(self.start, |i| i.end().unwrap())
    }

    fn push_one(&mut self) -> bool {
        if self.stack.len() >= self.max {
            return false;
        }
        let pos = self.current_pos();
        let instance = self.inner.create_instance(self.tokens.clone(), pos);
        if instance.end().is_some() {
            self.stack.push(instance);
            true
        } else {
            false
        }
    }

    fn fill_to_min(&mut self, min: usize) {
        while self.stack.len() < min {
            if !self.push_one() {
                self.end = None;
                return;
            }
        }
        self.end = Some(self.current_pos());
    }

    fn exhaust(&mut self) {
        self.exhausted = true;
        self.stack.clear();
        self.end = None;
    }
}

impl<Value, Flags> MatcherInstance<Value, Flags> for ReluctantInstance<Value, Flags> {
    fn end(&self) -> Option<usize> {
        self.end
    }

    fn try_again(&mut self) {
        if self.exhausted {
            return;
        }
        loop {
            if self.push_one() {
                self.end = Some(self.current_pos());
                return;
            }
            let top_has_next = match self.stack.last_mut() {
                Some(top) => {
                    top.try_again();
                    top.end().is_some()
                }
                None => {
                    self.exhaust();
                    return;
                }
            };
            if top_has_next {
                self.end = Some(self.current_pos());
                return;
            }
            if self.stack.len() > self.min {
                self.stack.pop();
            } else {
                self.exhaust();
                return;
            }
        }
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<Value> {
        assert!(
            self.end.is_some(),
            "Quantified::get_result called with no candidate"
        );
        MatchResult::Compound(self.stack.iter().map(|i| i.get_result(flags)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Branch, Sequence, TokenMatch};
    use crate::predicate;

    fn sym(c: char) -> Rc<TokenMatch> {
        TokenMatch::new(predicate::symbol(c))
    }

    /// A repetition whose first alternative consumes two tokens and whose
    /// second consumes one, so a repetition already on the stack has a
    /// real second candidate to offer besides being popped outright.
    fn two_or_one_a() -> Rc<Branch<Token>> {
        let two: Rc<Sequence<Token>> = Sequence::new(vec![sym('a'), sym('a')]);
        Branch::new(vec![two, sym('a')])
    }

    #[test]
    fn greedy_matches_maximum_reps() {
        let q: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::greedy(0, 3));
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        let result = parse(&*q, &tokens, &()).unwrap();
        assert_eq!(result.as_compound().len(), 2);
    }

    #[test]
    fn greedy_respects_min() {
        let q: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::greedy(3, 5));
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        assert!(parse(&*q, &tokens, &()).is_none());
    }

    #[test]
    fn reluctant_matches_minimum_first() {
        // a{0,3}? followed by 'a' should take as few as possible, leaving
        // the trailing 'a' for the fixed match after it.
        let q: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::reluctant(0, 3));
        let seq: Rc<Sequence<Token>> = Sequence::new(vec![q, sym('a')]);
        let tokens = [Token::Symbol('a')];
        let result = parse(&*seq, &tokens, &()).unwrap();
        assert_eq!(result.as_compound()[0].as_compound().len(), 0);
    }

    #[test]
    fn possessive_never_backtracks() {
        // a++ followed by 'a' can never succeed: possessive takes every 'a'
        // and refuses to give any back.
        let q: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::possessive(1, 3));
        let seq: Rc<Sequence<Token>> = Sequence::new(vec![q, sym('a')]);
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        assert!(parse(&*seq, &tokens, &()).is_none());
    }

    #[test]
    fn zero_max_terminates() {
        let q: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::reluctant(0, 0));
        let result = parse(&*q, &[], &());
        assert!(matches!(result, Some(MatchResult::Compound(items)) if items.is_empty()));
    }

    #[test]
    fn greedy_backtracks_into_last_repetitions_own_alternative() {
        // The single repetition's first alternative ("aa") consumes both
        // tokens, leaving none for the trailing sym('a'). A full match only
        // exists if the repetition gives back its *own* second alternative
        // ("a") instead of being discarded outright once stack.len() == min.
        let q: Rc<Quantified<Token>> = Quantified::new(two_or_one_a(), Quantifier::greedy(1, 1));
        let grammar: Rc<Sequence<Token>> = Sequence::new(vec![q, sym('a')]);
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        let result = parse(&*grammar, &tokens, &());
        assert!(result.is_some());
    }

    #[test]
    fn reluctant_backtracks_into_last_repetitions_own_alternative() {
        // Same shape as the greedy case, with min == max == 1 so growing is
        // never an option: the only way to find the full match is to ask
        // the pinned repetition for its second alternative.
        let q: Rc<Quantified<Token>> =
            Quantified::new(two_or_one_a(), Quantifier::reluctant(1, 1));
        let grammar: Rc<Sequence<Token>> = Sequence::new(vec![q, sym('a')]);
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        let result = parse(&*grammar, &tokens, &());
        assert!(result.is_some());
    }
}
