//! A node that matches its children in order, backtracking across all of
//! them when a later child runs out of candidates (§4.4).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::result::MatchResult;
use crate::token::Token;
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Matches each of its children in turn, passing the end position of one as
/// the start position of the next. When a child has no candidate at all,
/// backtracks into the previous children (calling their `try_again`) before
/// giving up.
///
/// Nested `Sequence` children are flattened into this one at construction
/// time (§4.10), so `Sequence::new(vec![Sequence::new(vec![a, b]), c])` and
/// `Sequence::new(vec![a, b, c])` produce identical result trees.
pub struct Sequence<Value, Flags = ()> {
    children: Vec<Rc<dyn Parser<Value, Flags>>>,
    debugger: OnceCell<Log<&'static str>>,
}

impl<Value: 'static, Flags: 'static> Sequence<Value, Flags> {
    pub fn new(children: Vec<Rc<dyn Parser<Value, Flags>>>) -> Rc<Self> {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child.as_any().downcast_ref::<Sequence<Value, Flags>>() {
                Some(nested) => flat.extend(nested.children.iter().cloned()),
                None => flat.push(child),
            }
        }
        Rc::new(Sequence {
            children: flat,
            debugger: OnceCell::new(),
        })
    }

    /// Attach a debug label, settable once.
    pub fn set_log(&self, log: Log<&'static str>) {
        self.debugger
            .set(log)
            .unwrap_or_else(|_| panic!("Sequence debug label already set"));
    }

    fn log(&self) -> Log<&'static str> {
        self.debugger.get().copied().unwrap_or(Log::None)
    }
}

impl<Value: 'static, Flags: 'static> Parser<Value, Flags> for Sequence<Value, Flags> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Flags>> {
        self.log().log_entry(pos);
        let children: Rc<Vec<Rc<dyn Parser<Value, Flags>>>> = Rc::new(self.children.clone());
        let mut instance = SequenceInstance {
            tokens,
            children,
            start: pos,
            stack: Vec::new(),
            end: None,
            log: self.log(),
        };
        instance.extend();
        match instance.end {
            Some(end) => self.log().log_success(end),
            None => self.log().log_error(pos),
        }
        Box::new(instance)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Flags> Display for Sequence<Value, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.children.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(" .. "))
    }
}

/// Drives the sequence: `stack` holds one matcher instance per already-
/// confirmed child, in order. This mirrors the spec's `(S, state)` state
/// machine with `state` implicit as `stack.len()` and the `state = -1`
/// failure sentinel as `end = None` with an empty stack.
struct SequenceInstance<Value, Flags> {
    tokens: Rc<[Token]>,
    children: Rc<Vec<Rc<dyn Parser<Value, Flags>>>>,
    start: usize,
    stack: Vec<Box<dyn MatcherInstance<Value, Flags>>>,
    end: Option<usize>,
    log: Log<&'static str>,
}

impl<Value, Flags> SequenceInstance<Value, Flags> {
    fn current_pos(&self) -> usize {
        self.stack.last().map_or(self.start, |i| i.end().unwrap())
    }

    /// Push sub-instances onto the stack until it spans every child, or
    /// backtracking exhausts all possibilities.
    fn extend(&mut self) {
        loop {
            if self.stack.len() == self.children.len() {
                self.end = Some(self.current_pos());
                return;
            }
            let idx = self.stack.len();
            let pos = self.current_pos();
            let instance = self.children[idx].create_instance(self.tokens.clone(), pos);
            if instance.end().is_some() {
                self.stack.push(instance);
            } else if !self.retreat() {
                self.end = None;
                return;
            }
        }
    }

    /// Pop instances, calling `try_again` on each, until one produces a new
    /// candidate. Returns `false` once the stack empties without success.
    fn retreat(&mut self) -> bool {
        while let Some(mut top) = self.stack.pop() {
            top.try_again();
            if top.end().is_some() {
                self.stack.push(top);
                return true;
            }
        }
        false
    }
}

impl<Value, Flags> MatcherInstance<Value, Flags> for SequenceInstance<Value, Flags> {
    fn end(&self) -> Option<usize> {
        self.end
    }

    fn try_again(&mut self) {
        if self.retreat() {
            self.extend();
        } else {
            self.end = None;
        }
        match self.end {
            Some(end) => self.log.log_success(end),
            None => self.log.log_error(self.start),
        }
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<Value> {
        assert!(self.end.is_some(), "Sequence::get_result called with no candidate");
        let result =
            MatchResult::Compound(self.stack.iter().map(|i| i.get_result(flags)).collect());
        self.log.log_result(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Quantified, TokenMatch};
    use crate::predicate;
    use crate::quantifier::Quantifier;

    fn sym(c: char) -> Rc<TokenMatch> {
        TokenMatch::new(predicate::symbol(c))
    }

    #[test]
    fn matches_in_order() {
        let seq: Rc<Sequence<Token>> = Sequence::new(vec![sym('('), sym(')')]);
        let tokens = [Token::Symbol('('), Token::Symbol(')')];
        let result = parse(&*seq, &tokens, &()).unwrap();
        assert_eq!(result.as_compound().len(), 2);
    }

    #[test]
    fn empty_sequence_matches_empty_input() {
        let seq: Rc<Sequence<Token>> = Sequence::new(vec![]);
        let result = parse(&*seq, &[], &());
        assert!(matches!(result, Some(MatchResult::Compound(items)) if items.is_empty()));
    }

    #[test]
    fn flattens_nested_sequences() {
        let inner: Rc<Sequence<Token>> = Sequence::new(vec![sym('a'), sym('b')]);
        let flat_direct: Rc<Sequence<Token>> = Sequence::new(vec![sym('a'), sym('b'), sym('c')]);
        let nested: Rc<Sequence<Token>> = Sequence::new(vec![inner, sym('c')]);
        assert_eq!(nested.children.len(), flat_direct.children.len());
    }

    #[test]
    fn backtracks_into_earlier_child() {
        // a* followed by 'a' forces the greedy run to give back one token.
        let run: Rc<Quantified<Token>> = Quantified::new(sym('a'), Quantifier::greedy(0, 3));
        let seq: Rc<Sequence<Token>> = Sequence::new(vec![run, sym('a')]);
        let tokens = [Token::Symbol('a'), Token::Symbol('a')];
        let result = parse(&*seq, &tokens, &());
        assert!(result.is_some());
    }
}
