//! A node that tries each of its children as an alternative, in order
//! (§4.5).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::result::MatchResult;
use crate::token::Token;
use crate::util::Log;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Tries each child in order at the same start position, taking the first
/// whose instance has a candidate. When that child's candidate is
/// exhausted by `try_again`, moves on to the next child rather than
/// failing outright.
///
/// Nested `Branch` children are flattened into this one at construction
/// time (§4.10), so `Branch::new(vec![Branch::new(vec![a, b]), c])` and
/// `Branch::new(vec![a, b, c])` try alternatives in the same order.
pub struct Branch<Value, Flags = ()> {
    children: Vec<Rc<dyn Parser<Value, Flags>>>,
    debugger: OnceCell<Log<&'static str>>,
}

impl<Value: 'static, Flags: 'static> Branch<Value, Flags> {
    pub fn new(children: Vec<Rc<dyn Parser<Value, Flags>>>) -> Rc<Self> {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match child.as_any().downcast_ref::<Branch<Value, Flags>>() {
                Some(nested) => flat.extend(nested.children.iter().cloned()),
                None => flat.push(child),
            }
        }
        Rc::new(Branch {
            children: flat,
            debugger: OnceCell::new(),
        })
    }

    pub fn set_log(&self, log: Log<&'static str>) {
        self.debugger
            .set(log)
            .unwrap_or_else(|_| panic!("Branch debug label already set"));
    }

    fn log(&self) -> Log<&'static str> {
        self.debugger.get().copied().unwrap_or(Log::None)
    }
}

impl<Value: 'static, Flags: 'static> Parser<Value, Flags> for Branch<Value, Flags> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Flags>> {
        self.log().log_entry(pos);
        let children: Rc<Vec<Rc<dyn Parser<Value, Flags>>>> = Rc::new(self.children.clone());
        let mut instance = BranchInstance {
            tokens,
            children,
            pos,
            current: None,
            next_child: 0,
            log: self.log(),
        };
        instance.advance_to_next_match();
        match instance.end() {
            Some(end) => self.log().log_success(end),
            None => self.log().log_error(pos),
        }
        Box::new(instance)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Flags> Display for Branch<Value, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.children.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(" | "))
    }
}

struct BranchInstance<Value, Flags> {
    tokens: Rc<[Token]>,
    children: Rc<Vec<Rc<dyn Parser<Value, Flags>>>>,
    pos: usize,
    current: Option<Box<dyn MatcherInstance<Value, Flags>>>,
    next_child: usize,
    log: Log<&'static str>,
}

impl<Value, Flags> BranchInstance<Value, Flags> {
    /// Try the current child's next candidate; if it has none, move to the
    /// next child and try its first candidate, and so on.
    fn advance_to_next_match(&mut self) {
        loop {
            if let Some(instance) = &self.current {
                if instance.end().is_some() {
                    return;
                }
                self.current = None;
            }
            if self.next_child >= self.children.len() {
                return;
            }
            let child = self.children[self.next_child].clone();
            self.next_child += 1;
            let instance = child.create_instance(self.tokens.clone(), self.pos);
            self.current = Some(instance);
        }
    }
}

impl<Value, Flags> MatcherInstance<Value, Flags> for BranchInstance<Value, Flags> {
    fn end(&self) -> Option<usize> {
        self.current.as_ref().and_then(|i| i.end())
    }

    fn try_again(&mut self) {
        if let Some(instance) = &mut self.current {
            instance.try_again();
        }
        self.advance_to_next_match();
        match self.end() {
            Some(end) => self.log.log_success(end),
            None => self.log.log_error(self.pos),
        }
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<Value> {
        let instance = self
            .current
            .as_ref()
            .expect("Branch::get_result called with no candidate");
        let result = instance.get_result(flags);
        self.log.log_result(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, TokenMatch};
    use crate::predicate;

    fn sym(c: char) -> Rc<TokenMatch> {
        TokenMatch::new(predicate::symbol(c))
    }

    #[test]
    fn picks_first_matching_alternative() {
        let branch: Rc<Branch<Token>> = Branch::new(vec![sym('a'), sym('b')]);
        let tokens = [Token::Symbol('b')];
        let result = parse(&*branch, &tokens, &()).unwrap();
        assert!(matches!(result, MatchResult::Token(Token::Symbol('b'))));
    }

    #[test]
    fn no_alternative_matches() {
        let branch: Rc<Branch<Token>> = Branch::new(vec![sym('a'), sym('b')]);
        let tokens = [Token::Symbol('c')];
        assert!(parse(&*branch, &tokens, &()).is_none());
    }

    #[test]
    fn flattens_nested_branches() {
        let inner: Rc<Branch<Token>> = Branch::new(vec![sym('a'), sym('b')]);
        let nested: Rc<Branch<Token>> = Branch::new(vec![inner, sym('c')]);
        let flat_direct: Rc<Branch<Token>> = Branch::new(vec![sym('a'), sym('b'), sym('c')]);
        assert_eq!(nested.children.len(), flat_direct.children.len());
    }
}
