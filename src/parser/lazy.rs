//! Deferred resolution of a parser node, used to tie the knot in recursive
//! grammars (§4.7).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::token::Token;
use once_cell::unsync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

type Thunk<Value, Flags> = Box<dyn FnOnce() -> Rc<dyn Parser<Value, Flags>>>;

/// Wraps a closure that builds a parser node the first time it is needed,
/// caching the result. Used where a grammar rule refers to itself (directly
/// or through another rule): build the recursive rules first with plain
/// constructors, and close the cycle with a `Lazy` that defers to a cell
/// filled in afterward.
///
/// The thunk runs at most once; resolving it a second time is a programmer
/// error (§4.11), not a normal runtime outcome, since `OnceCell` already
/// makes that path unreachable in ordinary use.
pub struct Lazy<Value, Flags = ()> {
    resolved: OnceCell<Rc<dyn Parser<Value, Flags>>>,
    thunk: RefCell<Option<Thunk<Value, Flags>>>,
}

impl<Value: 'static, Flags: 'static> Lazy<Value, Flags> {
    pub fn new(build: impl FnOnce() -> Rc<dyn Parser<Value, Flags>> + 'static) -> Rc<Self> {
        Rc::new(Lazy {
            resolved: OnceCell::new(),
            thunk: RefCell::new(Some(Box::new(build))),
        })
    }

    fn resolve(&self) -> Rc<dyn Parser<Value, Flags>> {
        self.resolved
            .get_or_init(|| {
                let thunk = self
                    .thunk
                    .borrow_mut()
                    .take()
                    .expect("Lazy parser's thunk was already consumed");
                thunk()
            })
            .clone()
    }
}

impl<Value: 'static, Flags: 'static> Parser<Value, Flags> for Lazy<Value, Flags> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Flags>> {
        self.resolve().create_instance(tokens, pos)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Flags> Display for Lazy<Value, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.resolved.get() {
            Some(inner) => write!(f, "{}", inner),
            None => write!(f, "<lazy>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, Branch, Empty, Sequence, TokenMatch};
    use crate::predicate;
    use crate::result::MatchResult;

    #[test]
    fn resolves_a_recursive_grammar() {
        // balanced parens: ( paren )? where the inner reference is lazy.
        let cell: Rc<OnceCell<Rc<dyn Parser<Token>>>> = Rc::new(OnceCell::new());
        let cell_for_lazy = cell.clone();
        let lazy: Rc<Lazy<Token>> = Lazy::new(move || cell_for_lazy.get().unwrap().clone());

        let open: Rc<TokenMatch> = TokenMatch::new(predicate::symbol('('));
        let close: Rc<TokenMatch> = TokenMatch::new(predicate::symbol(')'));
        let wrapped: Rc<Sequence<Token>> = Sequence::new(vec![open, lazy, close]);
        let rule: Rc<dyn Parser<Token>> = Branch::new(vec![wrapped, Empty::new()]);
        cell.set(rule.clone()).unwrap_or_else(|_| panic!());

        let tokens = [
            Token::Symbol('('),
            Token::Symbol('('),
            Token::Symbol(')'),
            Token::Symbol(')'),
        ];
        let result = parse(&*rule, &tokens, &());
        assert!(result.is_some());
    }

    #[test]
    fn empty_alternative_terminates_recursion() {
        let cell: Rc<OnceCell<Rc<dyn Parser<Token>>>> = Rc::new(OnceCell::new());
        let cell_for_lazy = cell.clone();
        let lazy: Rc<Lazy<Token>> = Lazy::new(move || cell_for_lazy.get().unwrap().clone());
        let open: Rc<TokenMatch> = TokenMatch::new(predicate::symbol('('));
        let close: Rc<TokenMatch> = TokenMatch::new(predicate::symbol(')'));
        let wrapped: Rc<Sequence<Token>> = Sequence::new(vec![open, lazy, close]);
        let rule: Rc<dyn Parser<Token>> = Branch::new(vec![wrapped, Empty::new()]);
        cell.set(rule.clone()).unwrap_or_else(|_| panic!());

        let result = parse(&*rule, &[], &());
        assert!(matches!(result, Some(MatchResult::Compound(items)) if items.is_empty()));
    }
}
