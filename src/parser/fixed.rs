//! A node that borrows another parser's matching and backtracking, but
//! discards its result in favor of a value computed from flags alone
//! (§4.9).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::result::MatchResult;
use crate::token::Token;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Wraps `inner`, deferring entirely to it for which candidates exist and
/// how backtracking proceeds, but replaces its result: `get_result(flags)`
/// ignores whatever `inner` produced and returns `handler(flags)` instead.
///
/// Useful when a real sub-grammar must be consumed (and its span skipped)
/// but its parsed shape is irrelevant to the caller — for example, matching
/// and discarding a comment production while a literal marker value takes
/// its place in the result tree.
pub struct Fixed<Value, Inner, Flags = ()> {
    inner: Rc<dyn Parser<Inner, Flags>>,
    handler: Rc<dyn Fn(&Flags) -> MatchResult<Value>>,
}

impl<Value: 'static, Inner: 'static, Flags: 'static> Fixed<Value, Inner, Flags> {
    pub fn new(
        inner: Rc<dyn Parser<Inner, Flags>>,
        handler: impl Fn(&Flags) -> MatchResult<Value> + 'static,
    ) -> Rc<Self> {
        Rc::new(Fixed {
            inner,
            handler: Rc::new(handler),
        })
    }

    /// A `Fixed` node producing the same cloned value every time, regardless
    /// of flags.
    pub fn value(inner: Rc<dyn Parser<Inner, Flags>>, value: Value) -> Rc<Self>
    where
        Value: Clone,
    {
        Self::new(inner, move |_flags| MatchResult::Value(value.clone()))
    }
}

impl<Value: 'static, Inner: 'static, Flags: 'static> Parser<Value, Flags>
    for Fixed<Value, Inner, Flags>
{
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Flags>> {
        Box::new(FixedInstance {
            inner: self.inner.create_instance(tokens, pos),
            handler: self.handler.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Inner, Flags> Display for Fixed<Value, Inner, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

struct FixedInstance<Value, Inner, Flags> {
    inner: Box<dyn MatcherInstance<Inner, Flags>>,
    handler: Rc<dyn Fn(&Flags) -> MatchResult<Value>>,
}

impl<Value, Inner, Flags> MatcherInstance<Value, Flags> for FixedInstance<Value, Inner, Flags> {
    fn end(&self) -> Option<usize> {
        self.inner.end()
    }

    fn try_again(&mut self) {
        self.inner.try_again()
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<Value> {
        assert!(
            self.inner.end().is_some(),
            "Fixed::get_result called with no candidate"
        );
        (self.handler)(flags)
    }
}
