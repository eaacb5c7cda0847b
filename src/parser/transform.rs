//! Wrappers that derive a value, or a differently-flagged view, from a
//! completed match without changing which candidates the wrapped parser
//! explores (§4.8).

use super::Parser;
use crate::matcher::MatcherInstance;
use crate::result::MatchResult;
use crate::token::Token;
use std::any::Any;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Wraps `inner`, a parser expecting flags of type `Fi`, so that it can be
/// driven with flags of type `Fo` instead. Matching and backtracking are
/// untouched — only `get_result` changes, mapping the outer flags down to
/// `Fi` with `f` before asking `inner` for its result:
/// `get_result(flags_out) = inner.get_result(&f(flags_out))`.
pub struct FlagTransform<Value, Fi, Fo> {
    inner: Rc<dyn Parser<Value, Fi>>,
    map: Rc<dyn Fn(&Fo) -> Fi>,
}

impl<Value: 'static, Fi: 'static, Fo: 'static> FlagTransform<Value, Fi, Fo> {
    pub fn new(inner: Rc<dyn Parser<Value, Fi>>, map: impl Fn(&Fo) -> Fi + 'static) -> Rc<Self> {
        Rc::new(FlagTransform {
            inner,
            map: Rc::new(map),
        })
    }
}

impl<Value: 'static, Fi: 'static, Fo: 'static> Parser<Value, Fo> for FlagTransform<Value, Fi, Fo> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<Value, Fo>> {
        Box::new(FlagTransformInstance {
            inner: self.inner.create_instance(tokens, pos),
            map: self.map.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Value, Fi, Fo> Display for FlagTransform<Value, Fi, Fo> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

struct FlagTransformInstance<Value, Fi, Fo> {
    inner: Box<dyn MatcherInstance<Value, Fi>>,
    map: Rc<dyn Fn(&Fo) -> Fi>,
}

impl<Value, Fi, Fo> MatcherInstance<Value, Fo> for FlagTransformInstance<Value, Fi, Fo> {
    fn end(&self) -> Option<usize> {
        self.inner.end()
    }

    fn try_again(&mut self) {
        self.inner.try_again()
    }

    fn get_result(&self, flags: &Fo) -> MatchResult<Value> {
        self.inner.get_result(&(self.map)(flags))
    }
}

/// Rewrites `inner`'s result tree with `h`, which also sees the flags in
/// effect: `get_result(flags) = h(inner.get_result(flags), flags)`. Unlike
/// [Fixed](super::Fixed), the candidates explored and the shape handed to
/// `h` both come straight from `inner`'s own result.
pub struct ResultTransform<Ti, To, Flags = ()> {
    inner: Rc<dyn Parser<Ti, Flags>>,
    handler: Rc<dyn Fn(MatchResult<Ti>, &Flags) -> MatchResult<To>>,
}

impl<Ti: 'static, To: 'static, Flags: 'static> ResultTransform<Ti, To, Flags> {
    pub fn new(
        inner: Rc<dyn Parser<Ti, Flags>>,
        handler: impl Fn(MatchResult<Ti>, &Flags) -> MatchResult<To> + 'static,
    ) -> Rc<Self> {
        Rc::new(ResultTransform {
            inner,
            handler: Rc::new(handler),
        })
    }

    /// Convenience for the common case: collapse `inner`'s result tree to a
    /// single derived value, ignoring flags.
    pub fn value(
        inner: Rc<dyn Parser<Ti, Flags>>,
        compute: impl Fn(MatchResult<Ti>) -> To + 'static,
    ) -> Rc<Self> {
        Self::new(inner, move |result, _flags| {
            MatchResult::Value(compute(result))
        })
    }
}

impl<Ti: 'static, To: 'static, Flags: 'static> Parser<To, Flags> for ResultTransform<Ti, To, Flags> {
    fn create_instance(
        &self,
        tokens: Rc<[Token]>,
        pos: usize,
    ) -> Box<dyn MatcherInstance<To, Flags>> {
        Box::new(ResultTransformInstance {
            inner: self.inner.create_instance(tokens, pos),
            handler: self.handler.clone(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<Ti, To, Flags> Display for ResultTransform<Ti, To, Flags> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

struct ResultTransformInstance<Ti, To, Flags> {
    inner: Box<dyn MatcherInstance<Ti, Flags>>,
    handler: Rc<dyn Fn(MatchResult<Ti>, &Flags) -> MatchResult<To>>,
}

impl<Ti, To, Flags> MatcherInstance<To, Flags> for ResultTransformInstance<Ti, To, Flags> {
    fn end(&self) -> Option<usize> {
        self.inner.end()
    }

    fn try_again(&mut self) {
        self.inner.try_again()
    }

    fn get_result(&self, flags: &Flags) -> MatchResult<To> {
        (self.handler)(self.inner.get_result(flags), flags)
    }
}

/// Composes a [FlagTransform] and a [ResultTransform] over the same inner
/// parser, matching `TransformParser`'s combined flags-then-result semantics
/// (§4.8): the outer flags are mapped down to the inner parser's flags type
/// for matching purposes, then `result_fn` rewrites the result tree, seeing
/// the *outer* flags untouched.
pub fn transform<Ti: 'static, To: 'static, Fi: 'static, Fo: 'static>(
    inner: Rc<dyn Parser<Ti, Fi>>,
    flag_map: impl Fn(&Fo) -> Fi + 'static,
    result_fn: impl Fn(MatchResult<Ti>, &Fo) -> MatchResult<To> + 'static,
) -> Rc<ResultTransform<Ti, To, Fo>> {
    let flagged = FlagTransform::new(inner, flag_map);
    ResultTransform::new(flagged, result_fn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, TokenMatch};
    use crate::predicate;

    #[test]
    fn result_transform_collapses_to_a_value() {
        let digit: Rc<TokenMatch> = TokenMatch::new(predicate::number_any());
        let as_len: Rc<ResultTransform<Token, usize>> = ResultTransform::value(digit, |_| 1usize);
        let tokens = [Token::number(crate::token::NumberValue::Integer(4))];
        let result = parse(&*as_len, &tokens, &()).unwrap();
        assert_eq!(*result.as_value(), 1);
    }

    #[test]
    fn result_transform_sees_flags() {
        let digit: Rc<TokenMatch<bool>> = TokenMatch::new(predicate::number_any());
        let doubled: Rc<ResultTransform<Token, i64, bool>> =
            ResultTransform::new(digit, |result, flags| {
                let n = result.as_token().as_f64().unwrap() as i64;
                MatchResult::Value(if *flags { n * 2 } else { n })
            });
        let tokens = [Token::number(crate::token::NumberValue::Integer(4))];
        let result = parse(&*doubled, &tokens, &true).unwrap();
        assert_eq!(*result.as_value(), 8);
    }

    #[test]
    fn flag_transform_maps_flags_down_to_inner() {
        let digit: Rc<TokenMatch<bool>> = TokenMatch::new(predicate::number_any());
        let flagged: Rc<FlagTransform<Token, bool, i32>> =
            FlagTransform::new(digit, |outer: &i32| *outer > 0);
        let tokens = [Token::number(crate::token::NumberValue::Integer(4))];
        let result = parse(&*flagged, &tokens, &1);
        assert!(result.is_some());
    }
}
