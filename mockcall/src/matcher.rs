// vim: tw=80
//! Positional argument matchers built from [`Predicate`]s.

use core::fmt::{self, Display};
use std::marker::PhantomData;

use predicates::prelude::Predicate;
use predicates_tree::CaseTreeExt;

use crate::{
    types::Describe,
    value::Arg,
};

/// A [`Predicate`] on one argument, with the argument's type erased.
pub(crate) trait ArgMatcher: Display + Send {
    /// Explain why `arg` doesn't match, or return `None` if it does.
    fn find_mismatch(&self, arg: &dyn Arg) -> Option<String>;
}

pub(crate) struct Matcher<T, P> {
    pred: P,
    _t: PhantomData<fn(&T)>,
}

impl<T, P> Matcher<T, P>
    where T: Describe, P: Predicate<T> + Send + 'static
{
    pub(crate) fn new(pred: P) -> Self {
        Matcher{pred, _t: PhantomData}
    }
}

impl<T, P> Display for Matcher<T, P>
    where T: Describe, P: Predicate<T>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.pred, f)
    }
}

impl<T, P> ArgMatcher for Matcher<T, P>
    where T: Describe, P: Predicate<T> + Send
{
    fn find_mismatch(&self, arg: &dyn Arg) -> Option<String> {
        match arg.downcast_ref::<T>() {
            Ok(t) => self.pred.find_case(false, t)
                .map(|case| case.tree().to_string()),
            Err(_) => Some(format!("expected a value of type {}, got {}",
                                   T::describe(), arg.desc()))
        }
    }
}
