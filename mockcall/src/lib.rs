// vim: tw=80
//! The expectation core of a mock object library.
//!
//! A mock object routes each call of a mocked method to one of its
//! expectations.  This crate provides those expectations.  Each [`Call`]
//! knows which other calls must happen before it, and which user functions
//! to run, in place of the real method, when it is matched.  Generating mock
//! types and routing calls between expectations is up to the layer above.
//!
//! # User Guide
//!
//! * [`Signatures`](#signatures)
//! * [`Actions`](#actions)
//! * [`Variadic methods`](#variadic-methods)
//! * [`Interfaces`](#interfaces)
//! * [`Call order`](#call-order)
//! * [`Matching arguments`](#matching-arguments)
//! * [`Failures`](#failures)
//! * [`Crate features`](#crate-features)
//!
//! ## Signatures
//!
//! Every expectation is created with the [`Signature`] of the method it
//! mocks: its parameter types, and its return types.  Types are described by
//! the [`Describe`] trait, which is implemented for the common standard
//! library types and can be derived for your own.
//!
//! ```
//! # use mockcall::*;
//! // fn foo(&self, x: u32, name: String) -> bool
//! let sig = Signature::new()
//!     .param::<u32>()
//!     .param::<String>()
//!     .returns::<bool>();
//! let call = Call::new("MockFoo", "foo", sig);
//! ```
//!
//! ## Actions
//!
//! An action is a closure run when the expectation is matched.  Those added
//! with [`add_action`](Call::add_action) are run for their side effects only.
//! Those added with [`add_returning_action`](Call::add_returning_action)
//! also provide the call's return values.  Actions run in the order they were
//! added, and the last returning action wins.
//!
//! ```
//! # use mockcall::*;
//! # use std::sync::{Arc, atomic::{AtomicU32, Ordering}};
//! let sig = Signature::new().param::<u32>().returns::<u32>();
//! let call = Call::new("MockFoo", "foo", sig);
//! let seen = Arc::new(AtomicU32::new(0));
//! let seen2 = seen.clone();
//! call.add_action(move |x: u32| seen2.store(x, Ordering::Relaxed))
//!     .add_returning_action(|x: u32| x + 1);
//!
//! let r = call.run_actions(vec![Box::new(41u32)]);
//! assert_eq!(41, seen.load(Ordering::Relaxed));
//! assert_eq!(Some(&42), r[0].downcast_ref::<u32>().ok());
//! ```
//!
//! An action's parameters are checked against the method's when it is added.
//! Each parameter must be able to receive the corresponding argument, or
//! else it's a fatal error.  A difference in the *number* of parameters is
//! not checked until the call is matched, because only then is the number of
//! arguments known.
//!
//! ```should_panic(expected = "can't stand in for method parameter")
//! # use mockcall::*;
//! let call = Call::new("MockFoo", "foo", Signature::new().param::<String>());
//! call.add_action(|_x: Vec<u8>| ());  // Panics!
//! ```
//!
//! For constant return values, use [`return_values`](Call::return_values).
//!
//! ## Variadic methods
//!
//! A method's last parameter may be variadic.  So may an action's, by taking
//! a [`Variadic`].  The trailing arguments are packed into it when the action
//! runs.  A variadic parameter only pairs with another variadic parameter,
//! never with a `Vec`.
//!
//! ```
//! # use mockcall::*;
//! let sig = Signature::new().variadic::<i32>().returns::<usize>();
//! let call = Call::new("MockLog", "log", sig);
//! call.add_returning_action(|xs: Variadic<AnyArg>| xs.len());
//! let r = call.run_actions(vec![Box::new(1i32), Box::new(2i32)]);
//! assert_eq!(Some(&2usize), r[0].downcast_ref::<usize>().ok());
//! ```
//!
//! ## Interfaces
//!
//! A parameter may be declared with an interface [`TypeDesc`]: a set of
//! required method names.  An action may then receive the argument as any
//! concrete type whose declared method set covers the interface.  [`AnyArg`]
//! receives anything.
//!
//! ```
//! # use mockcall::*;
//! #[derive(Clone, Debug, Describe)]
//! #[describe(methods(to_string))]
//! struct Meow;
//!
//! let display = TypeDesc::interface("Display", &["to_string"]);
//! let call = Call::new("MockCat", "speak",
//!                      Signature::new().param_desc(display));
//! call.add_action(|_m: Meow| ());
//! call.run_actions(vec![Box::new(Meow)]);
//! ```
//!
//! Containers are stricter than their elements.  A `Vec<i32>` argument can't
//! be received as a `Vec<AnyArg>`, nor the other way around.  See
//! [`is_assignable`] for the full rules.
//!
//! ## Call order
//!
//! Use [`after`](Call::after) to require one call to be satisfied before
//! another is eligible.  A [`Sequence`] or [`in_order`] does the same for a
//! whole list of calls.  Loops are detected as they are declared.
//!
//! ```should_panic(expected = "Loop in call order")
//! # use mockcall::*;
//! let c1 = Call::new("MockFoo", "foo", Signature::new());
//! let c2 = Call::new("MockFoo", "bar", Signature::new());
//! c1.after(&c2);
//! c2.after(&c1);  // Panics!
//! ```
//!
//! ## Matching arguments
//!
//! Optionally, expectations may have an argument matcher for each argument.
//! A matcher is anything that implements the [`Predicate`] trait.
//! [`matches`](Call::matches) checks them, along with the prerequisites and
//! the call count.
//!
//! ```
//! # use mockcall::*;
//! let call = Call::new("MockFoo", "foo", Signature::new().param::<u32>());
//! call.with::<u32, _>(predicate::eq(42));
//! assert!(call.matches(&[Box::new(42u32) as Value]).is_ok());
//! assert!(call.matches(&[Box::new(0u32) as Value]).is_err());
//! ```
//!
//! ## Failures
//!
//! Failures go to the [`Reporter`] the expectation was created with.  The
//! default, [`PanicReporter`], panics on fatal failures.  Use
//! [`Call::with_reporter`] to send them elsewhere, for example to a test
//! harness that records them.
//!
//! ## Crate features
//!
//! * **nightly** - Return types that implement `Default` supply their
//!   default value when no action returns anything.  Requires the nightly
//!   compiler.

#![cfg_attr(feature = "nightly", feature(specialization))]
#![cfg_attr(feature = "nightly", allow(incomplete_features))]

mod action;
mod call;
mod failure;
mod matcher;
mod reporter;
mod signature;
mod times;
mod types;
mod value;

pub use crate::action::{Action, Mode, Stub};
pub use crate::call::{Call, Sequence, in_order};
pub use crate::failure::Failure;
pub use crate::reporter::{PanicReporter, Reporter};
pub use crate::signature::Signature;
pub use crate::types::{AnyArg, Describe, TypeDesc, Variadic, is_assignable};
pub use crate::value::{Arg, Returns, Value};

pub use mockcall_derive::Describe;
pub use predicates::prelude::{Predicate, predicate};
