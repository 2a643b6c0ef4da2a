// vim: tw=80
//! User functions standing in for a mocked method.
//!
//! A closure's parameter types are only known where it is registered, so
//! registration erases it into a function over dynamic [`Value`]s that knows
//! how to unpack its own arguments.  The [`Stub`] trait does the erasing; it
//! is implemented for closures of up to eight parameters.

use core::fmt;
use std::{
    mem,
    sync::{Mutex, PoisonError},
};

use fragile::Fragile;

use crate::{
    failure::Failure,
    types::{AnyArg, Describe, TypeDesc, Variadic},
    value::{Returns, Value},
};

/// What becomes of an action's return values
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Run for side effects only; return values are discarded
    RunOnly,
    /// The return values become the expectation's return values
    Returning,
}

/// A function that can stand in for a mocked method.
///
/// `Args` is a tuple of the parameter types.  It only exists to keep the
/// implementations for different arities apart, and is always inferred.
/// Closure parameters must be annotated with their types.  To return several
/// values, return a tuple:
/// ```
/// # use mockcall::*;
/// let sig = Signature::new()
///     .param::<u32>()
///     .returns::<u32>()
///     .returns::<bool>();
/// let call = Call::new("Foo", "foo", sig);
/// call.add_returning_action(|x: u32| (x / 2, x % 2 == 0));
/// ```
pub trait Stub<Args>: 'static {
    /// Descriptors of the function's parameters
    fn params() -> Vec<TypeDesc>;

    /// Unpack `args` and call the function.
    fn invoke(&mut self, args: Vec<Value>) -> Result<Vec<Value>, Failure>;
}

/// Fit the actual arguments to a function's parameter list.
///
/// For a variadic function the trailing arguments are packed into a single
/// `Variadic<AnyArg>`.  Otherwise the count must match exactly.
fn pack(mut args: Vec<Value>, params: &[TypeDesc])
    -> Result<Vec<Value>, Failure>
{
    match params.last() {
        Some(TypeDesc::Variadic(_)) => {
            let fixed = params.len() - 1;
            if args.len() < fixed {
                return Err(Failure::WrongArgumentCount {
                    got: args.len(),
                    want: fixed,
                    variadic: true
                });
            }
            let rest = args.split_off(fixed)
                .into_iter()
                .map(AnyArg)
                .collect();
            args.push(Box::new(Variadic(rest)));
            Ok(args)
        },
        _ if args.len() != params.len() => {
            Err(Failure::WrongArgumentCount {
                got: args.len(),
                want: params.len(),
                variadic: false
            })
        },
        _ => Ok(args)
    }
}

macro_rules! stub {
    ($( $p:ident $v:ident ),*) => {
        impl<Func, R, $( $p, )*> Stub<($( $p, )*)> for Func
            where Func: FnMut($( $p ),*) -> R + 'static,
                  R: Returns,
                  $( $p: Describe, )*
        {
            fn params() -> Vec<TypeDesc> {
                vec![$( $p::describe() ),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn invoke(&mut self, args: Vec<Value>)
                -> Result<Vec<Value>, Failure>
            {
                let params = <Self as Stub<($( $p, )*)>>::params();
                let mut args = pack(args, &params)?.into_iter().enumerate();
                $(
                    let Some((index, arg)) = args.next() else {
                        unreachable!()
                    };
                    let $v = $p::from_arg(arg)
                        .map_err(|arg| Failure::WrongArgumentType {
                            index,
                            want: $p::describe(),
                            got: arg.desc()
                        })?;
                )*
                Ok((self)($( $v ),*).into_values())
            }
        }
    }
}

stub!{}
stub!{P0 p0}
stub!{P0 p0, P1 p1}
stub!{P0 p0, P1 p1, P2 p2}
stub!{P0 p0, P1 p1, P2 p2, P3 p3}
stub!{P0 p0, P1 p1, P2 p2, P3 p3, P4 p4}
stub!{P0 p0, P1 p1, P2 p2, P3 p3, P4 p4, P5 p5}
stub!{P0 p0, P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6}
stub!{P0 p0, P1 p1, P2 p2, P3 p3, P4 p4, P5 p5, P6 p6, P7 p7}

type Erased = Box<dyn FnMut(Vec<Value>) -> Result<Vec<Value>, Failure> + Send>;

/// Action functions
enum Afunc {
    /// The function can never stand in for the method
    Rejected(Failure),
    /// The function is running, and has been moved out to its caller
    Running,
    Mut(Erased),
}

/// Puts a running function back into its slot when it returns or unwinds.
struct Running<'a> {
    slot: &'a Mutex<Afunc>,
    f: Option<Erased>,
}

impl Running<'_> {
    fn call_mut(&mut self, args: Vec<Value>) -> Result<Vec<Value>, Failure> {
        let Some(f) = self.f.as_mut() else { unreachable!() };
        f(args)
    }
}

impl Drop for Running<'_> {
    fn drop(&mut self) {
        if let Some(f) = self.f.take() {
            *self.slot.lock().unwrap_or_else(PoisonError::into_inner) =
                Afunc::Mut(f);
        }
    }
}

/// A registered user function, bound to one expectation.
pub struct Action {
    mode: Mode,
    params: Vec<TypeDesc>,
    afunc: Mutex<Afunc>,
}

impl Action {
    /// Erase `f` into an action.
    pub fn new<Args, F>(mode: Mode, f: F) -> Self
        where F: Stub<Args> + Send
    {
        let mut f = f;
        let params = F::params();
        let afunc = Afunc::Mut(Box::new(move |args: Vec<Value>| f.invoke(args)));
        Action{mode, params, afunc: Mutex::new(afunc)}
    }

    /// Single-threaded version of [`new`](#method.new), for functions that
    /// aren't `Send`.
    ///
    /// It is a runtime error to invoke the action from a different thread
    /// than the one that created it.
    pub fn new_st<Args, F>(mode: Mode, f: F) -> Self
        where F: Stub<Args>
    {
        let params = F::params();
        let mut fragile = Fragile::new(f);
        let fmut = move |args: Vec<Value>| fragile.get_mut().invoke(args);
        Action{mode, params, afunc: Mutex::new(Afunc::Mut(Box::new(fmut)))}
    }

    /// An action that returns clones of `values` whatever the arguments.
    pub(crate) fn constant(values: Vec<Value>) -> Self {
        let fmut = move |_args: Vec<Value>| -> Result<Vec<Value>, Failure> {
            Ok(values.clone())
        };
        Action {
            mode: Mode::Returning,
            params: Vec::new(),
            afunc: Mutex::new(Afunc::Mut(Box::new(fmut)))
        }
    }

    /// Mark this action as unable to ever stand in for its method.
    pub(crate) fn reject(&mut self, failure: Failure) {
        *self.afunc.get_mut().unwrap_or_else(PoisonError::into_inner) =
            Afunc::Rejected(failure);
    }

    pub fn is_rejected(&self) -> bool {
        matches!(*self.afunc.lock().unwrap_or_else(PoisonError::into_inner),
                 Afunc::Rejected(_))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Descriptors of the user function's parameters
    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }

    /// Call the user function.
    ///
    /// Returns the function's return values for a [`Mode::Returning`]
    /// action, `None` for a [`Mode::RunOnly`] one.  The function runs without
    /// any lock held, so it may call back into the mock.  But it can't run
    /// again until it has returned: invoking it from within itself is a
    /// failure.
    ///
    /// # Panics
    ///
    /// If the action was rejected at registration.
    pub fn invoke(&self, args: Vec<Value>)
        -> Result<Option<Vec<Value>>, Failure>
    {
        tracing::trace!(mode = ?self.mode, nargs = args.len(), "invoking action");
        let f = {
            let mut afunc = self.afunc.lock()
                .unwrap_or_else(PoisonError::into_inner);
            match mem::replace(&mut *afunc, Afunc::Running) {
                Afunc::Mut(f) => f,
                Afunc::Running => return Err(Failure::ActionReentered),
                Afunc::Rejected(failure) => {
                    let msg = format!(
                        "Invoked an action that can't stand in for its method: {}",
                        failure);
                    *afunc = Afunc::Rejected(failure);
                    drop(afunc);
                    panic!("{}", msg);
                }
            }
        };
        let mut running = Running{slot: &self.afunc, f: Some(f)};
        let rets = running.call_mut(args)?;
        match self.mode {
            Mode::Returning => Ok(Some(rets)),
            Mode::RunOnly => Ok(None)
        }
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Action")
            .field("mode", &self.mode)
            .field("params", &self.params)
            .field("rejected", &self.is_rejected())
            .finish()
    }
}
