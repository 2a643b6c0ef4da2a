// vim: tw=80
use core::fmt::{self, Display};
use std::{
    collections::HashSet,
    mem,
    panic::Location,
    sync::{Arc, Mutex, PoisonError},
};

use predicates::prelude::{Predicate, predicate};

use crate::{
    action::{Action, Mode, Stub},
    failure::Failure,
    matcher::{ArgMatcher, Matcher},
    reporter::{PanicReporter, Reporter},
    signature::Signature,
    times::Times,
    types::Describe,
    value::Value,
};

struct CallInner {
    receiver: String,
    method: String,
    origin: &'static Location<'static>,
    signature: Signature,
    reporter: Arc<dyn Reporter>,
    prereqs: Mutex<Vec<Call>>,
    actions: Mutex<Vec<Arc<Action>>>,
    matchers: Mutex<Vec<Box<dyn ArgMatcher>>>,
    times: Times,
}

impl Drop for CallInner {
    /// Release prerequisites iteratively, so a long chain can't overflow the
    /// stack.
    fn drop(&mut self) {
        let mut stack = mem::take(
            self.prereqs.get_mut().unwrap_or_else(PoisonError::into_inner));
        while let Some(call) = stack.pop() {
            if let Ok(mut inner) = Arc::try_unwrap(call.0) {
                stack.append(
                    inner.prereqs.get_mut().unwrap_or_else(PoisonError::into_inner));
            }
        }
    }
}

/// One expected call of a mocked method.
///
/// A `Call` is a cheap, shared handle: clones refer to the same expectation,
/// and equality is identity.  It holds the call's prerequisites (other calls
/// that must be satisfied first), its argument matchers, its call count
/// bounds, and the actions to run when it is matched.
///
/// Failures in declaring or running a call go to its [`Reporter`].
///
/// # Examples
/// ```
/// # use mockcall::*;
/// let sig = Signature::new().param::<i32>().param::<i32>().returns::<i32>();
/// let open = Call::new("Db", "open", Signature::new());
/// let sum = Call::new("Math", "sum", sig);
/// sum.after(&open)
///     .with::<i32, _>(predicate::eq(2))
///     .with::<i32, _>(predicate::always())
///     .add_returning_action(|x: i32, y: i32| x + y);
///
/// assert!(!sum.is_eligible());
/// open.run_actions(Vec::new());
/// assert!(sum.is_eligible());
///
/// let args: Vec<Value> = vec![Box::new(2i32), Box::new(3i32)];
/// assert!(sum.matches(&args).is_ok());
/// let r = sum.run_actions(args);
/// assert_eq!(Some(&5), r[0].downcast_ref::<i32>().ok());
/// ```
#[derive(Clone)]
pub struct Call(Arc<CallInner>);

impl Call {
    /// Expect a call of `receiver.method`, reporting failures by panicking.
    #[track_caller]
    pub fn new<R, M>(receiver: R, method: M, signature: Signature) -> Self
        where R: Into<String>, M: Into<String>
    {
        Self::with_reporter(receiver, method, signature,
                            Arc::new(PanicReporter))
    }

    /// Expect a call of `receiver.method`, sending failures to `reporter`.
    #[track_caller]
    pub fn with_reporter<R, M>(receiver: R,
                               method: M,
                               signature: Signature,
                               reporter: Arc<dyn Reporter>) -> Self
        where R: Into<String>, M: Into<String>
    {
        Call(Arc::new(CallInner {
            receiver: receiver.into(),
            method: method.into(),
            origin: Location::caller(),
            signature,
            reporter,
            prereqs: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
            matchers: Mutex::new(Vec::new()),
            times: Times::default(),
        }))
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    fn fatal(&self, failure: &Failure) {
        self.0.reporter.report_fatal(&format!("{}: {}", self, failure));
    }

    /// The mocked method's declared signature
    pub fn signature(&self) -> &Signature {
        &self.0.signature
    }

    /// Where this expectation was created
    pub fn origin(&self) -> &'static Location<'static> {
        self.0.origin
    }

    /// Require `prereq` to be satisfied before this call may be matched.
    ///
    /// It is a fatal error for a call to be its own prerequisite, or for the
    /// new prerequisite to close a loop.  Either way no prerequisite is added.
    /// Adding the same prerequisite twice has no further effect.
    pub fn after(&self, prereq: &Call) -> &Self {
        if self == prereq {
            self.fatal(&Failure::SelfPrerequisite {
                call: self.to_string()
            });
            return self;
        }
        if prereq.requires(self) {
            self.fatal(&Failure::PrerequisiteLoop {
                call: self.to_string(),
                prereq: prereq.to_string()
            });
            return self;
        }
        let mut prereqs = self.0.prereqs.lock().unwrap();
        if !prereqs.contains(prereq) {
            tracing::debug!(call = %self, prereq = %prereq, "adding prerequisite");
            prereqs.push(prereq.clone());
        }
        self
    }

    /// Is `other` a prerequisite of this call, directly or indirectly?
    pub fn requires(&self, other: &Call) -> bool {
        let mut visited = HashSet::new();
        let mut stack = self.prerequisites();
        while let Some(c) = stack.pop() {
            if c == *other {
                return true;
            }
            if visited.insert(c.id()) {
                stack.extend(c.prerequisites());
            }
        }
        false
    }

    /// This call's direct prerequisites, in declaration order
    pub fn prerequisites(&self) -> Vec<Call> {
        self.0.prereqs.lock().unwrap().clone()
    }

    /// Have all of this call's prerequisites been satisfied?
    pub fn is_eligible(&self) -> bool {
        self.0.prereqs.lock().unwrap()
            .iter()
            .all(Call::is_satisfied)
    }

    /// Add this call to the end of `seq`, after every call already in it.
    pub fn in_sequence(&self, seq: &mut Sequence) -> &Self {
        seq.push(self);
        self
    }

    /// Check `action` against the method's parameters and record it.  An
    /// incompatible action is recorded too, but can never run.
    fn register(&self, mut action: Action) {
        if let Err(failure) = self.0.signature.check_params(action.params()) {
            action.reject(failure.clone());
            self.0.actions.lock().unwrap().push(Arc::new(action));
            self.fatal(&failure);
            return;
        }
        tracing::debug!(call = %self, mode = ?action.mode(), "adding action");
        self.0.actions.lock().unwrap().push(Arc::new(action));
    }

    /// Run `f` whenever this call is matched.  Its return values, if any, are
    /// discarded.
    ///
    /// `f`'s parameters must be able to receive the method's arguments.  It is
    /// a fatal error if they can't, though a difference in the number of
    /// parameters only becomes an error when the call is matched with an
    /// argument count that `f` can't accept.
    pub fn add_action<Args, F>(&self, f: F) -> &Self
        where F: Stub<Args> + Send
    {
        self.register(Action::new(Mode::RunOnly, f));
        self
    }

    /// Like [`add_action`](#method.add_action), but `f`'s return values
    /// become this call's return values.
    ///
    /// `f` returns a tuple if the method has several return values.  It is a
    /// fatal error if what it returns doesn't fit the method's return types.
    pub fn add_returning_action<Args, F>(&self, f: F) -> &Self
        where F: Stub<Args> + Send
    {
        self.register(Action::new(Mode::Returning, f));
        self
    }

    /// Single-threaded version of [`add_action`](#method.add_action).  Can be
    /// used when `f` isn't `Send`.
    ///
    /// It is a runtime error to match this call from a different thread than
    /// the one that registered `f`.
    pub fn add_action_st<Args, F>(&self, f: F) -> &Self
        where F: Stub<Args>
    {
        self.register(Action::new_st(Mode::RunOnly, f));
        self
    }

    /// Single-threaded version of
    /// [`add_returning_action`](#method.add_returning_action).
    pub fn add_returning_action_st<Args, F>(&self, f: F) -> &Self
        where F: Stub<Args>
    {
        self.register(Action::new_st(Mode::Returning, f));
        self
    }

    /// Return `values` whenever this call is matched.
    ///
    /// It is a fatal error if they don't fit the method's return types.
    pub fn return_values(&self, values: Vec<Value>) -> &Self {
        if let Err(failure) = self.0.signature.check_returns(&values) {
            self.fatal(&failure);
            return self;
        }
        self.0.actions.lock().unwrap().push(Arc::new(Action::constant(values)));
        self
    }

    /// Number of registered actions, including rejected ones
    pub fn action_count(&self) -> usize {
        self.0.actions.lock().unwrap().len()
    }

    /// Require the next argument to satisfy `p`.
    ///
    /// Matchers are positional: the first one added applies to the first
    /// argument, and so on.  Once any are set, there must be one for every
    /// argument.
    pub fn with<T, P>(&self, p: P) -> &Self
        where T: Describe, P: Predicate<T> + Send + 'static
    {
        self.0.matchers.lock().unwrap().push(Box::new(Matcher::new(p)));
        self
    }

    /// Require the next argument to satisfy the function `f`.
    ///
    /// Equivalent to `with(predicate::function(f))`.
    pub fn withf<T, F>(&self, f: F) -> &Self
        where T: Describe, F: Fn(&T) -> bool + Send + 'static
    {
        self.with::<T, _>(predicate::function(f))
    }

    /// Could a call with `args` be matched to this expectation right now?
    ///
    /// Checks the argument matchers, then the prerequisites, then the call
    /// count.
    pub fn matches(&self, args: &[Value]) -> Result<(), Failure> {
        {
            let matchers = self.0.matchers.lock().unwrap();
            if !matchers.is_empty() && matchers.len() != args.len() {
                return Err(Failure::MatcherCount {
                    got: args.len(),
                    want: matchers.len()
                });
            }
            for (index, (m, arg)) in matchers.iter()
                .zip(args.iter())
                .enumerate()
            {
                if let Some(explanation) = m.find_mismatch(arg.as_ref()) {
                    return Err(Failure::ArgumentMismatch{index, explanation});
                }
            }
        }
        if let Some(p) = self.prerequisites().iter().find(|p| !p.is_satisfied()) {
            return Err(Failure::PrerequisiteUnsatisfied {
                prereq: p.to_string()
            });
        }
        if self.is_exhausted() {
            return Err(Failure::Exhausted{max: self.0.times.max()});
        }
        Ok(())
    }

    /// Record that this call was matched with `args`, and run its actions in
    /// registration order.
    ///
    /// Returns the values from the last returning action, or the zero values
    /// of the method's return types if there was none.  An action that fails,
    /// or whose return values don't fit the method's return types, is reported
    /// as fatal.
    pub fn run_actions(&self, args: Vec<Value>) -> Vec<Value> {
        let count = self.0.times.call();
        // Run without the lock, so an action may use this expectation
        let actions = self.0.actions.lock().unwrap().clone();
        tracing::debug!(call = %self, count, nactions = actions.len(),
                        "running actions");
        let mut rets = None;
        for action in actions.iter() {
            match action.invoke(args.clone()) {
                Ok(Some(r)) => match self.0.signature.check_returns(&r) {
                    Ok(()) => rets = Some(r),
                    Err(failure) => self.fatal(&failure)
                },
                Ok(None) => (),
                Err(failure) => self.fatal(&failure)
            }
        }
        rets.or_else(|| self.0.signature.zero_returns())
            .unwrap_or_default()
    }

    /// Expect this call exactly `n` times.
    pub fn times(&self, n: usize) -> &Self {
        self.0.times.n(n);
        self
    }

    /// Expect this call exactly once.  This is the default.
    pub fn once(&self) -> &Self {
        self.times(1)
    }

    /// Forbid this call.
    pub fn never(&self) -> &Self {
        self.times(0)
    }

    /// Allow this call any number of times, including none.
    pub fn times_any(&self) -> &Self {
        self.0.times.any();
        self
    }

    /// Expect this call at least `n` times.  If no upper bound was set, there
    /// is none.
    pub fn min_times(&self, n: usize) -> &Self {
        self.0.times.at_least(n);
        self
    }

    /// Expect this call at most `n` times.  If no lower bound was set, there
    /// is none.
    pub fn max_times(&self, n: usize) -> &Self {
        self.0.times.at_most(n);
        self
    }

    /// How many times has this call been matched?
    pub fn call_count(&self) -> usize {
        self.0.times.count()
    }

    /// Has this call been matched its minimum number of times?
    pub fn is_satisfied(&self) -> bool {
        self.0.times.is_satisfied()
    }

    /// Has this call been matched its maximum number of times?
    pub fn is_exhausted(&self) -> bool {
        self.0.times.is_done()
    }
}

impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Call {}

/// Renders as `Receiver.method(args) at file:line:col`, where the arguments
/// are the matchers if any are set, or else the parameter types.
impl Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let matchers = self.0.matchers.lock().unwrap();
        let args = if matchers.is_empty() {
            self.0.signature.params().iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        } else {
            matchers.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        };
        write!(f, "{}.{}({}) at {}", self.0.receiver, self.0.method,
               args.join(", "), self.0.origin)
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Call")
            .field("receiver", &self.0.receiver)
            .field("method", &self.0.method)
            .field("origin", &self.0.origin)
            .field("signature", &self.0.signature)
            .field("calls", &self.0.times)
            .finish()
    }
}

/// Used to enforce that calls happen in the order they were added.
///
/// Each call added to a `Sequence` gets the previously added call as a
/// prerequisite.
///
/// # Examples
/// ```
/// # use mockcall::*;
/// let mut seq = Sequence::new();
/// let e1 = Call::new("Foo", "foo", Signature::new());
/// let e2 = Call::new("Foo", "bar", Signature::new());
/// e1.in_sequence(&mut seq);
/// e2.in_sequence(&mut seq);
///
/// assert!(!e2.is_eligible());
/// e1.run_actions(Vec::new());
/// assert!(e2.is_eligible());
/// ```
#[derive(Debug, Default)]
pub struct Sequence {
    last: Option<Call>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `call` to the end of the sequence.
    pub fn push(&mut self, call: &Call) {
        if let Some(prev) = &self.last {
            call.after(prev);
        }
        self.last = Some(call.clone());
    }
}

/// Declare that `calls` must happen in the given order.
pub fn in_order(calls: &[&Call]) {
    for pair in calls.windows(2) {
        pair[1].after(pair[0]);
    }
}
