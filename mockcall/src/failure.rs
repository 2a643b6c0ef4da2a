// vim: tw=80
use core::fmt::{self, Display};

use crate::types::TypeDesc;

/// Everything that can go wrong while declaring or exercising an expectation.
///
/// Each of these indicates a defect in the test, not a condition to be
/// tolerated.  Most are sent straight to the expectation's
/// [`Reporter`](crate::Reporter); the matching failures are returned by
/// [`Call::matches`](crate::Call::matches) instead.
#[derive(Clone, Debug, PartialEq)]
pub enum Failure {
    /// A call was declared to be its own prerequisite
    SelfPrerequisite {
        call: String
    },
    /// Adding a prerequisite would close a loop
    PrerequisiteLoop {
        call: String,
        prereq: String
    },
    /// A user function's parameter can't receive the method's argument
    IncompatibleParameter {
        index: usize,
        method: TypeDesc,
        action: TypeDesc
    },
    /// The actual argument count doesn't fit the user function
    WrongArgumentCount {
        got: usize,
        want: usize,
        variadic: bool
    },
    /// An actual argument isn't of the user function's parameter type
    WrongArgumentType {
        index: usize,
        want: TypeDesc,
        got: TypeDesc
    },
    /// Return values don't fit the method's return types
    WrongReturnCount {
        got: usize,
        want: usize
    },
    WrongReturnType {
        index: usize,
        want: TypeDesc,
        got: TypeDesc
    },
    /// An action was invoked again from within itself
    ActionReentered,
    /// Argument matchers were set, but for a different number of arguments
    MatcherCount {
        got: usize,
        want: usize
    },
    /// An argument matcher rejected its argument
    ArgumentMismatch {
        index: usize,
        explanation: String
    },
    /// A prerequisite hasn't been satisfied yet
    PrerequisiteUnsatisfied {
        prereq: String
    },
    /// The expectation was already called its maximum number of times
    Exhausted {
        max: usize
    },
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Failure::SelfPrerequisite { call } => write!(f,
                "A call isn't allowed to be its own prerequisite: {}", call),
            Failure::PrerequisiteLoop { call, prereq } => write!(f,
                "Loop in call order: {} is a prerequisite to {} (possibly indirectly)",
                call, prereq),
            Failure::IncompatibleParameter { index, method, action } =>
                write!(f,
                    "Action parameter {} of type {} can't stand in for method parameter of type {}",
                    index, action, method),
            Failure::WrongArgumentCount { got, want, variadic: false } =>
                write!(f, "wrong number of arguments: got {}, want {}",
                    got, want),
            Failure::WrongArgumentCount { got, want, variadic: true } =>
                write!(f, "wrong number of arguments: got {}, want at least {}",
                    got, want),
            Failure::WrongArgumentType { index, want, got } => write!(f,
                "wrong type of argument {}: got {}, want {}", index, got, want),
            Failure::WrongReturnCount { got, want } => write!(f,
                "wrong number of return values: got {}, want {}", got, want),
            Failure::WrongReturnType { index, want, got } => write!(f,
                "wrong type of return value {}: got {}, want {}",
                index, got, want),
            Failure::ActionReentered => write!(f,
                "An action can't run again while it is still running"),
            Failure::MatcherCount { got, want } => write!(f,
                "expected call has {} argument matchers, but was called with {} arguments",
                want, got),
            Failure::ArgumentMismatch { index, explanation } => write!(f,
                "argument {} didn't match:\n{}", index, explanation),
            Failure::PrerequisiteUnsatisfied { prereq } => write!(f,
                "prerequisite call not satisfied: {}", prereq),
            Failure::Exhausted { max } => write!(f,
                "expected call has already been called the max number of times ({})",
                max),
        }
    }
}

impl std::error::Error for Failure {}
