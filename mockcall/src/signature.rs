// vim: tw=80
use core::fmt::{self, Display};
use std::marker::PhantomData;

use crate::{
    failure::Failure,
    types::{Describe, TypeDesc, is_assignable},
    value::Value,
};

#[doc(hidden)]
pub trait ReturnDefault {
    fn return_default() -> Option<Value>;
}

#[doc(hidden)]
pub struct DefaultReturner<O: 'static>(PhantomData<O>);

::cfg_if::cfg_if! {
    if #[cfg(feature = "nightly")] {
        impl<O: Describe> ReturnDefault for DefaultReturner<O> {
            default fn return_default() -> Option<Value> {
                None
            }
        }

        impl<O: Describe + Default> ReturnDefault for DefaultReturner<O> {
            fn return_default() -> Option<Value> {
                Some(Box::new(O::default()))
            }
        }
    } else {
        impl<O: Describe> ReturnDefault for DefaultReturner<O> {
            fn return_default() -> Option<Value> {
                None
            }
        }
    }
}

#[derive(Clone, Debug)]
struct ReturnSlot {
    desc: TypeDesc,
    /// Produces the type's zero value, where it has one
    zero: fn() -> Option<Value>,
}

impl PartialEq for ReturnSlot {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

/// The declared shape of a mocked method.
///
/// # Examples
/// ```
/// # use mockcall::*;
/// // fn sum(&self, base: i64, xs: ...i64) -> i64
/// let sig = Signature::new()
///     .param::<i64>()
///     .variadic::<i64>()
///     .returns::<i64>();
/// assert!(sig.is_variadic());
/// assert_eq!("(i64, ...i64) -> (i64)", sig.to_string());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    params: Vec<TypeDesc>,
    returns: Vec<ReturnSlot>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter of type `T`.
    pub fn param<T: Describe>(self) -> Self {
        self.param_desc(T::describe())
    }

    /// Append a parameter with an explicit descriptor.  This is how
    /// interface-typed parameters are declared.
    pub fn param_desc(mut self, desc: TypeDesc) -> Self {
        assert!(!self.is_variadic(),
            "A variadic parameter must be the method's last parameter");
        self.params.push(desc);
        self
    }

    /// Append a trailing variadic parameter with elements of type `T`.
    pub fn variadic<T: Describe>(self) -> Self {
        self.param_desc(TypeDesc::variadic(T::describe()))
    }

    /// Append a return value of type `T`.
    pub fn returns<T: Describe>(mut self) -> Self {
        let zero = <DefaultReturner<T> as ReturnDefault>::return_default;
        self.returns.push(ReturnSlot{desc: T::describe(), zero});
        self
    }

    /// Append a return value with an explicit descriptor.  It has no zero
    /// value.
    pub fn returns_desc(mut self, desc: TypeDesc) -> Self {
        self.returns.push(ReturnSlot{desc, zero: || None});
        self
    }

    pub fn params(&self) -> &[TypeDesc] {
        &self.params
    }

    pub fn returns_iter(&self) -> impl Iterator<Item=&TypeDesc> {
        self.returns.iter().map(|r| &r.desc)
    }

    pub fn is_variadic(&self) -> bool {
        self.params.last().map(TypeDesc::is_variadic).unwrap_or(false)
    }

    /// Check that a function with parameters `user` can stand in for this
    /// method.
    ///
    /// Only positions present in both lists are compared.  A difference in
    /// length can't be judged until the actual arguments are known.
    pub fn check_params(&self, user: &[TypeDesc]) -> Result<(), Failure> {
        for (index, (method, action)) in self.params.iter()
            .zip(user.iter())
            .enumerate()
        {
            if !is_assignable(method, action) {
                return Err(Failure::IncompatibleParameter {
                    index,
                    method: method.clone(),
                    action: action.clone()
                });
            }
        }
        Ok(())
    }

    /// Check that `values` could be returned by this method.
    pub fn check_returns(&self, values: &[Value]) -> Result<(), Failure> {
        if values.len() != self.returns.len() {
            return Err(Failure::WrongReturnCount {
                got: values.len(),
                want: self.returns.len()
            });
        }
        for (index, (slot, v)) in self.returns.iter()
            .zip(values.iter())
            .enumerate()
        {
            let got = v.desc();
            if !is_assignable(&got, &slot.desc) {
                return Err(Failure::WrongReturnType {
                    index,
                    want: slot.desc.clone(),
                    got
                });
            }
        }
        Ok(())
    }

    /// The zero values of every return type, if they all have one.
    pub fn zero_returns(&self) -> Option<Vec<Value>> {
        self.returns.iter()
            .map(|r| (r.zero)())
            .collect()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let params = self.params.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "({})", params.join(", "))?;
        if !self.returns.is_empty() {
            let returns = self.returns_iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            write!(f, " -> ({})", returns.join(", "))?;
        }
        Ok(())
    }
}
