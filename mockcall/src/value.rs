// vim: tw=80
//! Dynamically typed argument and return values.

use core::fmt;
use std::any::TypeId;
use downcast::{downcast, Any};

use crate::types::{Describe, TypeDesc};

/// A value passed to, or returned from, a mocked method.
pub type Value = Box<dyn Arg>;

/// Object-safe view of a [`Describe`] type.
///
/// Every `Describe` type is an `Arg`; there is no need to implement it by
/// hand.  Use the `downcast_ref` and `downcast` methods to recover the
/// concrete value.
pub trait Arg: Any + fmt::Debug + Send {
    /// Descriptor of the value's concrete type
    fn desc(&self) -> TypeDesc;

    #[doc(hidden)]
    fn clone_arg(&self) -> Value;
}

downcast!(dyn Arg);

impl<T: Describe> Arg for T {
    fn desc(&self) -> TypeDesc {
        T::describe()
    }

    fn clone_arg(&self) -> Value {
        Box::new(self.clone())
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        (**self).clone_arg()
    }
}

/// What a user function may return.
///
/// A single [`Describe`] value is one return value, `()` is none, and a tuple
/// of `Describe` values is one return value per element, in order.  So a
/// closure standing in for a method with two return types returns a pair.
pub trait Returns: 'static {
    #[doc(hidden)]
    fn into_values(self) -> Vec<Value>;
}

impl<T: Describe> Returns for T {
    fn into_values(self) -> Vec<Value> {
        if TypeId::of::<T>() == TypeId::of::<()>() {
            Vec::new()
        } else {
            vec![Box::new(self)]
        }
    }
}

macro_rules! returns_tuple {
    ($( $t:ident $v:ident ),*) => {
        impl<$( $t: Describe, )*> Returns for ($( $t, )*) {
            fn into_values(self) -> Vec<Value> {
                let ($( $v, )*) = self;
                vec![$( Box::new($v) as Value ),*]
            }
        }
    }
}

returns_tuple!{T0 t0, T1 t1}
returns_tuple!{T0 t0, T1 t1, T2 t2}
returns_tuple!{T0 t0, T1 t1, T2 t2, T3 t3}
returns_tuple!{T0 t0, T1 t1, T2 t2, T3 t3, T4 t4}
returns_tuple!{T0 t0, T1 t1, T2 t2, T3 t3, T4 t4, T5 t5}
returns_tuple!{T0 t0, T1 t1, T2 t2, T3 t3, T4 t4, T5 t5, T6 t6}
returns_tuple!{T0 t0, T1 t1, T2 t2, T3 t3, T4 t4, T5 t5, T6 t6, T7 t7}

#[cfg(test)]
mod t {
    use super::*;

    #[test]
    fn clone_is_deep() {
        let v: Value = Box::new(vec![1u32, 2]);
        let w = v.clone();
        assert_eq!(Ok(&vec![1u32, 2]), w.downcast_ref::<Vec<u32>>().map_err(|_| ()));
        assert_eq!(TypeDesc::sequence(u32::describe()), w.desc());
    }

    #[test]
    fn unit_returns_nothing() {
        assert!(().into_values().is_empty());
        let r = 5i64.into_values();
        assert_eq!(1, r.len());
        assert!(r[0].is::<i64>());
    }

    #[test]
    fn tuples_return_each_element() {
        let r = (5u32, String::from("five")).into_values();
        assert_eq!(2, r.len());
        assert_eq!(Ok(&5u32), r[0].downcast_ref::<u32>().map_err(|_| ()));
        assert_eq!(Ok(&String::from("five")),
                   r[1].downcast_ref::<String>().map_err(|_| ()));
    }

    #[test]
    fn vec_is_a_single_value() {
        let r = vec![1u8, 2, 3].into_values();
        assert_eq!(1, r.len());
        assert!(r[0].is::<Vec<u8>>());
    }
}
