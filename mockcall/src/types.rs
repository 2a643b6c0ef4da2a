// vim: tw=80
//! Type descriptors and the assignability oracle.
//!
//! A mocked method's parameters, and the parameters of a closure standing in
//! for it, are compared as [`TypeDesc`] values rather than as Rust types.
//! Rust types obtain their descriptor through the [`Describe`] trait, which
//! is implemented here for the common standard library types and may be
//! derived for user types with `#[derive(Describe)]`.

use core::fmt::{self, Display};
use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
    ops::Deref,
};

use crate::value::Value;

/// The shape of a parameter or return type, as far as compatibility checking
/// is concerned.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeDesc {
    /// A built-in scalar type, like `i32` or `String`.
    Primitive(&'static str),
    /// A concrete user type, with the names of the methods it provides.
    Named {
        name: &'static str,
        methods: Vec<&'static str>,
    },
    /// An interface, satisfied by any type providing all of `methods`.  The
    /// interface with no methods is the universal `any`.
    Interface {
        name: &'static str,
        methods: Vec<&'static str>,
    },
    /// An ordered sequence of elements
    Sequence(Box<TypeDesc>),
    /// A mapping from keys to values
    Mapping(Box<TypeDesc>, Box<TypeDesc>),
    /// A trailing parameter accepting any number of elements
    Variadic(Box<TypeDesc>),
}

impl TypeDesc {
    /// The universal interface, satisfied by every value type.
    pub fn any() -> Self {
        TypeDesc::Interface { name: "any", methods: Vec::new() }
    }

    pub fn primitive(name: &'static str) -> Self {
        TypeDesc::Primitive(name)
    }

    pub fn named(name: &'static str, methods: &[&'static str]) -> Self {
        TypeDesc::Named { name, methods: methods.to_vec() }
    }

    pub fn interface(name: &'static str, methods: &[&'static str]) -> Self {
        TypeDesc::Interface { name, methods: methods.to_vec() }
    }

    pub fn sequence(elem: TypeDesc) -> Self {
        TypeDesc::Sequence(Box::new(elem))
    }

    pub fn mapping(key: TypeDesc, value: TypeDesc) -> Self {
        TypeDesc::Mapping(Box::new(key), Box::new(value))
    }

    pub fn variadic(elem: TypeDesc) -> Self {
        TypeDesc::Variadic(Box::new(elem))
    }

    /// Is this the interface with an empty method set?
    pub fn is_any(&self) -> bool {
        matches!(self, TypeDesc::Interface { methods, .. } if methods.is_empty())
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, TypeDesc::Variadic(_))
    }

    /// Methods provided by values of this type.
    pub fn method_set(&self) -> &[&'static str] {
        match self {
            TypeDesc::Named { methods, .. } |
            TypeDesc::Interface { methods, .. } => methods.as_slice(),
            _ => &[]
        }
    }

    /// Does this type provide every method in `required`?
    ///
    /// A variadic parameter is not a value type, so it satisfies nothing.
    pub fn implements(&self, required: &[&'static str]) -> bool {
        if self.is_variadic() {
            return false;
        }
        let provided = self.method_set();
        required.iter().all(|m| provided.contains(m))
    }
}

impl Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeDesc::Primitive(name) |
            TypeDesc::Named { name, .. } => write!(f, "{}", name),
            TypeDesc::Interface { name, .. } => write!(f, "dyn {}", name),
            TypeDesc::Sequence(elem) => write!(f, "Vec<{}>", elem),
            TypeDesc::Mapping(k, v) => write!(f, "Map<{}, {}>", k, v),
            TypeDesc::Variadic(elem) => write!(f, "...{}", elem),
        }
    }
}

/// Can an argument declared as `from` be handed to a parameter declared as
/// `to`?
///
/// `from` is the mocked method's parameter and `to` is the parameter of the
/// function standing in for it.  Values cross interfaces in either direction:
/// a concrete value may be passed to an interface it satisfies, and a value
/// arriving through an interface may be received as a concrete type that
/// satisfies that interface.  Containers are stricter: a container of `any`
/// only pairs with another container of `any`.
///
/// # Examples
/// ```
/// # use mockcall::*;
/// let int = TypeDesc::primitive("i32");
/// assert!(is_assignable(&TypeDesc::any(), &int));
/// assert!(!is_assignable(&TypeDesc::sequence(TypeDesc::any()),
///                        &TypeDesc::sequence(int)));
/// ```
pub fn is_assignable(from: &TypeDesc, to: &TypeDesc) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (TypeDesc::Variadic(f), TypeDesc::Variadic(t)) => is_assignable(f, t),
        (TypeDesc::Variadic(_), _) | (_, TypeDesc::Variadic(_)) => false,
        (TypeDesc::Interface { methods: fm, .. },
         TypeDesc::Interface { methods: tm, .. }) =>
        {
            from.implements(tm) || to.implements(fm)
        },
        (_, TypeDesc::Interface { methods, .. }) => from.implements(methods),
        (TypeDesc::Interface { methods, .. }, _) => to.implements(methods),
        (TypeDesc::Sequence(f), TypeDesc::Sequence(t)) => {
            elements_assignable(f, t)
        },
        (TypeDesc::Mapping(fk, fv), TypeDesc::Mapping(tk, tv)) => {
            elements_assignable(fk, tk) && elements_assignable(fv, tv)
        },
        _ => false
    }
}

/// Assignability of container element, key, or value types.
///
/// A container of `any` only pairs with another container of `any`.  The
/// elements would be individually assignable, but the containers' storage
/// is not interchangeable.
fn elements_assignable(from: &TypeDesc, to: &TypeDesc) -> bool {
    if from.is_any() || to.is_any() {
        from.is_any() && to.is_any()
    } else {
        is_assignable(from, to)
    }
}

/// Types that can be passed to, or returned from, a mocked method.
///
/// Implement it with `#[derive(Describe)]` for your own types:
/// ```
/// # use mockcall::*;
/// #[derive(Clone, Debug, Describe)]
/// #[describe(methods(to_string))]
/// struct Meow;
///
/// assert_eq!(Meow::describe(), TypeDesc::named("Meow", &["to_string"]));
/// ```
pub trait Describe: Clone + fmt::Debug + Send + 'static {
    /// This type's descriptor
    fn describe() -> TypeDesc;

    /// Move a dynamic argument into this type, or give it back if it holds
    /// something else.
    #[doc(hidden)]
    fn from_arg(arg: Value) -> Result<Self, Value> {
        arg.downcast::<Self>()
            .map(|b| *b)
            .map_err(|e| e.into_object())
    }
}

macro_rules! describe_primitive {
    ($($t:ty),*) => {
        $(
            impl Describe for $t {
                fn describe() -> TypeDesc {
                    TypeDesc::Primitive(stringify!($t))
                }
            }
        )*
    }
}

describe_primitive!{
    bool, char, f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64,
    u128, usize, String, &'static str, ()
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDesc {
        TypeDesc::sequence(T::describe())
    }
}

impl<K, V> Describe for HashMap<K, V>
    where K: Describe + Eq + Hash, V: Describe
{
    fn describe() -> TypeDesc {
        TypeDesc::mapping(K::describe(), V::describe())
    }
}

impl<K, V> Describe for BTreeMap<K, V>
    where K: Describe + Ord, V: Describe
{
    fn describe() -> TypeDesc {
        TypeDesc::mapping(K::describe(), V::describe())
    }
}

/// A parameter of the universal `any` type.  It receives whatever value the
/// mocked method was called with.
///
/// # Examples
/// ```
/// # use mockcall::*;
/// let a = AnyArg::new(42u32);
/// assert_eq!(Some(&42u32), a.downcast_ref::<u32>());
/// assert_eq!(None, a.downcast_ref::<i64>());
/// ```
#[derive(Clone, Debug)]
pub struct AnyArg(pub Value);

impl AnyArg {
    pub fn new<T: Describe>(t: T) -> Self {
        AnyArg(Box::new(t))
    }

    /// Borrow the contained value as a `T`, if that's what it is.
    pub fn downcast_ref<T: Describe>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>().ok()
    }

    /// Descriptor of the contained value
    pub fn desc(&self) -> TypeDesc {
        self.0.desc()
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl Describe for AnyArg {
    fn describe() -> TypeDesc {
        TypeDesc::any()
    }

    fn from_arg(arg: Value) -> Result<Self, Value> {
        if arg.is::<AnyArg>() {
            arg.downcast::<AnyArg>()
                .map(|b| *b)
                .map_err(|e| e.into_object())
        } else {
            Ok(AnyArg(arg))
        }
    }
}

/// A trailing parameter that collects all remaining arguments.
///
/// Only valid as the last parameter of a [`Signature`](crate::Signature) or
/// of a closure passed to [`Call::add_action`](crate::Call::add_action).
///
/// # Examples
/// ```
/// # use mockcall::*;
/// let sig = Signature::new().variadic::<i32>().returns::<i32>();
/// let call = Call::new("Math", "sum", sig);
/// call.add_returning_action(|xs: Variadic<i32>| xs.iter().sum::<i32>());
/// let r = call.run_actions(vec![Box::new(1i32), Box::new(2i32), Box::new(3i32)]);
/// assert_eq!(Some(&6), r[0].downcast_ref::<i32>().ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Variadic<T>(pub Vec<T>);

impl<T> Variadic<T> {
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Variadic<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> IntoIterator for Variadic<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Describe> Describe for Variadic<T> {
    fn describe() -> TypeDesc {
        TypeDesc::variadic(T::describe())
    }

    /// Unpack the trailing arguments, which invocation packs as a
    /// `Variadic<AnyArg>`.
    fn from_arg(arg: Value) -> Result<Self, Value> {
        let packed = arg.downcast::<Variadic<AnyArg>>()
            .map_err(|e| e.into_object())?;
        packed.0.into_iter()
            .map(|a| T::from_arg(a.0))
            .collect::<Result<Vec<T>, Value>>()
            .map(Variadic)
    }
}
