// vim: tw=80
//! Proc Macros for use with mockcall
//!
//! You probably don't want to use this crate directly.  Instead, you use use
//! its reexports via the [`mockcall`](../mockcall/index.html) crate.

extern crate proc_macro;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    DeriveInput,
    LitStr,
    spanned::Spanned
};

/// Options parsed from `#[describe(...)]` attributes
#[derive(Debug, Default)]
struct Attrs {
    /// Overrides the type's own name
    name: Option<LitStr>,
    /// Methods provided by the type, for interface satisfaction
    methods: Vec<String>,
}

impl Attrs {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut out = Attrs::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("describe")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    out.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("methods") {
                    meta.parse_nested_meta(|m| {
                        match m.path.get_ident() {
                            Some(ident) => {
                                out.methods.push(ident.to_string());
                                Ok(())
                            },
                            None => Err(m.error("expected a method name"))
                        }
                    })
                } else {
                    Err(meta.error("unsupported describe attribute"))
                }
            })?;
        }
        Ok(out)
    }
}

fn do_derive_describe(input: TokenStream) -> TokenStream {
    let item: DeriveInput = match syn::parse2(input) {
        Ok(item) => item,
        Err(e) => return e.to_compile_error()
    };
    if !item.generics.params.is_empty() {
        return syn::Error::new(item.generics.span(),
            "Describe can't be derived for generic types.  Implement it by hand.")
            .to_compile_error();
    }
    let attrs = match Attrs::parse(&item.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error()
    };
    let ident = &item.ident;
    let name = attrs.name
        .map(|lit| lit.value())
        .unwrap_or_else(|| ident.to_string());
    let methods = &attrs.methods;
    quote!(
        impl ::mockcall::Describe for #ident {
            fn describe() -> ::mockcall::TypeDesc {
                ::mockcall::TypeDesc::named(#name, &[#(#methods),*])
            }
        }
    )
}

/// Implement `mockcall::Describe` for a concrete type.
///
/// The type must also be `Clone`, `Debug`, and `Send`.
///
/// # Attributes
///
/// * `#[describe(methods(a, b))]` - The names of the methods the type
///   provides.  A parameter declared as an interface requiring a subset of
///   these methods can be received as this type.
/// * `#[describe(name = "Foo")]` - The type's name in failure messages, if
///   different from its Rust name.
///
/// # Examples
/// ```
/// # use mockcall::*;
/// #[derive(Clone, Debug, Describe)]
/// #[describe(methods(name))]
/// struct Cat {
///     name: String
/// }
///
/// let named = TypeDesc::interface("Named", &["name"]);
/// assert!(is_assignable(&named, &Cat::describe()));
/// ```
#[proc_macro_derive(Describe, attributes(describe))]
pub fn derive_describe(input: proc_macro::TokenStream)
    -> proc_macro::TokenStream
{
    do_derive_describe(input.into()).into()
}

/// Unit tests for the `Describe` derive.
#[cfg(test)]
mod t {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(input: TokenStream, expected: TokenStream) {
        assert_eq!(expected.to_string(),
                   do_derive_describe(input).to_string());
    }

    #[test]
    fn plain() {
        check(quote!(struct Foo;),
              quote!(
                  impl ::mockcall::Describe for Foo {
                      fn describe() -> ::mockcall::TypeDesc {
                          ::mockcall::TypeDesc::named("Foo", &[])
                      }
                  }
              ));
    }

    #[test]
    fn methods() {
        check(quote!(
                  #[describe(methods(string, name))]
                  enum Foo { A, B }
              ),
              quote!(
                  impl ::mockcall::Describe for Foo {
                      fn describe() -> ::mockcall::TypeDesc {
                          ::mockcall::TypeDesc::named("Foo",
                                                      &["string", "name"])
                      }
                  }
              ));
    }

    #[test]
    fn renamed() {
        check(quote!(
                  #[describe(name = "Bar")]
                  #[describe(methods(string))]
                  struct Foo(u32);
              ),
              quote!(
                  impl ::mockcall::Describe for Foo {
                      fn describe() -> ::mockcall::TypeDesc {
                          ::mockcall::TypeDesc::named("Bar", &["string"])
                      }
                  }
              ));
    }

    #[test]
    fn generic() {
        let out = do_derive_describe(quote!(struct Foo<T>(T);)).to_string();
        assert!(out.contains("compile_error"), "{}", out);
        assert!(out.contains("generic types"), "{}", out);
    }

    #[test]
    fn unknown_attribute() {
        let out = do_derive_describe(quote!(
            #[describe(implements(string))]
            struct Foo;
        )).to_string();
        assert!(out.contains("unsupported describe attribute"), "{}", out);
    }
}
