//! Typed tests: one test template instantiated once per type of a list.
//!
//! A template is any type `C` implementing [`TypedCase<T>`] for every `T` it
//! is used with. A tuple of types implements [`TypeList<C>`] and turns the
//! compile-time list into a flat run of [`TypeDescriptor`]s terminated by
//! [`TypeDescriptor::End`]. [`expand`] then registers one suite per
//! descriptor, named `[index] suite<type>`.
//!
//! ```rust
//! use testharness::{SilentReporter, TestBody, TestContext, TestResult, Tester, TypedCase};
//!
//! struct DefaultIsZero;
//!
//! impl<T> TypedCase<T> for DefaultIsZero
//! where
//!     T: Default + PartialEq + From<u8> + std::fmt::Debug + 'static,
//! {
//!     fn instantiate() -> Box<dyn TestBody> {
//!         Box::new(|ctx: &mut TestContext| -> TestResult {
//!             ctx.require_eq(T::default(), T::from(0), "T::default(), T::from(0)")
//!         })
//!     }
//! }
//!
//! let mut tester = Tester::new().with_reporter(SilentReporter);
//! let added = tester.register_typed::<DefaultIsZero, (u8, u32, i64)>("zero", "default")?;
//! assert_eq!(added, 3);
//! assert_eq!(tester.run_all().exit_code(), 0);
//! # Ok::<(), testharness::HarnessError>(())
//! ```

use std::any::type_name;
use std::fmt;

use crate::body::TestBody;
use crate::error::{HarnessError, Result};
use crate::tester::Tester;

/// A test template instantiable for type `T`
pub trait TypedCase<T: ?Sized> {
    /// Build the body of this template for `T`
    fn instantiate() -> Box<dyn TestBody>;
}

/// Factory producing one instantiation of a typed test
pub type Instantiate = fn() -> Box<dyn TestBody>;

/// One element of an expanded type list
#[derive(Clone)]
pub enum TypeDescriptor {
    Type { name: String, instantiate: Instantiate },
    /// Terminates the list; nothing after it is processed
    End,
}

impl TypeDescriptor {
    /// Descriptor for template `C` instantiated with `T`
    pub fn of<C, T>() -> Self
    where
        C: TypedCase<T>,
        T: ?Sized + 'static,
    {
        Self::Type {
            name: short_type_name(type_name::<T>()),
            instantiate: <C as TypedCase<T>>::instantiate,
        }
    }

    pub fn new<S: Into<String>>(name: S, instantiate: Instantiate) -> Self {
        Self::Type {
            name: name.into(),
            instantiate,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type { name, .. } => f.debug_tuple("Type").field(name).finish(),
            Self::End => f.write_str("End"),
        }
    }
}

/// A compile-time list of types usable with template `C`
pub trait TypeList<C> {
    /// Descriptors for every listed type, followed by `TypeDescriptor::End`
    fn descriptors() -> Vec<TypeDescriptor>;
}

impl<C> TypeList<C> for () {
    fn descriptors() -> Vec<TypeDescriptor> {
        vec![TypeDescriptor::End]
    }
}

macro_rules! impl_type_list {
    ($($ty:ident),+) => {
        impl<C, $($ty),+> TypeList<C> for ($($ty,)+)
        where
            $(C: TypedCase<$ty>, $ty: 'static,)+
        {
            fn descriptors() -> Vec<TypeDescriptor> {
                vec![$(TypeDescriptor::of::<C, $ty>(),)+ TypeDescriptor::End]
            }
        }
    };
}

impl_type_list!(T1);
impl_type_list!(T1, T2);
impl_type_list!(T1, T2, T3);
impl_type_list!(T1, T2, T3, T4);
impl_type_list!(T1, T2, T3, T4, T5);
impl_type_list!(T1, T2, T3, T4, T5, T6);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14);
impl_type_list!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12, T13, T14, T15);

/// Suite name of the instantiation at `index`
pub fn typed_suite_name(index: usize, suite: &str, type_name: &str) -> String {
    format!("[{index}] {suite}<{type_name}>")
}

/// Register one suite per descriptor, walking from index 0 until
/// [`TypeDescriptor::End`]. A slice without the sentinel is processed to its
/// last element. Returns the number of suites registered.
pub fn expand(
    tester: &mut Tester,
    suite: &str,
    test: &str,
    descriptors: &[TypeDescriptor],
) -> Result<usize> {
    for (index, descriptor) in descriptors.iter().enumerate() {
        let TypeDescriptor::Type { name, instantiate } = descriptor else {
            return Ok(index);
        };

        let suite_name = typed_suite_name(index, suite, name);
        if !tester.register_boxed(&suite_name, test.to_owned(), instantiate()) {
            tracing::warn!(suite = %suite_name, test, "typed expansion aborted");
            return Err(HarnessError::Registration {
                suite: suite_name,
                test: test.to_owned(),
            });
        }
    }
    Ok(descriptors.len())
}

/// Strip module paths from a fully qualified type name, keeping generic
/// structure: `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name(full: &str) -> String {
    let mut short = String::with_capacity(full.len());
    let mut path = String::new();

    for ch in full.chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == ':' {
            path.push(ch);
        } else {
            flush_segment(&mut short, &mut path);
            short.push(ch);
        }
    }
    flush_segment(&mut short, &mut path);
    short
}

fn flush_segment(short: &mut String, path: &mut String) {
    if let Some(last) = path.rsplit("::").next() {
        short.push_str(last);
    }
    path.clear();
}
