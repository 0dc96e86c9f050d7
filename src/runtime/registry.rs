use crate::runtime::cast::{CallError, FromValue, IntoCallResult, Variadic};
use crate::runtime::value::{Value, ValueType};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Declared parameters of a callable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Params {
    /// Exactly these positional parameter types.
    Fixed(Vec<ValueType>),
    /// Any number of arguments of one element type.
    Variadic(ValueType),
}

impl Params {
    /// Fixed arity, `None` for variadic.
    pub fn arity(&self) -> Option<usize> {
        match self {
            Self::Fixed(tys) => Some(tys.len()),
            Self::Variadic(_) => None,
        }
    }

    /// Declared type of the parameter at `index`.
    pub fn type_at(&self, index: usize) -> Option<ValueType> {
        match self {
            Self::Fixed(tys) => tys.get(index).copied(),
            Self::Variadic(ty) => Some(*ty),
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(tys) => {
                f.write_str("(")?;
                for (i, ty) in tys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                f.write_str(")")
            }
            Self::Variadic(ty) => write!(f, "({ty}...)"),
        }
    }
}

/// An invocable implementation.
///
/// Implement this directly for host types that carry state; plain closures are registered
/// through [`Registry::register`] instead.
pub trait Callable: Send + Sync {
    /// Declared parameters. Must not change after registration.
    fn params(&self) -> Params;

    /// Invoke with already evaluated, already adapted positional arguments.
    fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError>;
}

/// One registered implementation of a function name.
#[derive(Clone)]
pub struct Descriptor {
    name: String,
    params: Params,
    callable: Arc<dyn Callable>,
}

impl Descriptor {
    /// Wrap a callable under `name`, reading its parameters once.
    pub fn new(name: impl Into<String>, callable: impl Callable + 'static) -> Self {
        let params = callable.params();
        Self {
            name: name.into(),
            params,
            callable: Arc::new(callable),
        }
    }

    /// Function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameters captured at registration.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Fixed arity, `None` for variadic.
    pub fn arity(&self) -> Option<usize> {
        self.params.arity()
    }

    /// Call the implementation.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError> {
        self.callable.invoke(args)
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Function table consulted by the evaluator.
///
/// Built by the host before evaluation; the evaluator only borrows it, so it cannot change
/// while an evaluation is running.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    by_name: HashMap<String, Vec<Descriptor>>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure. Parameter types come from the closure's argument types.
    ///
    /// ```
    /// use compo::{Registry, Variadic};
    ///
    /// let mut reg = Registry::new();
    /// reg.register("add", |a: i32, b: i32| a + b)
    ///     .register_variadic("sum", |Variadic(xs): Variadic<i32>| xs.iter().sum::<i32>());
    /// assert_eq!(reg.lookup("add").len(), 1);
    /// ```
    pub fn register<Args, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: IntoCallable<Args>,
        Args: 'static,
    {
        self.register_callable(name, FnCallable::new(f))
    }

    /// Register a uniform-variadic closure taking every argument as one `T`.
    pub fn register_variadic<T, R, F>(&mut self, name: &str, f: F) -> &mut Self
    where
        F: Fn(Variadic<T>) -> R + Send + Sync + 'static,
        R: IntoCallResult,
        T: FromValue + 'static,
    {
        self.register_callable(
            name,
            VariadicFn {
                f,
                _elem: PhantomData,
            },
        )
    }

    /// Register a host [`Callable`].
    pub fn register_callable(&mut self, name: &str, callable: impl Callable + 'static) -> &mut Self {
        self.register_descriptor(Descriptor::new(name, callable))
    }

    /// Register a prepared descriptor under its own name.
    pub fn register_descriptor(&mut self, desc: Descriptor) -> &mut Self {
        tracing::trace!(name = desc.name(), params = %desc.params(), "register function");
        self.by_name
            .entry(desc.name.clone())
            .or_default()
            .push(desc);
        self
    }

    /// Every descriptor registered under `name`, in registration order.
    pub fn lookup(&self, name: &str) -> &[Descriptor] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `true` when at least one descriptor exists for `name`.
    pub fn contains(&self, name: &str) -> bool {
        !self.lookup(name).is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of descriptors.
    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Closures usable as callables. `Args` is a marker tuple of the parameter types.
pub trait IntoCallable<Args>: Send + Sync + 'static {
    /// Parameters derived from the closure signature.
    fn params() -> Params;

    /// Cast the arguments and call the closure.
    fn call(&self, args: Vec<Value>) -> Result<Value, CallError>;
}

struct FnCallable<F, Args> {
    f: F,
    _args: PhantomData<fn() -> Args>,
}

impl<F, Args> FnCallable<F, Args> {
    fn new(f: F) -> Self {
        Self {
            f,
            _args: PhantomData,
        }
    }
}

impl<F, Args> Callable for FnCallable<F, Args>
where
    F: IntoCallable<Args>,
    Args: 'static,
{
    fn params(&self) -> Params {
        F::params()
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError> {
        self.f.call(args)
    }
}

macro_rules! impl_into_callable {
    ($($ty:ident),*) => {
        impl<Func, Ret, $($ty,)*> IntoCallable<($($ty,)*)> for Func
        where
            Func: Fn($($ty),*) -> Ret + Send + Sync + 'static,
            Ret: IntoCallResult,
            $($ty: FromValue + 'static,)*
        {
            fn params() -> Params {
                Params::Fixed(vec![$($ty::TYPE),*])
            }

            #[allow(non_snake_case, unused_variables, unused_mut)]
            fn call(&self, args: Vec<Value>) -> Result<Value, CallError> {
                let expected = <[&str]>::len(&[$(stringify!($ty)),*]);
                let found = args.len();
                if found != expected {
                    return Err(CallError::Arity { expected, found });
                }
                let mut it = args.into_iter().enumerate();
                $(
                    let $ty = {
                        let (i, v) = it.next().ok_or(CallError::Arity { expected, found })?;
                        $ty::from_value(v).map_err(|e| e.at(i))?
                    };
                )*
                (self)($($ty),*).into_call_result()
            }
        }
    };
}

impl_into_callable!();
impl_into_callable!(A);
impl_into_callable!(A, B);
impl_into_callable!(A, B, C);
impl_into_callable!(A, B, C, D);

/// Uniform-variadic closure: every argument is cast to `T` and collected in order.
struct VariadicFn<F, T> {
    f: F,
    _elem: PhantomData<fn() -> T>,
}

impl<F, T, R> Callable for VariadicFn<F, T>
where
    F: Fn(Variadic<T>) -> R + Send + Sync + 'static,
    R: IntoCallResult,
    T: FromValue + 'static,
{
    fn params(&self) -> Params {
        Params::Variadic(T::TYPE)
    }

    fn invoke(&self, args: Vec<Value>) -> Result<Value, CallError> {
        let items = args
            .into_iter()
            .enumerate()
            .map(|(i, v)| T::from_value(v).map_err(|e| e.at(i)))
            .collect::<Result<Vec<T>, CallError>>()?;
        (self.f)(Variadic(items)).into_call_result()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/registry.rs"]
mod tests;
