//! Compo is an embeddable expression language.
//!
//! Expressions look like `@name(arg, arg, ...)`: function calls with literal or nested-call
//! arguments, followed by an optional chain of indexed and member accesses
//! (`@data()['user'].name`, `@data()?['email']`).
//!
//! # Pipeline
//!
//! 1. **Parse**: text -> [`Node`] tree ([`parse`], [`Parser`]); failures are returned as
//!    [`ParseError`] values, never panics.
//! 2. **Evaluate**: [`Node`] + [`Registry`] -> [`Value`] ([`evaluate`], [`Evaluator`]), with
//!    overload resolution among the callables registered under one name.
//! 3. **Serialize** (optional): [`Node`] <-> tagged JSON ([`AstSerializer`], [`encode`],
//!    [`decode`]) for storage or transport.
//!
//! [`Engine`] bundles a registry and configuration for hosts that want one entry point.
//!
//! ```
//! use compo::{Registry, Value, evaluate, parse};
//!
//! let mut registry = Registry::new();
//! registry.register("add", |a: i32, b: i32| a + b);
//!
//! let node = parse("@add(1, 2)").unwrap();
//! assert_eq!(evaluate(&node, &registry).unwrap(), Value::Int(3));
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod ast;
mod engine;
mod foundation;
mod runtime;
mod serialize;
mod stdlib;
mod syntax;

pub use crate::ast::{AccessNode, AstFingerprint, FunctionNode, Literal, Node};
pub use crate::engine::{Engine, EngineConfig};
pub use crate::foundation::error::{CompoError, CompoResult};
pub use crate::runtime::{
    CallError, Callable, CastError, Descriptor, EvalError, EvalOptions, Evaluator, Fit, FromValue,
    IntoCallResult, IntoCallable, IntoValue, NullConditional, Params, Registry, Value, ValueType,
    Variadic, evaluate,
};
pub use crate::serialize::{AstSerializer, FormatError, SerializerOpts, decode, encode};
pub use crate::stdlib::register_std;
pub use crate::syntax::{ParseError, ParseOptions, ParseOutcome, Parser, parse};
