//! Runtime values, the callable registry and the evaluator.

mod cast;
mod evaluator;
mod registry;
mod resolve;
mod value;

pub use cast::{CallError, CastError, FromValue, IntoCallResult, IntoValue, Variadic};
pub use evaluator::{EvalError, EvalOptions, Evaluator, NullConditional, evaluate};
pub use registry::{Callable, Descriptor, IntoCallable, Params, Registry};
pub use value::{Fit, Value, ValueType};
