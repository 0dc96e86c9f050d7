use crate::ast::{AccessNode, FunctionNode, Node};
use crate::runtime::cast::CallError;
use crate::runtime::registry::Registry;
use crate::runtime::resolve;
use crate::runtime::value::Value;
use rayon::prelude::*;

/// Evaluation failure. Evaluation stops at the first error.
#[derive(thiserror::Error, Debug)]
pub enum EvalError {
    /// No descriptor is registered under the name.
    #[error("unknown function '{name}'")]
    UnknownFunction {
        /// Function name as written.
        name: String,
    },

    /// Several descriptors exist but none fits the arguments.
    #[error("no overload of '{name}' accepts {arg_count} argument(s)")]
    UnresolvedOverload {
        /// Function name as written.
        name: String,
        /// Number of evaluated arguments.
        arg_count: usize,
    },

    /// Plain access on a null value.
    #[error("cannot access into null result of {node}")]
    NullAccess {
        /// Rendered target expression.
        node: String,
    },

    /// String key absent from a map.
    #[error("key '{key}' not found")]
    KeyNotFound {
        /// Requested key.
        key: String,
    },

    /// List position outside `0..length`.
    #[error("index {index} out of range for list of length {length}")]
    IndexOutOfRange {
        /// Requested position.
        index: i32,
        /// List length.
        length: usize,
    },

    /// Access target and index do not form a valid pair.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        /// What the access needed.
        expected: String,
        /// What it got.
        actual: String,
    },

    /// The selected callable failed.
    #[error("call to '{name}' failed: {source}")]
    Invocation {
        /// Function name as written.
        name: String,
        /// Failure reported by the callable.
        #[source]
        source: CallError,
    },
}

/// What a null-conditional access (`?[..]`) suppresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullConditional {
    /// Only a null target yields null; a missing key is still an error.
    TargetOnly,
    /// A null target, a missing key, or a target that cannot be indexed all yield null.
    #[default]
    Lenient,
}

/// Evaluator configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EvalOptions {
    /// Semantics of `?[..]` and `?.member`.
    pub null_conditional: NullConditional,
    /// Evaluate batches on the rayon pool.
    pub parallel: bool,
    /// Size of the dedicated pool an [`Engine`](crate::Engine) builds once for parallel
    /// batches; `None` uses the global pool.
    pub threads: Option<usize>,
}

/// Tree-walking evaluator over a borrowed registry.
///
/// The registry cannot be modified while an evaluator holds it.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'r> {
    registry: &'r Registry,
    opts: EvalOptions,
    pool: Option<&'r rayon::ThreadPool>,
}

impl<'r> Evaluator<'r> {
    /// Evaluator with default options.
    pub fn new(registry: &'r Registry) -> Self {
        Self::with_opts(registry, EvalOptions::default())
    }

    /// Evaluator with explicit options.
    pub fn with_opts(registry: &'r Registry, opts: EvalOptions) -> Self {
        Self {
            registry,
            opts,
            pool: None,
        }
    }

    /// Run parallel batches on `pool` instead of the global pool.
    pub fn with_pool(mut self, pool: &'r rayon::ThreadPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Options in effect.
    pub fn opts(&self) -> EvalOptions {
        self.opts
    }

    /// Evaluate one tree.
    #[tracing::instrument(level = "debug", skip(self, node), fields(nodes = node.node_count()))]
    pub fn evaluate(&self, node: &Node) -> Result<Value, EvalError> {
        self.eval_node(node)
    }

    /// Evaluate independent trees, returning results in input order.
    ///
    /// With [`EvalOptions::parallel`] the trees are spread over rayon workers, on the pool
    /// attached with [`Evaluator::with_pool`] or else the global pool.
    pub fn evaluate_batch(&self, nodes: &[Node]) -> Vec<Result<Value, EvalError>> {
        if !self.opts.parallel || nodes.len() < 2 {
            return nodes.iter().map(|n| self.evaluate(n)).collect();
        }
        let run = || -> Vec<Result<Value, EvalError>> {
            nodes.par_iter().map(|n| self.evaluate(n)).collect()
        };
        match self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    fn eval_node(&self, node: &Node) -> Result<Value, EvalError> {
        match node {
            Node::Value(lit) => Ok(Value::from(lit)),
            Node::Function(call) => self.eval_call(call),
            Node::Access(access) => self.eval_access(access),
        }
    }

    fn eval_call(&self, call: &FunctionNode) -> Result<Value, EvalError> {
        let name = call.name();
        let args = call
            .arguments()
            .iter()
            .map(|a| self.eval_node(a))
            .collect::<Result<Vec<_>, _>>()?;

        let candidates = self.registry.lookup(name);
        if candidates.is_empty() {
            return Err(EvalError::UnknownFunction {
                name: name.to_owned(),
            });
        }
        let Some(desc) = resolve::select(candidates, &args) else {
            return Err(EvalError::UnresolvedOverload {
                name: name.to_owned(),
                arg_count: args.len(),
            });
        };

        let args = resolve::adapt(desc, args);
        tracing::trace!(name, params = %desc.params(), "invoke");
        desc.invoke(args).map_err(|source| EvalError::Invocation {
            name: name.to_owned(),
            source,
        })
    }

    fn eval_access(&self, access: &AccessNode) -> Result<Value, EvalError> {
        let nulled = access.nulled();
        let target = self.eval_node(access.target())?;
        if target.is_null() {
            return if nulled {
                Ok(Value::Null)
            } else {
                Err(EvalError::NullAccess {
                    node: access.target().to_string(),
                })
            };
        }

        let index = self.eval_node(access.index())?;
        let lenient = nulled && self.opts.null_conditional == NullConditional::Lenient;
        match index_into(target, index) {
            Err(EvalError::KeyNotFound { .. } | EvalError::TypeMismatch { .. }) if lenient => {
                Ok(Value::Null)
            }
            other => other,
        }
    }
}

fn index_into(target: Value, index: Value) -> Result<Value, EvalError> {
    match (target, index) {
        (Value::Map(mut map), Value::String(key)) => match map.swap_remove(&key) {
            Some(v) => Ok(v),
            None => Err(EvalError::KeyNotFound { key }),
        },
        (Value::List(mut items), Value::Int(i)) => {
            let length = items.len();
            match usize::try_from(i).ok().filter(|&at| at < length) {
                Some(at) => Ok(items.swap_remove(at)),
                None => Err(EvalError::IndexOutOfRange { index: i, length }),
            }
        }
        (target, Value::String(_)) => Err(EvalError::TypeMismatch {
            expected: "map".to_owned(),
            actual: target.kind().to_owned(),
        }),
        (target, Value::Int(_)) => Err(EvalError::TypeMismatch {
            expected: "list".to_owned(),
            actual: target.kind().to_owned(),
        }),
        (_, index) => Err(EvalError::TypeMismatch {
            expected: "string or int index".to_owned(),
            actual: index.kind().to_owned(),
        }),
    }
}

/// Evaluate `node` against `registry` with default options.
pub fn evaluate(node: &Node, registry: &Registry) -> Result<Value, EvalError> {
    Evaluator::new(registry).evaluate(node)
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/evaluator.rs"]
mod tests;
