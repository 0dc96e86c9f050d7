use crate::ast::Node;
use crate::foundation::error::{CompoError, CompoResult};
use crate::runtime::{EvalOptions, Evaluator, Registry, Value};
use crate::serialize::{AstSerializer, SerializerOpts};
use crate::syntax::{ParseOptions, Parser};
use std::sync::{Arc, OnceLock};

/// Options for every stage, loadable from JSON. Absent fields take their defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Parser options.
    pub parse: ParseOptions,
    /// Evaluator options.
    pub eval: EvalOptions,
    /// Serializer options.
    pub serializer: SerializerOpts,
}

impl EngineConfig {
    /// Load a configuration document.
    pub fn from_json_str(text: &str) -> CompoResult<Self> {
        serde_json::from_str(text).map_err(|e| CompoError::config(e.to_string()))
    }
}

/// Host-facing bundle of a registry and configuration.
///
/// Registration happens through [`Engine::registry_mut`] before evaluating; evaluation borrows
/// the registry immutably, so the two cannot interleave.
///
/// When parallel batches ask for a dedicated pool size, the pool is built on first use and
/// shared by every later batch (and by clones of the engine).
#[derive(Clone, Debug, Default)]
pub struct Engine {
    registry: Registry,
    config: EngineConfig,
    pool: OnceLock<Option<Arc<rayon::ThreadPool>>>,
}

impl Engine {
    /// Engine over `registry` with default configuration.
    pub fn new(registry: Registry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    /// Engine over `registry` with explicit configuration.
    pub fn with_config(registry: Registry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            pool: OnceLock::new(),
        }
    }

    /// Engine preloaded with the built-in function library.
    pub fn with_std() -> Self {
        Self::new(Registry::with_std())
    }

    /// Configuration in effect.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Function registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Function registry, for registration.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Parser configured by this engine.
    pub fn parser(&self) -> Parser {
        Parser::with_opts(self.config.parse)
    }

    /// Evaluator over this engine's registry.
    pub fn evaluator(&self) -> Evaluator<'_> {
        let evaluator = Evaluator::with_opts(&self.registry, self.config.eval);
        match self.pool() {
            Some(pool) => evaluator.with_pool(pool),
            None => evaluator,
        }
    }

    fn pool(&self) -> Option<&rayon::ThreadPool> {
        let eval = self.config.eval;
        let threads = eval.threads.filter(|_| eval.parallel)?;
        self.pool.get_or_init(|| build_pool(threads)).as_deref()
    }

    /// Serializer configured by this engine.
    pub fn serializer(&self) -> AstSerializer {
        AstSerializer::with_opts(self.config.serializer)
    }

    /// Parse expression text.
    pub fn parse(&self, src: &str) -> CompoResult<Node> {
        Ok(self.parser().parse(src)?)
    }

    /// Evaluate a parsed tree.
    pub fn evaluate(&self, node: &Node) -> CompoResult<Value> {
        Ok(self.evaluator().evaluate(node)?)
    }

    /// Parse and evaluate in one step.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn eval_str(&self, src: &str) -> CompoResult<Value> {
        let node = self.parse(src)?;
        self.evaluate(&node)
    }

    /// Parse every expression, then evaluate them as one batch.
    ///
    /// Fails on the first parse error; evaluation results are reported per expression.
    pub fn eval_batch<S: AsRef<str>>(&self, sources: &[S]) -> CompoResult<Vec<CompoResult<Value>>> {
        let nodes = sources
            .iter()
            .map(|s| self.parse(s.as_ref()))
            .collect::<CompoResult<Vec<_>>>()?;
        Ok(self
            .evaluator()
            .evaluate_batch(&nodes)
            .into_iter()
            .map(|r| r.map_err(CompoError::from))
            .collect())
    }

    /// Serialize a tree with the configured output style.
    pub fn encode(&self, node: &Node) -> CompoResult<String> {
        Ok(self.serializer().serialize(node)?)
    }

    /// Deserialize a tree.
    pub fn decode(&self, text: &str) -> CompoResult<Node> {
        Ok(self.serializer().deserialize(text)?)
    }
}

fn build_pool(threads: usize) -> Option<Arc<rayon::ThreadPool>> {
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
    {
        Ok(pool) => {
            tracing::debug!(threads, "built evaluation pool");
            Some(Arc::new(pool))
        }
        Err(err) => {
            tracing::warn!(%err, threads, "failed to build evaluation pool, using global pool");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/engine.rs"]
mod tests;
