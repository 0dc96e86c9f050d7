//! Built-in function library.
//!
//! Nothing is registered unless the host asks for it, either through [`register_std`] or
//! [`Registry::with_std`](crate::Registry::with_std).

mod conversion;
mod logical;
mod math;
mod string;

use crate::runtime::Registry;

/// Register every built-in function into `registry`.
pub fn register_std(registry: &mut Registry) {
    math::register(registry);
    string::register(registry);
    logical::register(registry);
    conversion::register(registry);
    tracing::debug!(descriptors = registry.len(), "standard library registered");
}

impl Registry {
    /// Registry preloaded with the built-in function library.
    pub fn with_std() -> Self {
        let mut registry = Self::new();
        register_std(&mut registry);
        registry
    }
}
