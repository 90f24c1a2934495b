use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::engine::error::EngineError;
use crate::engine::plugin::resolver::PluginResolver;
use crate::engine::value::Value;
use crate::workspace::invocation::InvocationScope;

/// Ordered chain of plugin resolvers, shared by every workspace.
///
/// Registration order is priority order. A walk stops at the first resolver
/// that does not decline; a resolver that fails with a real error aborts the
/// walk and the error propagates to the caller of the resolution.
pub struct PluginChain {
    resolvers: RwLock<Vec<Arc<dyn PluginResolver>>>,
}

impl PluginChain {
    pub fn new() -> Self {
        PluginChain {
            resolvers: RwLock::new(Vec::new()),
        }
    }

    /// Append a resolver to the end of the chain.
    pub fn register(&self, resolver: Arc<dyn PluginResolver>) {
        debug!(plugin = resolver.name(), "registered plugin resolver");
        self.resolvers.write().push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }

    /// Walk the chain for a property read. `None` means every plugin declined.
    pub fn resolve_property(&self, scope: &InvocationScope, name: &str) -> Option<Result<Value, EngineError>> {
        for resolver in self.snapshot() {
            if let Some(found) = resolver.resolve_property(scope, name) {
                return Some(found);
            }
        }
        None
    }

    /// Walk the chain for a method invocation. `None` means every plugin declined.
    pub fn resolve_invocation(
        &self,
        scope: &InvocationScope,
        name: &str,
        args: &[Value],
    ) -> Option<Result<Value, EngineError>> {
        for resolver in self.snapshot() {
            if let Some(found) = resolver.resolve_invocation(scope, name, args) {
                return Some(found);
            }
        }
        None
    }

    // Plugins may themselves resolve through the engine, so the lock must
    // not be held while a resolver runs.
    fn snapshot(&self) -> Vec<Arc<dyn PluginResolver>> {
        self.resolvers.read().clone()
    }
}

impl Default for PluginChain {
    fn default() -> Self {
        Self::new()
    }
}
