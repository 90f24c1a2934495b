//! Plugin resolver trait for dynamic resolution of names the fixed scope
//! layers do not know about.
//!
//! Plugins implement `PluginResolver` to extend property and method
//! resolution. Resolvers are queried in registration order; the first one
//! that answers wins.

use crate::engine::error::EngineError;
use crate::engine::value::Value;
use crate::workspace::invocation::InvocationScope;

/// A pluggable resolver consulted after the scope chain itself has no match.
///
/// Each capability returns:
/// - `None` — the decline sentinel: "not mine, try the next plugin". Never
///   surfaced to script code.
/// - `Some(Ok(value))` — resolved; the chain stops here.
/// - `Some(Err(e))` — a real failure; it aborts the entire outer resolution
///   and propagates unchanged, it is never treated as a decline.
///
/// Both capabilities default to declining, so a plugin may implement only
/// the one it cares about.
pub trait PluginResolver: Send + Sync {
    /// Human-readable name for this resolver (for logging).
    fn name(&self) -> &str;

    /// Resolve a property read that every fixed layer missed.
    fn resolve_property(&self, _scope: &InvocationScope, _name: &str) -> Option<Result<Value, EngineError>> {
        None
    }

    /// Resolve a method invocation on behalf of the scope.
    fn resolve_invocation(
        &self,
        _scope: &InvocationScope,
        _name: &str,
        _args: &[Value],
    ) -> Option<Result<Value, EngineError>> {
        None
    }
}
