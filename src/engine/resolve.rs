//! The ordered resolution chain.
//!
//! Reads and invocations are first-match-wins across the fixed layer order;
//! writes fan out to every layer's intrinsic setter and always finish by
//! storing into the workspace bindings. See the operation docs for the exact
//! step lists.

use crate::engine::error::EngineError;
use crate::engine::scope::DynamicScope;
use crate::engine::value::Value;
use crate::workspace::invocation::InvocationScope;

/// Resolve a property read.
///
/// Order: scope intrinsic → scope bindings → workspace bindings → global
/// bindings → plugin chain. A plugin decline moves to the next plugin; a
/// plugin error aborts the read. Exhaustion fails with `PropertyNotFound`.
pub fn resolve_property(scope: &InvocationScope, name: &str) -> Result<Value, EngineError> {
    if let Some(value) = scope.get_intrinsic(name) {
        return Ok(value);
    }
    if let Some(value) = scope.local_binding(name) {
        return Ok(value);
    }
    let workspace = scope.workspace();
    if let Some(value) = workspace.binding(name) {
        return Ok(value);
    }
    let service = workspace.service();
    if let Some(value) = service.global(name) {
        return Ok(value);
    }
    if let Some(found) = service.plugins().resolve_property(scope, name) {
        return found;
    }
    Err(EngineError::PropertyNotFound(name.to_string()))
}

/// Assign a property.
///
/// Unlike reads, writes do not stop at the first hit: the scope, workspace
/// and service intrinsic setters are each attempted regardless of the
/// others' outcome, and the value is always stored into the workspace
/// bindings afterwards. A write can therefore update an intrinsic slot and
/// shadow it with a binding at the same time.
pub fn assign_property(scope: &InvocationScope, name: &str, value: Value) {
    let workspace = scope.workspace();
    let service = workspace.service();
    scope.set_intrinsic(name, &value);
    workspace.set_intrinsic(name, &value);
    service.set_intrinsic(name, &value);
    workspace.set_binding(name, value);
}

/// Resolve and call a method.
///
/// Order: scope intrinsic method → workspace intrinsic method → callable
/// bound in the scope → plugin chain → callable bound in the workspace →
/// callable bound in the globals. A non-callable value bound under `name`
/// does not satisfy the lookup; that layer is skipped, not failed.
/// Exhaustion fails with `MethodNotFound`.
pub fn invoke_method(scope: &InvocationScope, name: &str, args: &[Value]) -> Result<Value, EngineError> {
    if let Some(found) = scope.invoke_intrinsic(name, args) {
        return found;
    }
    let workspace = scope.workspace();
    if let Some(found) = workspace.invoke_intrinsic(name, args) {
        return found;
    }
    if let Some(Value::Callable(f)) = scope.local_binding(name) {
        return f.call(args);
    }
    let service = workspace.service();
    if let Some(found) = service.plugins().resolve_invocation(scope, name, args) {
        return found;
    }
    if let Some(Value::Callable(f)) = workspace.binding(name) {
        return f.call(args);
    }
    if let Some(Value::Callable(f)) = service.global(name) {
        return f.call(args);
    }
    Err(EngineError::missing_method(scope.describe(), name, args))
}
