use crate::engine::error::EngineError;
use crate::engine::value::Value;

/// Intrinsic (computed) surface of one resolution layer.
///
/// The invocation scope, the workspace and the workspace service each expose
/// a fixed set of built-in properties and methods alongside their mutable
/// bindings. The resolution chain consults these through this trait, in the
/// fixed layer order, instead of any runtime reflection.
///
/// All capabilities are optional: a layer with no intrinsic slot for a name
/// simply reports a miss and the chain moves on.
pub trait DynamicScope {
    /// Read an intrinsic property, if this layer models one under `name`.
    /// Only the invocation scope's readable intrinsics participate in
    /// property reads; the other layers contribute their bindings instead.
    fn get_intrinsic(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Write an intrinsic slot. Returns `true` only if a writable slot named
    /// `name` exists on this layer; the chain never short-circuits on it.
    fn set_intrinsic(&self, _name: &str, _value: &Value) -> bool {
        false
    }

    /// Invoke an intrinsic method. `None` means this layer has no method
    /// under `name` and the chain continues to the next step.
    fn invoke_intrinsic(&self, _name: &str, _args: &[Value]) -> Option<Result<Value, EngineError>> {
        None
    }
}
