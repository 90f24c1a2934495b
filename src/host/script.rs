use std::path::Path;
use std::sync::Arc;

use crate::engine::error::EngineError;
use crate::engine::value::Value;
use crate::workspace::invocation::InvocationScope;

/// A compiled script unit produced by the host's compiler.
///
/// Units are shared: the compiled-artifact cache hands out the same unit to
/// every workspace running an unchanged file.
pub trait CompiledScript: Send + Sync {
    /// Run the unit against an initialized invocation scope.
    fn run(&self, scope: &Arc<InvocationScope>) -> Result<Value, EngineError>;
}

/// The script-language compiler, owned by the host.
pub trait ScriptCompiler: Send + Sync {
    fn compile(&self, path: &Path) -> Result<Arc<dyn CompiledScript>, EngineError>;
}

/// Startup-only package scanner used to build the import table.
pub trait ClassScanner: Send + Sync {
    /// Fully-qualified names of the classes in `package`.
    fn list_class_names(&self, package: &str, recursive: bool) -> Vec<String>;
}
