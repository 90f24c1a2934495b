use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::engine::error::EngineError;
use crate::engine::scope::DynamicScope;
use crate::engine::value::Value;
use crate::host::caller::Caller;
use crate::host::script::CompiledScript;
use crate::workspace::cache::SourceStamp;
use crate::workspace::invocation::InvocationScope;
use crate::workspace::service::WorkspaceService;

/// A named, shared, long-lived binding scope.
///
/// A workspace is valid only while it is registered under its name in the
/// service; removal is a two-step handshake (mark removed, then unregister)
/// and a removed instance must not be re-registered.
pub struct Workspace {
    self_ref: Weak<Workspace>,
    name: String,
    service: Arc<WorkspaceService>,
    bindings: RwLock<HashMap<String, Value>>,
    // Latest compiled unit per file this workspace has run. This is the
    // strong referent that keeps shared cache entries alive; replacing it
    // after a recompile lets the superseded unit be reclaimed.
    units: Mutex<HashMap<PathBuf, Arc<dyn CompiledScript>>>,
    removed: AtomicBool,
}

impl Workspace {
    pub(crate) fn new(service: Arc<WorkspaceService>, name: String) -> Arc<Self> {
        Arc::new_cyclic(|me| Workspace {
            self_ref: me.clone(),
            name,
            service,
            bindings: RwLock::new(HashMap::new()),
            units: Mutex::new(HashMap::new()),
            removed: AtomicBool::new(false),
        })
    }

    fn shared(&self) -> Arc<Workspace> {
        self.self_ref.upgrade().expect("workspace dropped while in use")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service(&self) -> Arc<WorkspaceService> {
        self.service.clone()
    }

    pub fn binding(&self, name: &str) -> Option<Value> {
        self.bindings.read().get(name).cloned()
    }

    pub fn set_binding(&self, name: &str, value: Value) {
        self.bindings.write().insert(name.to_string(), value);
    }

    pub fn remove_binding(&self, name: &str) -> Option<Value> {
        self.bindings.write().remove(name)
    }

    pub fn is_removed(&self) -> bool {
        self.removed.load(Ordering::SeqCst)
    }

    /// Mark this workspace removed and unregister it from the service.
    pub fn remove(&self) -> Result<(), EngineError> {
        self.removed.store(true, Ordering::SeqCst);
        self.service.remove(self)
    }

    /// Run the autorun script for this workspace, if one exists. Returns the
    /// script result, with a null result collapsed to `None`.
    pub fn autorun(&self) -> Result<Option<Value>, EngineError> {
        let file = self.service.config().autorun_file(&self.name);
        if !file.is_file() {
            return Ok(None);
        }
        trace!(workspace = %self.name, "running autorun script");
        let result = self.execute_file(None, &file, HashMap::new())?;
        Ok(if result.is_null() { None } else { Some(result) })
    }

    /// Compile `path` (through the service's compiled-artifact cache) and run
    /// it in a fresh invocation scope against this workspace.
    pub fn execute_file(
        &self,
        caller: Option<Arc<Caller>>,
        path: &Path,
        bindings: HashMap<String, Value>,
    ) -> Result<Value, EngineError> {
        if !path.is_file() {
            return Err(EngineError::ScriptFileNotFound(path.to_path_buf()));
        }
        let stamp = SourceStamp::of(path)
            .map_err(|e| EngineError::Compile(format!("cannot stat {}: {}", path.display(), e)))?;
        let unit = match self.service.cache().get(&stamp) {
            Some(unit) => unit,
            None => {
                let unit = self.service.compiler().compile(path)?;
                self.service.cache().put(stamp, &unit);
                unit
            }
        };
        self.units.lock().insert(path.to_path_buf(), unit.clone());
        let scope = InvocationScope::new();
        scope.initialize(self.shared(), caller, bindings)?;
        unit.run(&scope)
    }
}

// The workspace's reflective surface takes part in method dispatch and in
// the write fan-out, not in property reads.
impl DynamicScope for Workspace {
    fn invoke_intrinsic(&self, name: &str, args: &[Value]) -> Option<Result<Value, EngineError>> {
        match name {
            "name" if args.is_empty() => Some(Ok(Value::Str(self.name.clone()))),
            _ => None,
        }
    }
}
