use std::collections::HashMap;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::{Mutex, RwLock};

use crate::engine::error::EngineError;
use crate::engine::resolve;
use crate::engine::scope::DynamicScope;
use crate::engine::value::Value;
use crate::host::caller::Caller;
use crate::host::scheduler::TaskHandle;
use crate::workspace::workspace::Workspace;

struct ScopeCore {
    workspace: Arc<Workspace>,
    caller: Arc<Caller>,
}

#[derive(Default)]
struct OutputState {
    buffer: String,
    pending: Option<TaskHandle>,
}

/// State local to one running script execution: the caller, the local
/// bindings, and the line-buffered output channel.
///
/// A scope is created unbound and bound to its workspace exactly once with
/// [`initialize`](InvocationScope::initialize); a second call fails. Using a
/// scope before initializing it is a bug in the embedder and panics. The
/// scope lives until the execution and any pending flush are done — the
/// scheduled flush task holds a strong reference, so dropping the script's
/// handle early cannot lose buffered output.
pub struct InvocationScope {
    self_ref: Weak<InvocationScope>,
    core: OnceLock<ScopeCore>,
    bindings: RwLock<HashMap<String, Value>>,
    out: Mutex<OutputState>,
}

impl InvocationScope {
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me| InvocationScope {
            self_ref: me.clone(),
            core: OnceLock::new(),
            bindings: RwLock::new(HashMap::new()),
            out: Mutex::new(OutputState::default()),
        })
    }

    /// Bind the scope to its workspace and caller and seed the local
    /// bindings. When `caller` is `None` the console caller is used.
    /// Fails with `AlreadyInitialized` on a second call.
    pub fn initialize(
        &self,
        workspace: Arc<Workspace>,
        caller: Option<Arc<Caller>>,
        bindings: HashMap<String, Value>,
    ) -> Result<(), EngineError> {
        let caller = caller.unwrap_or_else(|| workspace.service().callers().console_caller());
        let core = ScopeCore { workspace, caller };
        if self.core.set(core).is_err() {
            return Err(EngineError::AlreadyInitialized);
        }
        if !bindings.is_empty() {
            self.bindings.write().extend(bindings);
        }
        Ok(())
    }

    fn core(&self) -> &ScopeCore {
        self.core.get().expect("invocation scope used before initialize()")
    }

    pub fn workspace(&self) -> Arc<Workspace> {
        self.core().workspace.clone()
    }

    pub fn caller(&self) -> Arc<Caller> {
        self.core().caller.clone()
    }

    /// `sender@workspace`, used as the receiver name in missing-method errors.
    pub fn describe(&self) -> String {
        let core = self.core();
        format!("{}@{}", core.caller.sender().name(), core.workspace.name())
    }

    pub fn local_binding(&self, name: &str) -> Option<Value> {
        self.bindings.read().get(name).cloned()
    }

    pub fn set_local_binding(&self, name: &str, value: Value) {
        self.bindings.write().insert(name.to_string(), value);
    }

    pub fn remove_local_binding(&self, name: &str) -> Option<Value> {
        self.bindings.write().remove(name)
    }

    // ── Resolution entry points ──────────────────────────────────────

    pub fn get_property(&self, name: &str) -> Result<Value, EngineError> {
        resolve::resolve_property(self, name)
    }

    pub fn set_property(&self, name: &str, value: Value) {
        resolve::assign_property(self, name, value)
    }

    pub fn invoke_method(&self, name: &str, args: &[Value]) -> Result<Value, EngineError> {
        resolve::invoke_method(self, name, args)
    }

    // ── Output channel ───────────────────────────────────────────────

    /// Append text to the line buffer. Every line terminator delivers the
    /// buffered prefix as one message tagged with the workspace name. If no
    /// flush is pending afterwards, one is scheduled so a trailing
    /// unterminated write is still delivered.
    pub fn print(&self, text: &str) {
        let core = self.core();
        let mut out = self.out.lock();
        for c in text.chars() {
            if c == '\n' {
                core.caller.deliver(&out.buffer, core.workspace.name());
                out.buffer.clear();
            } else {
                out.buffer.push(c);
            }
        }
        if out.pending.is_none() {
            if let Some(me) = self.self_ref.upgrade() {
                let scheduler = core.workspace.service().scheduler();
                out.pending = Some(scheduler.schedule(Box::new(move || me.flush())));
            }
        }
    }

    /// Deliver `text` immediately as one message, prefixed by any buffered
    /// content. Consumes the buffer but leaves the pending-flush handle
    /// untouched.
    pub fn println(&self, text: &str) {
        let core = self.core();
        let mut out = self.out.lock();
        let line = if out.buffer.is_empty() {
            text.to_string()
        } else {
            let mut line = std::mem::replace(&mut out.buffer, String::new());
            line.push_str(text);
            line
        };
        core.caller.deliver(&line, core.workspace.name());
    }

    /// Deliver the buffer if non-empty, then reset both the buffer and the
    /// pending-flush handle. Safe to call when nothing is buffered.
    pub fn flush(&self) {
        let core = self.core();
        let mut out = self.out.lock();
        if !out.buffer.is_empty() {
            core.caller.deliver(&out.buffer, core.workspace.name());
        }
        out.pending = None;
        out.buffer.clear();
    }

    // ── Script files ─────────────────────────────────────────────────

    /// Run a named script from the scripts directory with positional
    /// arguments, exposed to the script as the `args` binding.
    pub fn run_script_file(&self, name: &str, args: Vec<Value>) -> Result<Value, EngineError> {
        let core = self.core();
        let file = core.workspace.service().config().script_file(name);
        let mut bindings = HashMap::new();
        bindings.insert("args".to_string(), Value::List(args));
        core.workspace.execute_file(Some(core.caller.clone()), &file, bindings)
    }

    fn run_intrinsic(&self, args: &[Value]) -> Result<Value, EngineError> {
        let name = match args.first() {
            Some(Value::Str(name)) => name.clone(),
            _ => return Err(EngineError::Script("run expects a script name".to_string())),
        };
        self.run_script_file(&name, args[1..].to_vec())
    }
}

fn render_args(args: &[Value]) -> String {
    args.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

impl DynamicScope for InvocationScope {
    fn get_intrinsic(&self, name: &str) -> Option<Value> {
        match name {
            "_" => Some(self.core().caller.last_result()),
            "workspace" => Some(Value::Str(self.core().workspace.name().to_string())),
            _ => None,
        }
    }

    fn set_intrinsic(&self, name: &str, value: &Value) -> bool {
        match name {
            "_" => {
                self.core().caller.set_last_result(value.clone());
                true
            }
            _ => false,
        }
    }

    fn invoke_intrinsic(&self, name: &str, args: &[Value]) -> Option<Result<Value, EngineError>> {
        match name {
            "print" => {
                self.print(&render_args(args));
                Some(Ok(Value::Null))
            }
            "println" => {
                self.println(&render_args(args));
                Some(Ok(Value::Null))
            }
            "flush" => {
                self.flush();
                Some(Ok(Value::Null))
            }
            "run" => Some(self.run_intrinsic(args)),
            _ => None,
        }
    }
}
