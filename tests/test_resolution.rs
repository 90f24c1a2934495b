//! Resolution chain ordering: reads, write fan-out, invocation dispatch and
//! the plugin decline protocol.


use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use host_util::host;
use varspace::engine::error::EngineError;
use varspace::engine::plugin::PluginResolver;
use varspace::engine::value::{Callable, Value};
use varspace::workspace::invocation::InvocationScope;

fn callable_returning(text: &str) -> Value {
    let text = text.to_string();
    Value::Callable(Callable::from_fn(move |_args| Ok(Value::Str(text.clone()))))
}

// ── Property reads ───────────────────────────────────────────────────

#[test]
fn test_read_prefers_invocation_then_workspace_then_global() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");
    let workspace = scope.workspace();

    scope.set_local_binding("who", Value::Str("local".to_string()));
    workspace.set_binding("who", Value::Str("workspace".to_string()));
    host.service.set_global("who", Value::Str("global".to_string()));

    assert_eq!(scope.get_property("who").unwrap(), Value::Str("local".to_string()));

    scope.remove_local_binding("who");
    assert_eq!(scope.get_property("who").unwrap(), Value::Str("workspace".to_string()));

    workspace.remove_binding("who");
    assert_eq!(scope.get_property("who").unwrap(), Value::Str("global".to_string()));

    host.service.remove_global("who");
    assert!(matches!(
        scope.get_property("who"),
        Err(EngineError::PropertyNotFound(_))
    ));
}

#[test]
fn test_read_exhaustion_names_the_identifier() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    let err = scope.get_property("ghost").unwrap_err();
    match &err {
        EngineError::PropertyNotFound(name) => assert_eq!(name, "ghost"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_read_intrinsics_come_first() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.caller().set_last_result(Value::Int(41));
    // A workspace binding under the same name must not shadow the intrinsic.
    scope.workspace().set_binding("_", Value::Int(0));
    assert_eq!(scope.get_property("_").unwrap(), Value::Int(41));

    assert_eq!(
        scope.get_property("workspace").unwrap(),
        Value::Str("main".to_string())
    );
}

// ── Property writes ──────────────────────────────────────────────────

#[test]
fn test_write_always_lands_in_workspace_bindings() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.set_property("fresh", Value::Int(1));

    assert_eq!(scope.workspace().binding("fresh"), Some(Value::Int(1)));
    assert_eq!(scope.local_binding("fresh"), None);
    assert_eq!(host.service.global("fresh"), None);
}

#[test]
fn test_write_updates_intrinsic_slot_and_still_shadows() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.set_property("_", Value::Int(9));

    // The intrinsic slot took the write...
    assert_eq!(scope.caller().last_result(), Value::Int(9));
    // ...and the fan-out still stored a workspace binding on top of it.
    assert_eq!(scope.workspace().binding("_"), Some(Value::Int(9)));
}

// ── Method invocation ────────────────────────────────────────────────

#[test]
fn test_invoke_skips_non_callable_layer() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.set_local_binding("f", Value::Int(1));
    scope.workspace().set_binding("f", callable_returning("workspace"));

    assert_eq!(
        scope.invoke_method("f", &[]).unwrap(),
        Value::Str("workspace".to_string())
    );
}

#[test]
fn test_invoke_prefers_local_callable() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.set_local_binding("f", callable_returning("local"));
    scope.workspace().set_binding("f", callable_returning("workspace"));
    host.service.set_global("f", callable_returning("global"));

    assert_eq!(scope.invoke_method("f", &[]).unwrap(), Value::Str("local".to_string()));
}

#[test]
fn test_invoke_workspace_intrinsic_beats_local_binding() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    // The workspace's own `name()` method is dispatched before any bound
    // callable is considered.
    scope.set_local_binding("name", callable_returning("shadow"));
    assert_eq!(
        scope.invoke_method("name", &[]).unwrap(),
        Value::Str("main".to_string())
    );
}

#[test]
fn test_invoke_falls_back_to_global_callable() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    host.service.set_global("f", callable_returning("global"));

    assert_eq!(scope.invoke_method("f", &[]).unwrap(), Value::Str("global".to_string()));
}

#[test]
fn test_invoke_passes_arguments() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    scope.set_local_binding(
        "sum",
        Value::Callable(Callable::from_fn(|args| {
            let mut total = 0;
            for arg in args {
                match arg {
                    Value::Int(i) => total += i,
                    other => return Err(EngineError::Script(format!("not an int: {}", other))),
                }
            }
            Ok(Value::Int(total))
        })),
    );

    assert_eq!(
        scope.invoke_method("sum", &[Value::Int(2), Value::Int(3)]).unwrap(),
        Value::Int(5)
    );
}

#[test]
fn test_invoke_exhaustion_names_receiver_and_shape() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");

    let err = scope
        .invoke_method("frob", &[Value::Int(1), Value::Str("x".to_string())])
        .unwrap_err();
    assert_eq!(err.to_string(), "no such method: steve@main.frob(int, string)");
}

// ── Plugin chain ─────────────────────────────────────────────────────

struct ProvidingPlugin {
    tag: String,
    provides: String,
    value: Value,
    log: Arc<Mutex<Vec<String>>>,
}

impl PluginResolver for ProvidingPlugin {
    fn name(&self) -> &str {
        &self.tag
    }

    fn resolve_property(&self, _scope: &InvocationScope, name: &str) -> Option<Result<Value, EngineError>> {
        self.log.lock().push(self.tag.clone());
        if name == self.provides {
            Some(Ok(self.value.clone()))
        } else {
            None
        }
    }

    fn resolve_invocation(
        &self,
        _scope: &InvocationScope,
        name: &str,
        _args: &[Value],
    ) -> Option<Result<Value, EngineError>> {
        self.log.lock().push(self.tag.clone());
        if name == self.provides {
            Some(Ok(self.value.clone()))
        } else {
            None
        }
    }
}

struct FailingPlugin {
    log: Arc<Mutex<Vec<String>>>,
}

impl PluginResolver for FailingPlugin {
    fn name(&self) -> &str {
        "failing"
    }

    fn resolve_property(&self, _scope: &InvocationScope, _name: &str) -> Option<Result<Value, EngineError>> {
        self.log.lock().push("failing".to_string());
        Some(Err(EngineError::Script("backend unavailable".to_string())))
    }
}

fn providing(tag: &str, provides: &str, value: Value, log: &Arc<Mutex<Vec<String>>>) -> Arc<ProvidingPlugin> {
    Arc::new(ProvidingPlugin {
        tag: tag.to_string(),
        provides: provides.to_string(),
        value,
        log: log.clone(),
    })
}

#[test]
fn test_decline_walks_to_the_third_plugin() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");
    let log = Arc::new(Mutex::new(Vec::new()));

    let plugins = host.service.plugins();
    plugins.register(providing("first", "other", Value::Null, &log));
    plugins.register(providing("second", "other", Value::Null, &log));
    plugins.register(providing("third", "target", Value::Int(3), &log));

    assert_eq!(scope.get_property("target").unwrap(), Value::Int(3));
    assert_eq!(*log.lock(), vec!["first", "second", "third"]);
}

#[test]
fn test_plugin_failure_aborts_before_later_plugins() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");
    let log = Arc::new(Mutex::new(Vec::new()));

    let plugins = host.service.plugins();
    plugins.register(Arc::new(FailingPlugin { log: log.clone() }));
    plugins.register(providing("second", "target", Value::Int(3), &log));

    let err = scope.get_property("target").unwrap_err();
    assert!(matches!(err, EngineError::Script(_)));
    assert_eq!(*log.lock(), vec!["failing"]);
}

#[test]
fn test_plugins_are_consulted_after_globals() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");
    let log = Arc::new(Mutex::new(Vec::new()));

    host.service
        .plugins()
        .register(providing("only", "who", Value::Str("plugin".to_string()), &log));
    host.service.set_global("who", Value::Str("global".to_string()));

    assert_eq!(scope.get_property("who").unwrap(), Value::Str("global".to_string()));
    assert!(log.lock().is_empty());
}

#[test]
fn test_plugin_resolves_invocation() {
    let host = host();
    let (scope, _) = host.scope("main", "steve");
    let log = Arc::new(Mutex::new(Vec::new()));

    host.service
        .plugins()
        .register(providing("invoker", "spawn", Value::Bool(true), &log));

    assert_eq!(scope.invoke_method("spawn", &[Value::Int(1)]).unwrap(), Value::Bool(true));
}
