use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::engine::error::EngineError;
use crate::engine::plugin::PluginChain;
use crate::engine::scope::DynamicScope;
use crate::engine::value::Value;
use crate::host::caller::{CallerService, CommandSender};
use crate::host::config::{class_short_name, has_extension, HostConfig, ImportSpec};
use crate::host::scheduler::Scheduler;
use crate::host::script::{ClassScanner, ScriptCompiler};
use crate::workspace::cache::CompiledCache;
use crate::workspace::workspace::Workspace;

/// Process-wide owner of all workspaces, the shared globals, the plugin
/// chain and the compiled-artifact cache.
///
/// Workspaces are created lazily on first access. The import table and the
/// classpath are built once at construction; the scanner collaborator is
/// used only during that step and not retained.
pub struct WorkspaceService {
    self_ref: Weak<WorkspaceService>,
    config: HostConfig,
    callers: Arc<CallerService>,
    compiler: Arc<dyn ScriptCompiler>,
    scheduler: Arc<dyn Scheduler>,
    workspaces: RwLock<HashMap<String, Arc<Workspace>>>,
    globals: RwLock<HashMap<String, Value>>,
    plugins: PluginChain,
    cache: CompiledCache,
    imports: HashMap<String, String>,
    star_imports: Vec<String>,
    classpath: Vec<PathBuf>,
}

impl WorkspaceService {
    pub fn new(
        config: HostConfig,
        callers: Arc<CallerService>,
        compiler: Arc<dyn ScriptCompiler>,
        scheduler: Arc<dyn Scheduler>,
        scanner: &dyn ClassScanner,
    ) -> Arc<Self> {
        let (imports, star_imports) = build_imports(&config, scanner);
        let mut classpath = config.classpath.clone();
        classpath.push(config.scripts_dir.clone());
        debug!(
            imports = imports.len(),
            classpath = classpath.len(),
            "workspace service ready"
        );
        Arc::new_cyclic(|me| WorkspaceService {
            self_ref: me.clone(),
            config,
            callers,
            compiler,
            scheduler,
            workspaces: RwLock::new(HashMap::new()),
            globals: RwLock::new(HashMap::new()),
            plugins: PluginChain::new(),
            cache: CompiledCache::new(),
            imports,
            star_imports,
            classpath,
        })
    }

    fn shared(&self) -> Arc<WorkspaceService> {
        self.self_ref.upgrade().expect("workspace service dropped while in use")
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn callers(&self) -> &CallerService {
        &self.callers
    }

    pub fn compiler(&self) -> &Arc<dyn ScriptCompiler> {
        &self.compiler
    }

    pub fn scheduler(&self) -> Arc<dyn Scheduler> {
        self.scheduler.clone()
    }

    pub fn plugins(&self) -> &PluginChain {
        &self.plugins
    }

    pub fn cache(&self) -> &CompiledCache {
        &self.cache
    }

    /// Alias → fully-qualified class, built once at startup.
    pub fn imports(&self) -> &HashMap<String, String> {
        &self.imports
    }

    /// Star-imported packages, consumed by the compiler collaborator.
    pub fn star_imports(&self) -> &[String] {
        &self.star_imports
    }

    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }

    // ── Global bindings ──────────────────────────────────────────────

    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.read().get(name).cloned()
    }

    pub fn set_global(&self, name: &str, value: Value) {
        self.globals.write().insert(name.to_string(), value);
    }

    pub fn remove_global(&self, name: &str) -> Option<Value> {
        self.globals.write().remove(name)
    }

    // ── Workspace registry ───────────────────────────────────────────

    pub fn workspace(&self, name: &str) -> Option<Arc<Workspace>> {
        self.workspaces.read().get(name).cloned()
    }

    /// True if `workspace` is the instance currently registered under its name.
    pub fn has_workspace(&self, workspace: &Workspace) -> bool {
        match self.workspaces.read().get(workspace.name()) {
            Some(current) => std::ptr::eq(Arc::as_ptr(current), workspace),
            None => false,
        }
    }

    pub fn workspaces(&self) -> Vec<Arc<Workspace>> {
        self.workspaces.read().values().cloned().collect()
    }

    /// The existing workspace for `name`, or a new one. Creation registers
    /// the workspace and then runs its autorun hook exactly once; a non-null
    /// autorun result is delivered to the console caller under the workspace
    /// name, and an autorun failure is delivered the same way.
    ///
    /// The hook runs outside the registry lock so an autorun script that
    /// resolves its own workspace sees the already-registered instance
    /// instead of creating a second one.
    pub fn get_or_create(&self, name: &str) -> Arc<Workspace> {
        if let Some(workspace) = self.workspaces.read().get(name) {
            return workspace.clone();
        }
        let created = {
            let mut map = self.workspaces.write();
            if let Some(workspace) = map.get(name) {
                return workspace.clone();
            }
            let created = Workspace::new(self.shared(), name.to_string());
            map.insert(name.to_string(), created.clone());
            created
        };
        debug!(workspace = name, "created workspace");
        let console = self.callers.console_caller();
        match created.autorun() {
            Ok(Some(result)) => console.deliver(&result.to_string(), name),
            Ok(None) => {}
            Err(err) => {
                warn!(workspace = name, error = %err, "autorun failed");
                console.deliver(&err.to_string(), name);
            }
        }
        created
    }

    /// Unregister a workspace. Fails fast unless the workspace was first
    /// marked removed and the name still maps to this exact instance.
    pub fn remove(&self, workspace: &Workspace) -> Result<(), EngineError> {
        if !workspace.is_removed() {
            return Err(EngineError::WorkspaceNotRemoved(workspace.name().to_string()));
        }
        let mut map = self.workspaces.write();
        match map.get(workspace.name()) {
            Some(current) if std::ptr::eq(Arc::as_ptr(current), workspace) => {
                map.remove(workspace.name());
                debug!(workspace = workspace.name(), "removed workspace");
                Ok(())
            }
            _ => Err(EngineError::WorkspaceNotRegistered(workspace.name().to_string())),
        }
    }

    /// Create a workspace for every script in the autorun directory, in
    /// directory-listing order.
    pub fn start_autorun(&self) {
        let entries = match fs::read_dir(&self.config.autorun_dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !has_extension(&path, &self.config.extension) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                self.get_or_create(stem);
            }
        }
    }

    /// Default workspace name for a sender: the configured alias, else the
    /// sender's display name.
    pub fn workspace_name_for(&self, sender: &dyn CommandSender) -> String {
        match self.config.workspace_aliases.get(sender.name()) {
            Some(alias) => alias.clone(),
            None => sender.name().to_string(),
        }
    }
}

// The service has no intrinsic slots of its own; its contribution to the
// chain is the globals map, which the resolution steps consult directly.
impl DynamicScope for WorkspaceService {}

fn build_imports(config: &HostConfig, scanner: &dyn ClassScanner) -> (HashMap<String, String>, Vec<String>) {
    let mut imports = HashMap::new();
    let mut star_imports = Vec::new();
    for spec in &config.imports {
        match spec {
            ImportSpec::Class { class, alias } => {
                let alias = alias
                    .clone()
                    .unwrap_or_else(|| class_short_name(class).to_string());
                imports.insert(alias, class.clone());
            }
            ImportSpec::Package { package } => star_imports.push(package.clone()),
            ImportSpec::Scan { package, recursive } => {
                for class in scanner.list_class_names(package, *recursive) {
                    imports.insert(class_short_name(&class).to_string(), class);
                }
            }
        }
    }
    (imports, star_imports)
}
