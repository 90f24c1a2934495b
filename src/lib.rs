//! # varspace - layered dynamic resolution for a multi-tenant scripting host
//!
//! The core of a scripting host in which many named *workspaces* share one
//! process: every property access, assignment and method call coming out of
//! running script code is resolved dynamically across an ordered chain of
//! scopes, extensible through pluggable resolvers.
//!
//! ## Resolution Chain
//!
//! ```text
//! Lookup order (first match wins):
//! 1. Invocation scope - intrinsics, then this run's local bindings
//! 2. Workspace        - intrinsics, then the named shared bindings
//! 3. Service globals  - bindings shared by every workspace
//! 4. Plugin chain     - registered resolvers, in order; each may decline
//! ```
//!
//! Assignments do **not** follow this chain: every layer's intrinsic setter
//! is attempted unconditionally and the value always lands in the workspace
//! bindings (see [`engine::resolve::assign_property`]).
//!
//! Alongside resolution, the crate owns the per-invocation line-buffered
//! output channel with its deferred flush, the process-wide workspace
//! registry, and the modification-time-keyed compiled-artifact cache.
//!
//! The pieces the host must supply are trait contracts in [`host`]: the
//! command-sender model, the script compiler, the deferred-task scheduler
//! and the startup package scanner.
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use std::path::Path;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! use varspace::engine::error::EngineError;
//! use varspace::engine::value::Value;
//! use varspace::host::caller::{CallerService, CommandSender};
//! use varspace::host::config::HostConfig;
//! use varspace::host::scheduler::{Scheduler, Task, TaskHandle};
//! use varspace::host::script::{ClassScanner, CompiledScript, ScriptCompiler};
//! use varspace::workspace::invocation::InvocationScope;
//! use varspace::workspace::service::WorkspaceService;
//!
//! struct Console;
//! impl CommandSender for Console {
//!     fn name(&self) -> &str { "console" }
//!     fn send_message(&self, text: &str) { println!("{}", text); }
//! }
//!
//! struct Queue(AtomicU64);
//! impl Scheduler for Queue {
//!     fn schedule(&self, _task: Task) -> TaskHandle {
//!         TaskHandle::new(self.0.fetch_add(1, Ordering::SeqCst))
//!     }
//! }
//!
//! struct NoCompiler;
//! impl ScriptCompiler for NoCompiler {
//!     fn compile(&self, path: &Path) -> Result<Arc<dyn CompiledScript>, EngineError> {
//!         Err(EngineError::Compile(format!("no compiler for {}", path.display())))
//!     }
//! }
//!
//! struct NoScanner;
//! impl ClassScanner for NoScanner {
//!     fn list_class_names(&self, _package: &str, _recursive: bool) -> Vec<String> {
//!         Vec::new()
//!     }
//! }
//!
//! let service = WorkspaceService::new(
//!     HostConfig::new("autorun", "scripts"),
//!     Arc::new(CallerService::new(Arc::new(Console))),
//!     Arc::new(NoCompiler),
//!     Arc::new(Queue(AtomicU64::new(0))),
//!     &NoScanner,
//! );
//!
//! let workspace = service.get_or_create("main");
//! workspace.set_binding("answer", Value::Int(42));
//!
//! let scope = InvocationScope::new();
//! scope.initialize(workspace, None, HashMap::new()).unwrap();
//! assert_eq!(scope.get_property("answer").unwrap(), Value::Int(42));
//! ```
//!
//! ## Architecture
//!
//! - **[`engine`]** - the resolution chain, value model and plugin protocol
//! - **[`host`]** - contracts for host-owned collaborators
//! - **[`workspace`]** - invocation scopes, workspaces, registry and cache

pub mod engine;
pub mod host;
pub mod workspace;
